use std::cell::Cell;

use crate::funnel::{FunnelError, StepFunnel, StepSlots};

const STEPS: [&str; 4] = ["id", "password", "terms", "done"];

fn funnel() -> StepFunnel<&'static str> {
    StepFunnel::new(STEPS, "id").expect("valid funnel")
}

#[test]
fn empty_step_set_is_rejected() {
    let err = StepFunnel::<&str>::new([], "id").expect_err("empty set must fail");
    assert_eq!(err, FunnelError::EmptyStepSet);
}

#[test]
fn duplicate_steps_are_rejected() {
    let err = StepFunnel::new(["a", "b", "a"], "a").expect_err("duplicates must fail");
    assert_eq!(err, FunnelError::DuplicateStep("\"a\"".into()));
}

#[test]
fn initial_step_must_belong_to_the_set() {
    let err = StepFunnel::new(["a", "b"], "z").expect_err("unknown initial step");
    assert!(matches!(err, FunnelError::InvalidStep(_)));
}

#[test]
fn next_advances_exactly_one_position_from_every_non_last_step() {
    for start in 0..STEPS.len() - 1 {
        let mut funnel = StepFunnel::new(STEPS, STEPS[start]).expect("valid funnel");
        assert!(funnel.next(STEPS[start]));
        assert_eq!(funnel.current(), Some(STEPS[start + 1]));
        assert_eq!(funnel.index(), Some(start + 1));
    }
}

#[test]
fn next_on_last_step_is_a_silent_noop() {
    let mut funnel = StepFunnel::new(STEPS, "done").expect("valid funnel");
    assert!(funnel.is_last());
    assert!(!funnel.next("done"));
    assert_eq!(funnel.current(), Some("done"));
}

#[test]
fn stale_next_does_not_move_the_funnel() {
    let mut funnel = funnel();
    assert!(funnel.next("id"));
    assert_eq!(funnel.current(), Some("password"));

    // A late callback that still believes it is on "id".
    assert!(!funnel.next("id"));
    assert_eq!(funnel.current(), Some("password"));
}

#[test]
fn go_to_rejects_unknown_steps_and_keeps_state() {
    let mut funnel = funnel();
    funnel.next("id");
    let err = funnel.go_to("nope").expect_err("unknown step");
    assert_eq!(err, FunnelError::InvalidStep("\"nope\"".into()));
    assert_eq!(funnel.current(), Some("password"));
}

#[test]
fn go_to_supports_forward_and_rollback_jumps() {
    let mut funnel = funnel();
    funnel.go_to("terms").expect("forward jump");
    assert_eq!(funnel.current(), Some("terms"));
    funnel.go_to("password").expect("rollback");
    assert_eq!(funnel.current(), Some("password"));
}

#[test]
fn back_is_guarded_like_next() {
    let mut funnel = StepFunnel::new(STEPS, "terms").expect("valid funnel");
    assert!(!funnel.back("password"));
    assert!(funnel.back("terms"));
    assert_eq!(funnel.current(), Some("password"));

    let mut first = funnel.clone();
    first.go_to("id").expect("jump");
    assert!(!first.back("id"));
    assert_eq!(first.current(), Some("id"));
}

#[test]
fn finish_enters_terminal_state_only_from_live_step() {
    let mut funnel = StepFunnel::new(STEPS, "terms").expect("valid funnel");
    assert!(!funnel.finish("id"));
    assert!(!funnel.is_terminal());

    assert!(funnel.finish("terms"));
    assert!(funnel.is_terminal());
    assert_eq!(funnel.current(), None);
    assert!(!funnel.next("terms"));
}

#[test]
fn slots_build_only_the_live_step() {
    let built_password = Cell::new(0);
    let built_id = Cell::new(0);
    let slots = StepSlots::new()
        .step("password", || {
            built_password.set(built_password.get() + 1);
            "password-field"
        })
        .step("id", || {
            built_id.set(built_id.get() + 1);
            "id-field"
        });

    let mut funnel = funnel();
    assert_eq!(slots.render(&funnel), Some("id-field"));
    assert_eq!((built_id.get(), built_password.get()), (1, 0));

    funnel.next("id");
    assert_eq!(slots.render(&funnel), Some("password-field"));
    assert_eq!((built_id.get(), built_password.get()), (1, 1));

    funnel.next("password");
    assert_eq!(slots.render(&funnel), None);
    assert_eq!((built_id.get(), built_password.get()), (1, 1));
}

#[test]
fn slot_display_order_is_independent_of_funnel_order() {
    let slots: StepSlots<'_, &str, ()> = StepSlots::new().step("password", || ()).step("id", || ());
    assert_eq!(slots.display_order(), vec!["password", "id"]);
    assert_eq!(funnel().steps()[0], "id");
}
