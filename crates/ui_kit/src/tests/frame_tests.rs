use crate::frame::FrameScheduler;

#[test]
fn run_frame_delivers_in_request_order_once() {
    let mut frames = FrameScheduler::new();
    let first = frames.request("a");
    let second = frames.request("b");
    assert_ne!(first, second);

    let ran: Vec<_> = frames.run_frame().into_iter().map(|(_, p)| p).collect();
    assert_eq!(ran, vec!["a", "b"]);
    assert!(frames.run_frame().is_empty());
}

#[test]
fn cancelled_requests_never_run() {
    let mut frames = FrameScheduler::new();
    let keep = frames.request(1);
    let dropped = frames.request(2);

    assert!(frames.cancel(dropped));
    assert!(!frames.cancel(dropped));
    assert!(frames.is_pending(keep));
    assert!(!frames.is_pending(dropped));

    let ran = frames.run_frame();
    assert_eq!(ran.len(), 1);
    assert_eq!(ran[0].0, keep);
    assert!(!frames.cancel(keep));
}

#[test]
fn cancel_all_clears_queue() {
    let mut frames = FrameScheduler::new();
    frames.request(());
    frames.request(());
    assert_eq!(frames.pending_len(), 2);
    frames.cancel_all();
    assert_eq!(frames.pending_len(), 0);
}
