//! Headless interaction primitives: step funnel, drag gesture policy,
//! bottom sheet motion, and deferred frame callbacks.

pub mod frame;
pub mod funnel;
pub mod gesture;
pub mod sheet;

pub use frame::{FrameHandle, FrameScheduler};
pub use funnel::{FunnelError, StepFunnel, StepSlots};
pub use gesture::{decide, DragSample, GesturePolicy, Intent, DRAG_THRESHOLD};
pub use sheet::{
    BottomSheet, DismissRequest, DismissSource, HeightTier, Presence, SheetConfig, SheetFrame,
    SheetMotionController, SheetState, SheetVariant,
};

#[cfg(test)]
#[path = "tests/funnel_tests.rs"]
mod funnel_tests;

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod gesture_tests;

#[cfg(test)]
#[path = "tests/sheet_tests.rs"]
mod sheet_tests;

#[cfg(test)]
#[path = "tests/frame_tests.rs"]
mod frame_tests;
