//! Controller layer: UI events, the verification state machine, and command orchestration.

pub mod events;
pub mod flow;
pub mod orchestration;
pub mod schema;
pub mod shell;
pub mod terms;
