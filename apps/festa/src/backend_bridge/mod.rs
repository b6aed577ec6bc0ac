//! Bridge between the single-threaded controller and the async backend worker.

pub mod commands;
pub mod runtime;
