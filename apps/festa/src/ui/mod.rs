//! UI layer for the festa terminal front end: a headless driver that feeds
//! scripted input to the verification controller and paints its frames.

pub mod app;

pub use app::{await_event, ConsoleNavigator, ConsoleNotifier, HeadlessApp, Input};
