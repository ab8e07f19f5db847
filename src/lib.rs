//! teleprompter: auto-scrolling text in the terminal with persistent display settings.

pub mod controller;
pub mod error;
pub mod logging;
pub mod scroll;
pub mod settings;
pub mod tui;
pub mod wrap;
