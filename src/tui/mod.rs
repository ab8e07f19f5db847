//! TUI module for the interactive teleprompter window.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (App, Mode, Action, Transition)
//! - `update`: Pure state transitions
//! - `view`: Pure rendering
//! - `theme`: Colour palettes
//! - `run`: Effects (terminal, event loop, controller calls)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::{Startup, run};
