//! Input Module
//!
//! Keyboard handling for the list view.

pub mod keymap;
pub mod modes;

// Re-exports
pub use keymap::Action;
pub use modes::{InputMode, ModeState};
