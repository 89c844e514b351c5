//! UI Module
//!
//! Terminal user interface using ratatui.

pub mod components;
pub mod renderer;

// Re-exports
pub use components::{
    ConfirmDialog, EmptyState, HelpBar, ListViewState, MessageType, RecordList, StatusLine,
};
pub use renderer::{Renderer, UiState};
