//! UI Components
//!
//! Widgets for the record list view.

pub mod dialog;
pub mod list;
pub mod statusline;

// Re-exports
pub use dialog::ConfirmDialog;
pub use list::{EmptyState, ListViewState, RecordList};
pub use statusline::{HelpBar, MessageType, StatusLine};
