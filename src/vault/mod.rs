//! Vault Module
//!
//! Persistence manager for credential records and its change notifications.

pub mod events;
pub mod manager;
pub mod search;

// Re-exports
pub use events::{ChangeEvent, ChangeListener};
pub use manager::RecordManager;
