//! password-manager
//!
//! A local credential store: app name, user name, and password per record,
//! kept in SQLite, with a list view that masks each password until it is
//! explicitly shown.

pub mod app;
pub mod cell;
pub mod clipboard;
pub mod config;
pub mod db;
pub mod input;
pub mod logging;
pub mod ui;
pub mod vault;

pub use cell::{CopyOutcome, PasswordCell, Visibility, VisibilityChanged};
pub use clipboard::{Clipboard, SystemClipboard};
pub use config::AppConfig;
pub use db::{Record, RecordId, StoreError, StoreResult};
pub use vault::{ChangeEvent, ChangeListener, RecordManager};
