//! Database Models
//!
//! The credential record stored in the `App` table.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Store-assigned record identifier (UUIDv4 text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to address a record from the CLI
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Credential record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub app_name: String,
    pub user_name: String,
    pub password: String,
    pub is_password_visible: bool,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Record {
    /// Create a new record with a generated ID; the password starts hidden
    pub fn new(app_name: String, user_name: String, password: String) -> Self {
        let now = Local::now();
        Self {
            id: RecordId::generate(),
            app_name,
            user_name,
            password,
            is_password_visible: false,
            created_at: now,
            updated_at: now,
        }
    }
}
