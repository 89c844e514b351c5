//! Application configuration
//!
//! Defaults live under the platform data directory. An optional
//! `config.json` next to them overrides any subset of fields.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DatabaseConfig;

const APP_DIR: &str = "password-manager";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown log level '{0}'")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: String,
    /// Seconds before copied passwords are cleared; 0 keeps them
    pub clipboard_timeout_secs: u64,
    pub busy_timeout_secs: u64,
    pub reader_connections: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let dir = default_data_dir();

        Self {
            db_path: dir.join("vault.db"),
            log_path: dir.join("password-manager.log"),
            log_level: "info".to_string(),
            clipboard_timeout_secs: 15,
            busy_timeout_secs: 5,
            reader_connections: 4,
        }
    }
}

impl AppConfig {
    /// Load `path` over the defaults; a missing file means defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.log_level()?;
        Ok(config)
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn clipboard_timeout(&self) -> Option<Duration> {
        (self.clipboard_timeout_secs > 0).then(|| Duration::from_secs(self.clipboard_timeout_secs))
    }

    pub fn store_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            path: self.db_path.clone(),
            wal_mode: true,
            busy_timeout: Duration::from_secs(self.busy_timeout_secs),
            readers: self.reader_connections,
        }
    }
}

/// `<data dir>/password-manager`, or `./password-manager` without one
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn default_config_path() -> PathBuf {
    default_data_dir().join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.clipboard_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.log_level().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn test_partial_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "db_path": "/tmp/other.db", "clipboard_timeout_secs": 0 }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.clipboard_timeout(), None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.store_config().path, PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_bad_log_level() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "log_level": "loud" }"#).unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::LogLevel(_))));
    }

    #[test]
    fn test_store_config_uses_timeouts() {
        let config = AppConfig {
            busy_timeout_secs: 2,
            reader_connections: 1,
            ..Default::default()
        };

        let store = config.store_config();
        assert_eq!(store.busy_timeout, Duration::from_secs(2));
        assert_eq!(store.readers, 1);
        assert!(store.wal_mode);
    }
}
