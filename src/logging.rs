//! Logging
//!
//! File log with RFC 3339 timestamps, plus warnings on the terminal when
//! the terminal is not owned by the list view.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub path: PathBuf,
    pub level: LevelFilter,
    /// Also print warnings and errors to stderr
    pub terminal: bool,
}

impl LogConfig {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            level: LevelFilter::Info,
            terminal: true,
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }
}

/// Install the global logger. Call once, before opening the store.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)
        .map_err(|e| anyhow!("Failed to open log file {}: {}", config.path.display(), e))?;

    let file_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> =
        vec![WriteLogger::new(config.level, file_config, log_file)];

    if config.terminal {
        let term_config = ConfigBuilder::new()
            .set_time_level(LevelFilter::Off)
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build();

        loggers.push(TermLogger::new(
            LevelFilter::Warn,
            term_config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers).map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    log::debug!("Logging to {} at {:?}", config.path.display(), config.level);
    Ok(())
}
