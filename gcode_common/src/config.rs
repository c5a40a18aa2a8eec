//! TOML configuration.
//!
//! Binaries describe their settings as a serde struct and get
//! [`ConfigLoader::load`] for free. The `[machine]` table
//! ([`MachineConfig`]) identifies the machine a program is filtered for and
//! sets the log level; stage-specific tables sit next to it.
//!
//! ```rust,no_run
//! use gcode_common::config::{ConfigError, ConfigLoader, MachineConfig};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize)]
//! struct StageConfig {
//!     machine: MachineConfig,
//!     tolerance: f64,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = StageConfig::load(Path::new("stage.toml"))?;
//!     config.machine.validate()?;
//!     println!("{} at {}", config.machine.name, config.tolerance);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("config file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    /// Unreadable file or malformed TOML.
    #[error("cannot read config: {0}")]
    ParseError(String),

    /// Well-formed but out-of-range values.
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Log verbosity, spelled in lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    /// Every processed move.
    Debug,
    /// Calibration blocks and inserted compensation moves.
    #[default]
    Info,
    /// Rejected lines.
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// The `[machine]` table.
///
/// ```toml
/// [machine]
/// name = "router-01"
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineConfig {
    /// Machine identifier, attached to log records.
    pub name: String,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl MachineConfig {
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if `name` is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "machine.name must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads any deserializable settings struct from TOML.
///
/// Only syntax and shape are checked here; range checks belong to the
/// loaded type's own `validate`.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Reading config");
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
            _ => ConfigError::ParseError(format!("{}: {e}", path.display())),
        })?;
        Self::from_toml(&text)
    }

    fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
