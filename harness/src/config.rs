//! Harness configuration module.
//!
//! This module provides configuration loading for the harness from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `DUCKDB_RDKIT_EXTENSION_BINARY_PATH`: Path to the compiled extension (required)
//! - `DUCKDB_RDKIT_ALLOW_UNSIGNED_EXTENSIONS`: Whether the engine may load unsigned
//!   extensions (default: `true`)
//! - `DUCKDB_RDKIT_HARNESS_TIMEOUT_SECS`: Upper bound for a whole run (default: `60`)
//!
//! # Invariants
//!
//! - `extension_path` is never empty
//! - `timeout` is always at least one second

use std::path::PathBuf;
use std::time::Duration;

use crate::engine::EngineConfig;

pub const EXTENSION_PATH_VAR: &str = "DUCKDB_RDKIT_EXTENSION_BINARY_PATH";
pub const ALLOW_UNSIGNED_VAR: &str = "DUCKDB_RDKIT_ALLOW_UNSIGNED_EXTENSIONS";
pub const TIMEOUT_VAR: &str = "DUCKDB_RDKIT_HARNESS_TIMEOUT_SECS";

/// Harness configuration.
///
/// # Pre-conditions
///
/// When constructed via `from_env()`:
/// - `DUCKDB_RDKIT_EXTENSION_BINARY_PATH` must be set
/// - All values must be valid for their respective types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Path handed to `LOAD`. Not checked beyond what the engine does.
    pub extension_path: PathBuf,
    /// Relaxes the engine's signature policy so locally built binaries load.
    pub allow_unsigned_extensions: bool,
    /// Upper bound for a whole run, enforced by the binary.
    pub timeout: Duration,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl HarnessConfig {
    /// Default run timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
    /// The harness exists to load locally built binaries, which are unsigned.
    pub const DEFAULT_ALLOW_UNSIGNED_EXTENSIONS: bool = true;

    /// Create a configuration for `extension_path` with default settings.
    #[must_use]
    pub fn new(extension_path: impl Into<PathBuf>) -> Self {
        Self {
            extension_path: extension_path.into(),
            allow_unsigned_extensions: Self::DEFAULT_ALLOW_UNSIGNED_EXTENSIONS,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DUCKDB_RDKIT_EXTENSION_BINARY_PATH` is not set or is empty
    /// - `DUCKDB_RDKIT_ALLOW_UNSIGNED_EXTENSIONS` is set but not a boolean
    /// - `DUCKDB_RDKIT_HARNESS_TIMEOUT_SECS` is set but not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let extension_path = Self::load_extension_path(&lookup)?;
        let allow_unsigned_extensions = Self::load_allow_unsigned(&lookup)?;
        let timeout = Self::load_timeout(&lookup)?;

        Ok(Self {
            extension_path,
            allow_unsigned_extensions,
            timeout,
        })
    }

    /// Engine settings for a harness run.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            allow_unsigned_extensions: self.allow_unsigned_extensions,
            ..EngineConfig::default()
        }
    }

    fn load_extension_path(
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<PathBuf, ConfigError> {
        let path =
            lookup(EXTENSION_PATH_VAR).ok_or_else(|| ConfigError::MissingEnvVar(EXTENSION_PATH_VAR.to_string()))?;

        if path.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: EXTENSION_PATH_VAR.to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(PathBuf::from(path))
    }

    /// Returns the default if not set.
    fn load_allow_unsigned(lookup: &impl Fn(&str) -> Option<String>) -> Result<bool, ConfigError> {
        let Some(value) = lookup(ALLOW_UNSIGNED_VAR) else {
            return Ok(Self::DEFAULT_ALLOW_UNSIGNED_EXTENSIONS);
        };

        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                name: ALLOW_UNSIGNED_VAR.to_string(),
                message: format!("'{value}' is not a boolean (expected true, false, 1 or 0)"),
            }),
        }
    }

    /// Returns the default if not set.
    fn load_timeout(lookup: &impl Fn(&str) -> Option<String>) -> Result<Duration, ConfigError> {
        let Some(value) = lookup(TIMEOUT_VAR) else {
            return Ok(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS));
        };

        match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidValue {
                name: TIMEOUT_VAR.to_string(),
                message: format!("'{value}' is not a positive number of seconds"),
            }),
        }
    }
}
