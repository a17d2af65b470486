//! Runner errors

use meridian_reconciliation::ReconError;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config value {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Reconciliation input rejected: {0}")]
    Reconciliation(#[from] ReconError),

    #[error("Invalid session: {0}")]
    Session(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
