//! Reconciliation input errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Table lacks columns every fill row needs (sorted)
    #[error("{table} missing required columns: {columns:?}")]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("{table} row {row}: invalid {column}: {reason}")]
    InvalidValue {
        table: String,
        row: usize,
        column: String,
        reason: String,
    },

    #[error("{table} must be an array of objects")]
    NotATable { table: String },
}

pub type Result<T> = std::result::Result<T, ReconError>;
