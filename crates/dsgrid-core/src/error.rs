//! Error types for dsgrid

use thiserror::Error;

/// Core error type for grid operations
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Metadata error for column '{column}': {message}")]
    Metadata { column: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid filter conditions on columns: {}", .columns.join(", "))]
    InvalidFilter { columns: Vec<String> },

    #[error("Save failed for record {record_id}: {message}")]
    Save { record_id: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Grid is no longer mounted")]
    Unmounted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl GridError {
    /// Whether this error is user-correctable data rather than an operational failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidFilter { .. })
    }
}

/// Result type alias for grid operations
pub type Result<T> = std::result::Result<T, GridError>;
