//! Core error types for nodrunk-core.
//!
//! The policy functions themselves are infallible. Errors only arise at
//! the boundaries: the shared store, the configuration file and the
//! range editor.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for nodrunk-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Shared store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shared key-value store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The store or its data directory could not be opened
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another writer
    #[error("Store is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors surfaced by the range editor and rating input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Minute-of-day outside 0..=1439
    #[error("{field} must be within 0..=1439, got {value}")]
    MinuteOutOfRange { field: &'static str, value: u16 },

    /// Repeat day outside 1..=7
    #[error("Repeat day must be within 1 (Sunday) ..= 7 (Saturday), got {0}")]
    InvalidRepeatDay(u8),

    /// Unparseable HH:MM value
    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTimeOfDay(String),

    /// Unparseable UTC offset
    #[error("Invalid UTC offset '{0}', expected +HH:MM or -HH:MM")]
    InvalidUtcOffset(String),

    /// Rating outside 0..=2
    #[error("Invalid rating {0}, expected 0 (none), 1 (caution) or 2 (high risk)")]
    InvalidRating(i64),

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
