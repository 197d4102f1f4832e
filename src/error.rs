//! Error types for the academic calendar service.

use thiserror::Error;

/// Main error type for calendar operations.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("MCP error: {0}")]
    Mcp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Record store faults.
///
/// These are failures of the store itself and are never used to signal
/// "no matching rows".
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(e) => StorageError::Io(e),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StorageError::Connection(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
                StorageError::SchemaMismatch(err.to_string())
            }
            other => StorageError::Query(other.to_string()),
        }
    }
}

/// Field validation failures for a candidate event.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("level must be one of 0, 1, 2, 3 (got {0})")]
    InvalidLevel(i64),

    #[error("status must be between 0 and 1 (got {0})")]
    StatusOutOfRange(f64),

    #[error("{field} '{value}' does not match YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp { field: &'static str, value: String },
}

/// Errors talking to the schedule REST API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

impl ApiError {
    /// HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for calendar operations.
pub type Result<T> = std::result::Result<T, CalendarError>;
