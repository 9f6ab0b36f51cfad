//! Error types for synthdata
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for synthdata operations
///
/// The first group of variants is the request failure taxonomy surfaced to
/// the user as inline messages. None of them is fatal: the user may retry.
/// The remaining variants cover configuration, local storage, validation of
/// hand-edited input, and export.
#[derive(Error, Debug)]
pub enum SynthError {
    /// No credential is stored; the request was never dispatched
    #[error("No authentication token found. Please log in.")]
    NotAuthenticated,

    /// The backend answered 401; the local credential has been cleared
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// The backend answered 429
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        /// Message from the server error body
        message: String,
        /// When the server quota resets, if it said so
        reset_time: Option<String>,
    },

    /// Any other non-2xx response
    #[error("{0}")]
    RequestFailed(String),

    /// Transport failure (connection refused, DNS, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body does not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// Export failures (empty data set, unwritable file)
    #[error("Export error: {0}")]
    Export(String),

    /// Local key-value storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV writer errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SynthError {
    /// Returns `true` for failures after which the stored credential is gone
    /// and the user has to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, SynthError::NotAuthenticated | SynthError::SessionExpired)
    }
}

/// Result type alias for synthdata operations
///
/// Uses `anyhow::Error` so callers can attach context; typed failures are
/// recovered with `err.downcast_ref::<SynthError>()`.
pub type Result<T> = anyhow::Result<T>;
