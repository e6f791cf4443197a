//! Error types for slamlink
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SlamError
pub type Result<T> = std::result::Result<T, SlamError>;

/// Unified error type for slamlink operations
#[derive(Debug, Error)]
pub enum SlamError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Connection reset by peer")]
    ConnectionReset,

    #[error("Timed out waiting for a frame")]
    Timeout,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Wrong request_id in response: expected {expected}, got {actual}")]
    ProtocolMismatch { expected: u32, actual: u32 },

    #[error("Command {command} failed with code {code}")]
    CommandFailure { command: String, code: i64 },

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Grid dimension mismatch: expected {expected} cells, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SlamError {
    /// True when the underlying connection can no longer be used
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            SlamError::ConnectionClosed | SlamError::ConnectionReset | SlamError::Timeout
        )
    }
}

impl From<serde_json::Error> for SlamError {
    fn from(err: serde_json::Error) -> Self {
        SlamError::Serialization(err.to_string())
    }
}
