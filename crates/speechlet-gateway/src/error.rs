//! Gateway error types.

use thiserror::Error;

/// Gateway error type.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Socket error
    #[error("Socket error: {0}")]
    Socket(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Signature rejected
    #[error("Signature rejected: {0}")]
    Signature(String),

    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Connection closed
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result type alias using GatewayError.
pub type GatewayResult<T> = Result<T, GatewayError>;
