//! Error types for Netstream

use thiserror::Error;

/// Main error type for Netstream
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Connect failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("Bind failed: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Listen failed: {0}")]
    Listen(#[source] std::io::Error),

    #[error("Accept failed: {0}")]
    Accept(#[source] std::io::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Send timeout")]
    Timeout,

    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result type alias for Netstream
pub type Result<T> = std::result::Result<T, Error>;
