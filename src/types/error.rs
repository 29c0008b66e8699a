use thiserror::Error;

/// optiboard error types
#[derive(Error, Debug)]
pub enum OptiboardError {
    /// Failed to parse a JSON payload
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot cache operation failed
    #[error("cache error: {0}")]
    Cache(String),

    /// Dashboard API request failed
    #[error("http error: {0}")]
    Http(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Payload does not match the dashboard summary schema
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Result type alias for optiboard
pub type Result<T> = std::result::Result<T, OptiboardError>;
