use thiserror::Error;

/// Result type used throughout the infrastructure crates
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for infrastructure operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unparseable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// An event channel was closed or could not be used
    #[error("Event channel error: {0}")]
    Channel(String),

    /// IO failure while reading configuration or similar resources
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for internal invariant violations
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error from any displayable value
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a channel error from any displayable value
    pub fn channel(msg: impl Into<String>) -> Self {
        Error::Channel(msg.into())
    }
}
