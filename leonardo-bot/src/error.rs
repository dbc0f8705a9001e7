//! Application-wide error types.

use thiserror::Error;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport, HTTP status or timeout failure while fetching the plan.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The plan document could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The notification could not be sent to the main channel.
    #[error("Notify error: {0}")]
    Notify(String),

    /// Reporting a failure to the error channel failed.
    #[error("Error report failed: {0}")]
    ErrorReport(String),

    /// Raw failure from the Discord REST client.
    #[error("Discord error: {0}")]
    Discord(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    pub fn discord(msg: impl Into<String>) -> Self {
        Self::Discord(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether this error came from retrieving or decoding the plan.
    pub fn is_source_error(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Parse(_))
    }
}
