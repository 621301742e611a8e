//! Error types for tasktag.

use thiserror::Error;

/// Result type for tasktag operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tasktag operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Linguistic annotation failed.
    #[error("Annotation failed: {0}")]
    Annotation(String),

    /// Date/time resolution failed.
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Dataset loading/parsing error.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an annotation error.
    pub fn annotation(msg: impl Into<String>) -> Self {
        Error::Annotation(msg.into())
    }

    /// Create a resolution error.
    pub fn resolution(msg: impl Into<String>) -> Self {
        Error::Resolution(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Error::Dataset(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
