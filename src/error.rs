//! Error handling module for StatForge
//!
//! The composition core is total and never returns these errors. They are
//! raised only at the edges: configuration loading, registry loading and
//! request decoding in the CLI driver.

use thiserror::Error;

/// Result type alias for StatForge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for StatForge
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Referrer registry could not be loaded
    #[error("Registry error: {0}")]
    Registry(String),

    /// Validation errors for incoming requests
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a registry error
    pub fn registry<S: Into<String>>(msg: S) -> Self {
        Error::Registry(msg.into())
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Process exit code for the CLI driver
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) | Error::Serialization(_) => 65,
            Error::Io(_) => 74,
            Error::Config(_) | Error::Registry(_) => 78,
            Error::Internal(_) => 70,
        }
    }

    /// Whether the caller supplied bad input (as opposed to a broken deployment)
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Serialization(_))
    }
}

/// Convert from envconfig::Error to our Error type
impl From<envconfig::Error> for Error {
    fn from(err: envconfig::Error) -> Self {
        Error::Config(err.to_string())
    }
}
