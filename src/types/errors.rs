//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. The console
//! never branches on the variant: every failure ends up as one line of text in
//! the status banner.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for tooldesk.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failures from the HTTP client, passed through unmodified.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("request failed with status code {status}: {message}")]
    Status { status: u16, message: String },

    /// OpenAPI spec text that is not valid JSON.
    #[error("invalid OpenAPI spec: {0}")]
    InvalidSpec(String),

    /// Response body that does not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Presence checks on form input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration loading errors.
    #[error("config error: {0}")]
    Config(String),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidSpec(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
