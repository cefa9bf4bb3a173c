//! Error taxonomy of the request pipeline.
//!
//! * [`HttpError`] is raised on purpose by application code and carries the
//!   status and message the client should see.
//! * Everything else is an internal failure, carried as an `eyre::Report`
//!   inside [`HandlerError::Internal`]; its details are never sent to clients
//!   by the default error handler.
//! * [`PatternError`] is a registration-time failure: a malformed route
//!   pattern is rejected before the first request is served.
use thiserror::Error;

use crate::core::status::HttpStatus;

/// Structured HTTP error with an explicit status and client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct HttpError {
    status: HttpStatus,
    message: String,
}

impl HttpError {
    pub fn new(status: HttpStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(HttpStatus::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(HttpStatus::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(HttpStatus::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(HttpStatus::NotFound, message)
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Anything a handler or middleware may fail with.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HandlerError {
    /// Deliberate, client-facing failure.
    #[error(transparent)]
    Http(#[from] HttpError),
    /// Unexpected failure; mapped to a generic 500.
    #[error(transparent)]
    Internal(#[from] eyre::Report),
    /// A handler panicked while producing the response.
    #[error("Handler panicked: {0}")]
    Panic(String),
}

impl HandlerError {
    /// Internal error from a plain message.
    pub fn internal(message: impl Into<String>) -> Self {
        HandlerError::Internal(eyre::eyre!(message.into()))
    }

    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            HandlerError::Http(error) => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(error: serde_json::Error) -> Self {
        HandlerError::Internal(error.into())
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(error: std::io::Error) -> Self {
        HandlerError::Internal(error.into())
    }
}

/// Rejection of a malformed route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PatternError {
    #[error("Route pattern '{pattern}' must start with '/'")]
    MissingLeadingSlash { pattern: String },

    #[error("Unclosed placeholder at byte {position} in route pattern '{pattern}'")]
    UnclosedPlaceholder { pattern: String, position: usize },

    #[error("Unexpected '}}' at byte {position} in route pattern '{pattern}'")]
    UnexpectedClosingBrace { pattern: String, position: usize },

    #[error("Invalid placeholder name '{name}' in route pattern '{pattern}'")]
    InvalidPlaceholderName { pattern: String, name: String },

    #[error("Placeholder '{name}' appears more than once in route pattern '{pattern}'")]
    DuplicatePlaceholder { pattern: String, name: String },

    #[error(
        "Placeholders '{first}' and '{second}' in route pattern '{pattern}' must be separated by literal text"
    )]
    AdjacentPlaceholders {
        pattern: String,
        first: String,
        second: String,
    },

    #[error("Failed to compile route pattern '{pattern}': {reason}")]
    Compile { pattern: String, reason: String },
}
