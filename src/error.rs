//! Crate-wide error type for data-access operations.
//!
//! Every operation surfaces one of three kinds, so callers can branch on
//! the variant instead of parsing message text.

use reqwest::StatusCode;
use std::fmt;

/// Failure reported by the remote service or the transport underneath it.
#[derive(Debug)]
pub enum RemoteFailure {
    /// The request never produced a usable response.
    Http(reqwest::Error),
    /// The service answered with a non-success status.
    Service { status: StatusCode, message: String },
    /// The response body did not match the expected shape.
    Decode(String),
}

/// Errors surfaced by every data-access operation.
#[derive(Debug)]
pub enum Error {
    /// Missing required input or unrecognized media type. Detected locally;
    /// no remote call was made.
    InvalidInput(String),
    /// The remote service rejected or failed the request.
    Remote(RemoteFailure),
    /// The lookup matched nothing.
    NotFound(String),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }

    pub fn service(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Remote(RemoteFailure::Service {
            status,
            message: message.into(),
        })
    }

    /// Status of the underlying service rejection, if there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Remote(RemoteFailure::Service { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(message) => write!(f, "{message}"),
            Error::Remote(failure) => write!(f, "remote service error: {failure}"),
            Error::NotFound(message) => write!(f, "not found: {message}"),
        }
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteFailure::Http(err) => write!(f, "http error: {err}"),
            RemoteFailure::Service { status, message } => {
                write!(f, "unexpected status {status}: {message}")
            }
            RemoteFailure::Decode(message) => {
                write!(f, "unexpected response shape: {message}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Remote(RemoteFailure::Http(err)) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Remote(RemoteFailure::Http(err))
    }
}
