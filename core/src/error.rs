//! Error types for the request layer.
//!
//! # Design
//! Failures are split by where they happen: `Configuration` before any I/O,
//! `Transport` while reaching the server, `BodyRead` while draining the
//! response, and `Application` when an `ErrorPolicy` rejects the exchange.
//! Decoding the body into a caller type is not this crate's concern.

use thiserror::Error;

/// Errors returned while building or sending a `Request`.
#[derive(Debug, Error)]
pub enum RestError {
    /// The builder was missing a required part or held an invalid value.
    #[error("invalid request configuration: {0}")]
    Configuration(String),

    /// The request could not be delivered or no response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body stream failed part way through.
    #[error("unable to read response body: {0}")]
    BodyRead(#[source] std::io::Error),

    /// The error policy classified the response as a failure.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl RestError {
    /// Status code of an `Application` failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Application(e) => Some(e.status),
            _ => None,
        }
    }
}

/// Failure reported by an `ErrorPolicy`.
///
/// `message` is empty when the policy had nothing more descriptive than the
/// status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.status, .message))]
pub struct ApplicationError {
    pub status: u16,
    pub message: String,
}

impl ApplicationError {
    pub fn generic(status: u16) -> Self {
        Self {
            status,
            message: String::new(),
        }
    }

    pub fn with_message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

fn describe(status: &u16, message: &str) -> String {
    if message.is_empty() {
        format!("error {status} status code from request")
    } else {
        format!("error {status} status code from request: {message}")
    }
}

/// Errors raised by a `Transport` implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("transport error: {0}")]
    Other(String),
}

impl From<ureq::Error> for TransportError {
    fn from(e: ureq::Error) -> Self {
        TransportError::Http(Box::new(e))
    }
}
