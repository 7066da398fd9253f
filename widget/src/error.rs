//! Error types for the widget client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers routinely treat "the
//! widget is gone" differently from other failures, for example by dropping
//! it from their own state. Every other service failure stays inside `Rest`
//! with its status and message.

use rest_core::RestError;
use thiserror::Error;

/// Errors returned by `WidgetClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered 404 for the requested widget.
    #[error("widget not found")]
    NotFound,

    /// Building or sending the request failed, or the service reported an error.
    #[error(transparent)]
    Rest(RestError),

    /// The payload was rejected before anything was sent.
    #[error("invalid widget: {0}")]
    InvalidInput(String),

    /// The response decoded but lacked required fields.
    #[error("unable to transform to widget: {0}")]
    InvalidResponse(String),

    /// The request payload could not be serialized to JSON.
    #[error("unable to create json message: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be decoded into the expected type.
    #[error("failed to transform response message: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<RestError> for ApiError {
    fn from(e: RestError) -> Self {
        match e.status() {
            Some(404) => ApiError::NotFound,
            _ => ApiError::Rest(e),
        }
    }
}
