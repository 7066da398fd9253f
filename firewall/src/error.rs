//! Error types for the firewall-management client.

use rest_core::RestError;
use thiserror::Error;

/// Errors returned by `FirewallClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Building or sending the request failed, or the service reported an error.
    #[error(transparent)]
    Rest(#[from] RestError),

    /// The request payload could not be serialized to JSON.
    #[error("unable to create json message: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be decoded into the expected type.
    #[error("failed to transform response message: {0}")]
    Decode(#[source] serde_json::Error),

    /// Login completed but did not yield a usable session.
    #[error("session error: {0}")]
    Session(String),
}

impl ApiError {
    /// HTTP status of a service-reported failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rest(e) => e.status(),
            _ => None,
        }
    }
}
