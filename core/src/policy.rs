//! Response classification strategies.
//!
//! An `ErrorPolicy` looks at the status code and the fully read body and
//! decides whether the exchange failed. Domain clients ship their own policy
//! when the remote service returns structured error documents.

use crate::error::ApplicationError;

/// Maps a status code and response body to success or failure.
pub trait ErrorPolicy: Send + Sync {
    fn decide(&self, status: u16, body: &[u8]) -> Result<(), ApplicationError>;
}

/// Status-only policy used when a builder is given no other.
///
/// 200 and 201 succeed; everything else is a generic failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorPolicy;

impl ErrorPolicy for DefaultErrorPolicy {
    fn decide(&self, status: u16, _body: &[u8]) -> Result<(), ApplicationError> {
        match status {
            200 | 201 => Ok(()),
            _ => Err(ApplicationError::generic(status)),
        }
    }
}
