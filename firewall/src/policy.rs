//! Error policy for the management API's structured error documents.

use rest_core::{ApplicationError, ErrorPolicy};
use serde::Deserialize;
use tracing::warn;

/// One entry of the `errors`, `warnings` or `blocking-errors` arrays.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "current-session", default)]
    pub current_session: bool,
}

/// Error document returned with a non-200 status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub warnings: Vec<ErrorEntry>,
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
    #[serde(rename = "blocking-errors", default)]
    pub blocking_errors: Vec<ErrorEntry>,
}

impl ErrorResponse {
    /// Top-level message followed by every error and blocking-error message,
    /// one per line. Warnings are not failures and are left out.
    pub fn describe(&self) -> String {
        std::iter::once(&self.message)
            .chain(self.errors.iter().map(|e| &e.message))
            .chain(self.blocking_errors.iter().map(|e| &e.message))
            .filter(|m| !m.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Succeeds only on 200. Failures carry the text of the error document when
/// one can be read, otherwise just the status code.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirewallErrorPolicy;

impl ErrorPolicy for FirewallErrorPolicy {
    fn decide(&self, status: u16, body: &[u8]) -> Result<(), ApplicationError> {
        if status == 200 {
            return Ok(());
        }
        if body.is_empty() {
            return Err(ApplicationError::generic(status));
        }
        let doc: ErrorResponse = match serde_json::from_slice(body) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(status, error = %e, "unreadable error body");
                return Err(ApplicationError::generic(status));
            }
        };
        let message = doc.describe();
        if message.is_empty() {
            return Err(ApplicationError::generic(status));
        }
        Err(ApplicationError::with_message(status, message))
    }
}
