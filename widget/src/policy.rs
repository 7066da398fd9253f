//! Error policy for Spring-style `{error, message}` error bodies.

use rest_core::{ApplicationError, ErrorPolicy};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
struct SpringError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// Any 2xx succeeds. Otherwise the `{error, message}` body, when readable,
/// becomes the failure text.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetErrorPolicy;

impl ErrorPolicy for WidgetErrorPolicy {
    fn decide(&self, status: u16, body: &[u8]) -> Result<(), ApplicationError> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        if body.is_empty() {
            return Err(ApplicationError::generic(status));
        }
        let doc: SpringError = match serde_json::from_slice(body) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(status, error = %e, "unreadable error body");
                return Err(ApplicationError::generic(status));
            }
        };
        let message = match (doc.error.is_empty(), doc.message.is_empty()) {
            (true, true) => return Err(ApplicationError::generic(status)),
            (false, true) => doc.error,
            (true, false) => doc.message,
            (false, false) => format!("{}: {}", doc.error, doc.message),
        };
        Err(ApplicationError::with_message(status, message))
    }
}
