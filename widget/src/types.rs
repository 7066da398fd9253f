//! Widget DTOs.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A full widget as returned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Widget {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: String,
}

impl Widget {
    /// A widget is usable only with its id, uid and name present.
    pub fn validate(&self) -> Result<(), ApiError> {
        let missing: Vec<&str> = [("id", &self.id), ("uid", &self.uid), ("name", &self.name)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k)
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(ApiError::InvalidResponse(format!(
            "missing {}",
            missing.join(", ")
        )))
    }
}

/// Payload for creating or updating a widget.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WidgetNew {
    pub name: String,
    #[serde(default)]
    pub size: String,
}

impl WidgetNew {
    pub fn new(name: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: size.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.is_empty() {
            return Err(ApiError::InvalidInput("missing name".to_string()));
        }
        Ok(())
    }
}
