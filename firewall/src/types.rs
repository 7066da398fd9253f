//! Request and response documents of the firewall-management API.
//!
//! Field names follow the service's kebab-case JSON. Empty optional strings
//! are left out of serialized payloads.

use serde::{Deserialize, Serialize};

/// Login payload, borrowed from `FirewallConfig`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub user: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<&'a str>,
    #[serde(rename = "continue-last-session", skip_serializing_if = "is_false")]
    pub continue_last_session: bool,
    #[serde(rename = "enter-last-published-session", skip_serializing_if = "is_false")]
    pub enter_last_published_session: bool,
    #[serde(rename = "session-name", skip_serializing_if = "Option::is_none")]
    pub session_name: Option<&'a str>,
    #[serde(rename = "session-comments", skip_serializing_if = "Option::is_none")]
    pub session_comments: Option<&'a str>,
    #[serde(rename = "session-description", skip_serializing_if = "Option::is_none")]
    pub session_description: Option<&'a str>,
    #[serde(rename = "session-timeout")]
    pub session_timeout: u64,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Reply to a successful login.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(default)]
    pub sid: String,
    #[serde(default)]
    pub uid: String,
    #[serde(rename = "session-timeout", default)]
    pub session_timeout: u64,
    #[serde(rename = "read-only", default)]
    pub read_only: bool,
    #[serde(default)]
    pub standby: bool,
}

/// A host object. On `set-host`, `uid` or `name` selects the host and
/// `new_name` renames it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "ipv4-address", default, skip_serializing_if = "String::is_empty")]
    pub ipv4_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(rename = "new-name", default, skip_serializing_if = "String::is_empty")]
    pub new_name: String,
    #[serde(rename = "nat-settings", default, skip_serializing_if = "Option::is_none")]
    pub nat_settings: Option<NatSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NatSettings {
    #[serde(rename = "hide-behind", default, skip_serializing_if = "String::is_empty")]
    pub hide_behind: String,
    #[serde(rename = "ip-address", default, skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
    #[serde(rename = "auto-rule", default)]
    pub auto_rule: bool,
    #[serde(rename = "install-on", default, skip_serializing_if = "String::is_empty")]
    pub install_on: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
}

/// Selects an object by uid or by name.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ObjectRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ObjectRef {
    pub fn uid(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            name: None,
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            uid: None,
            name: Some(name.into()),
        }
    }
}

/// Empty JSON object, for calls that take no parameters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NoMessage {}

/// Generic `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Reply to `publish`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TaskResponse {
    #[serde(rename = "task-id", default)]
    pub task_id: String,
}

/// Reply to `discard`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DiscardResponse {
    #[serde(rename = "number-of-discarded-changes", default)]
    pub discarded_changes: u64,
    #[serde(default)]
    pub message: String,
}
