//! Credential strategies applied to an outbound request.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::http::HttpRequest;

const AUTHORIZATION: &str = "Authorization";

/// Decides how an `HttpRequest` is credentialed.
pub trait Authenticator: Send + Sync {
    fn apply(&self, request: &mut HttpRequest);
}

/// Explicitly unauthenticated: strips any `Authorization` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn apply(&self, request: &mut HttpRequest) {
        request.remove_header(AUTHORIZATION);
    }
}

/// HTTP Basic authentication.
#[derive(Clone)]
pub struct BasicAuth {
    user: String,
    password: String,
}

impl BasicAuth {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    fn token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.user, self.password))
    }
}

impl Authenticator for BasicAuth {
    fn apply(&self, request: &mut HttpRequest) {
        request.set_header(AUTHORIZATION, &format!("Basic {}", self.token()));
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token authentication.
#[derive(Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Authenticator for BearerAuth {
    fn apply(&self, request: &mut HttpRequest) {
        request.set_header(AUTHORIZATION, &format!("Bearer {}", self.token));
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth").field("token", &"<redacted>").finish()
    }
}
