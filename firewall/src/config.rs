//! Client configuration.

use std::fmt;
use std::time::Duration;

use rest_core::TransportConfig;

use crate::types::LoginRequest;

/// Everything a `FirewallClient` needs at construction time.
#[derive(Clone)]
pub struct FirewallConfig {
    /// Service root, e.g. `https://mgmt.example.com/web_api/v1.3`.
    pub base_url: String,
    pub user: String,
    pub password: String,
    pub domain: Option<String>,
    /// Timeout requested at login. The server's reply is what the cache uses.
    pub session_timeout: Duration,
    pub continue_last_session: bool,
    pub enter_last_published_session: bool,
    pub session_name: Option<String>,
    pub session_comments: Option<String>,
    pub session_description: Option<String>,
    /// Subtracted from the session timeout when deciding to log in again.
    pub safety_margin: Duration,
    pub transport: TransportConfig,
}

impl FirewallConfig {
    /// Defaults: 600 s session, 5 s margin, continue the last session.
    pub fn new(base_url: &str, user: &str, password: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            domain: None,
            session_timeout: Duration::from_secs(600),
            continue_last_session: true,
            enter_last_published_session: false,
            session_name: None,
            session_comments: None,
            session_description: None,
            safety_margin: Duration::from_secs(5),
            transport: TransportConfig::default(),
        }
    }

    /// Enter the user's last published session instead of continuing the last one.
    pub fn set_session_last_publish(&mut self, last: bool) -> &mut Self {
        self.enter_last_published_session = last;
        self
    }

    /// Continue the user's last session.
    pub fn set_session_continue_last(&mut self, last: bool) -> &mut Self {
        self.continue_last_session = last;
        self
    }

    pub(crate) fn login_request(&self) -> LoginRequest<'_> {
        LoginRequest {
            user: &self.user,
            password: &self.password,
            domain: self.domain.as_deref(),
            continue_last_session: self.continue_last_session,
            enter_last_published_session: self.enter_last_published_session,
            session_name: self.session_name.as_deref(),
            session_comments: self.session_comments.as_deref(),
            session_description: self.session_description.as_deref(),
            session_timeout: self.session_timeout.as_secs(),
        }
    }
}

impl fmt::Debug for FirewallConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirewallConfig")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("domain", &self.domain)
            .field("session_timeout", &self.session_timeout)
            .field("continue_last_session", &self.continue_last_session)
            .field("enter_last_published_session", &self.enter_last_published_session)
            .field("safety_margin", &self.safety_margin)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_continue_last_session() {
        let conf = FirewallConfig::new("https://mgmt/web_api", "admin", "pw");
        assert_eq!(conf.session_timeout, Duration::from_secs(600));
        assert_eq!(conf.safety_margin, Duration::from_secs(5));
        assert!(conf.continue_last_session);
        assert!(!conf.enter_last_published_session);
    }

    #[test]
    fn session_toggles_flow_into_login() {
        let mut conf = FirewallConfig::new("https://mgmt/web_api", "admin", "pw");
        conf.set_session_continue_last(false).set_session_last_publish(true);
        let req = conf.login_request();
        assert!(!req.continue_last_session);
        assert!(req.enter_last_published_session);
        assert_eq!(req.session_timeout, 600);
    }

    #[test]
    fn debug_redacts_password() {
        let conf = FirewallConfig::new("https://mgmt/web_api", "admin", "s3cret!");
        let out = format!("{conf:?}");
        assert!(out.contains("admin"));
        assert!(!out.contains("s3cret!"));
    }
}
