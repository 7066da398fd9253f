//! Session-aware client for the firewall-management API.
//!
//! # Design
//! Every call is a JSON `POST` to `{base_url}/{command}`. Calls other than
//! `login` first make sure the `SessionCache` holds a live session id and
//! send it in the `X-chkp-sid` header. The `Authorization` header is never
//! used: requests are built with `NoAuth` and the session header alone ties
//! them to the server-side session.

use std::sync::Arc;

use rest_core::{
    endpoint, ErrorPolicy, HttpMethod, NoAuth, RequestBuilder, RestError, Transport, UreqTransport,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::config::FirewallConfig;
use crate::error::ApiError;
use crate::policy::FirewallErrorPolicy;
use crate::session::{Clock, Session, SessionCache, SystemClock};
use crate::types::{
    DiscardResponse, Host, LoginResponse, MessageResponse, NoMessage, ObjectRef, TaskResponse,
};

/// Header carrying the session id on authenticated calls.
pub const SESSION_HEADER: &str = "X-chkp-sid";

const LOGIN: &str = "login";
const LOGOUT: &str = "logout";
const ADD_HOST: &str = "add-host";
const SHOW_HOST: &str = "show-host";
const SET_HOST: &str = "set-host";
const DELETE_HOST: &str = "delete-host";
const PUBLISH: &str = "publish";
const DISCARD: &str = "discard";

pub struct FirewallClient {
    base_url: String,
    config: FirewallConfig,
    transport: Arc<dyn Transport>,
    policy: Arc<dyn ErrorPolicy>,
    session: SessionCache,
}

impl FirewallClient {
    /// Build a client with a `UreqTransport` made from `config.transport`.
    pub fn new(config: FirewallConfig) -> Result<Self, ApiError> {
        let transport = Arc::new(UreqTransport::new(&config.transport));
        Self::with_transport(config, transport)
    }

    /// Build a client over a transport constructed elsewhere.
    pub fn with_transport(
        config: FirewallConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ApiError> {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: FirewallConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ApiError> {
        let base_url = endpoint::base_url(&config.base_url)?;
        let session = SessionCache::new(config.safety_margin, clock);
        Ok(Self {
            base_url,
            config,
            transport,
            policy: Arc::new(FirewallErrorPolicy),
            session,
        })
    }

    /// Log in now, replacing any cached session.
    pub fn login(&self) -> Result<LoginResponse, ApiError> {
        let resp = self.open_session()?;
        self.session.store(session_of(&resp));
        Ok(resp)
    }

    /// End the current session on the server and forget it locally.
    ///
    /// The cached session is dropped whenever the request reached the
    /// server, even if the reply was an error or could not be decoded.
    pub fn logout(&self) -> Result<(), ApiError> {
        let result: Result<MessageResponse, ApiError> = self.call(LOGOUT, &NoMessage {}, true);
        match &result {
            Err(ApiError::Serialization(_))
            | Err(ApiError::Rest(RestError::Configuration(_)))
            | Err(ApiError::Rest(RestError::Transport(_))) => {}
            _ => self.session.clear(),
        }
        result.map(|_| ())
    }

    pub fn create_host(&self, host: &Host) -> Result<Host, ApiError> {
        self.call(ADD_HOST, host, true)
    }

    pub fn show_host(&self, target: &ObjectRef) -> Result<Host, ApiError> {
        self.call(SHOW_HOST, target, true)
    }

    /// Update the host selected by `host.uid` (or `host.name`).
    pub fn set_host(&self, host: &Host) -> Result<Host, ApiError> {
        self.call(SET_HOST, host, true)
    }

    pub fn delete_host(&self, target: &ObjectRef) -> Result<(), ApiError> {
        let _: MessageResponse = self.call(DELETE_HOST, target, true)?;
        Ok(())
    }

    /// Make the session's pending changes visible to other sessions.
    pub fn publish(&self) -> Result<TaskResponse, ApiError> {
        self.call(PUBLISH, &NoMessage {}, true)
    }

    /// Throw away the session's unpublished changes.
    pub fn discard(&self) -> Result<DiscardResponse, ApiError> {
        self.call(DISCARD, &NoMessage {}, true)
    }

    /// The cached session id, if it is still live.
    pub fn session_id(&self) -> Option<String> {
        self.session.current()
    }

    fn open_session(&self) -> Result<LoginResponse, ApiError> {
        let resp: LoginResponse = self.call(LOGIN, &self.config.login_request(), false)?;
        if resp.sid.is_empty() {
            return Err(ApiError::Session(
                "unable to obtain the session identifier".to_string(),
            ));
        }
        info!(timeout = resp.session_timeout, "firewall session established");
        Ok(resp)
    }

    fn call<M, T>(&self, command: &str, msg: &M, authenticated: bool) -> Result<T, ApiError>
    where
        M: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(msg).map_err(ApiError::Serialization)?;

        let mut builder = RequestBuilder::new()
            .url(endpoint::join(&self.base_url, command, None))
            .method(HttpMethod::Post)
            .auth(Arc::new(NoAuth))
            .header("Accept", "application/json")
            .body(body)
            .error_policy(self.policy.clone())
            .transport(self.transport.clone());

        if authenticated {
            let sid = self
                .session
                .ensure_valid(|| self.open_session().map(|r| session_of(&r)))?;
            builder = builder.header(SESSION_HEADER, sid);
        }

        let data = builder.build()?.send()?;
        serde_json::from_slice(&data).map_err(ApiError::Decode)
    }
}

fn session_of(resp: &LoginResponse) -> Session {
    Session {
        sid: resp.sid.clone(),
        timeout: std::time::Duration::from_secs(resp.session_timeout),
    }
}

impl std::fmt::Debug for FirewallClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirewallClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
