//! CRUD client for the widget service.
//!
//! # Design
//! `WidgetClient` holds the base URL, a transport and an authenticator, and
//! no per-call state. Each operation serializes its payload, builds one
//! request through `rest_core::RequestBuilder`, sends it and validates the
//! decoded widget before returning it.

use std::sync::Arc;

use rest_core::{
    endpoint, Authenticator, ErrorPolicy, HttpMethod, NoAuth, RequestBuilder, Transport,
    TransportConfig, UreqTransport,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::policy::WidgetErrorPolicy;
use crate::types::{Widget, WidgetNew};

const WIDGET: &str = "widget";

#[derive(Clone)]
pub struct WidgetClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    auth: Arc<dyn Authenticator>,
    policy: Arc<dyn ErrorPolicy>,
}

impl WidgetClient {
    /// Build a client over a transport constructed elsewhere.
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self, ApiError> {
        let base_url = endpoint::base_url(base_url)?;
        Ok(Self {
            base_url,
            transport,
            auth: Arc::new(NoAuth),
            policy: Arc::new(WidgetErrorPolicy),
        })
    }

    /// Build a client with a `UreqTransport`. The widget service is expected
    /// to answer quickly, so the default timeout is 2 seconds.
    pub fn connect(base_url: &str) -> Result<Self, ApiError> {
        let config = TransportConfig {
            timeout: std::time::Duration::from_secs(2),
            ..TransportConfig::default()
        };
        Self::new(base_url, Arc::new(UreqTransport::new(&config)))
    }

    /// Credential every request with `auth` instead of sending none.
    pub fn with_auth(mut self, auth: Arc<dyn Authenticator>) -> Self {
        self.auth = auth;
        self
    }

    pub fn create_widget(&self, widget: &WidgetNew) -> Result<Widget, ApiError> {
        widget.validate()?;
        let body = serde_json::to_vec(widget).map_err(ApiError::Serialization)?;
        let r: Widget = self.send(HttpMethod::Post, None, body)?;
        r.validate()?;
        Ok(r)
    }

    pub fn get_widget(&self, id: &str) -> Result<Widget, ApiError> {
        let r: Widget = self.send(HttpMethod::Get, Some(id), Vec::new())?;
        r.validate()?;
        Ok(r)
    }

    /// Replace the name and size of widget `id`.
    pub fn update_widget(&self, id: &str, widget: &WidgetNew) -> Result<Widget, ApiError> {
        widget.validate()?;
        let body = serde_json::to_vec(widget).map_err(ApiError::Serialization)?;
        let r: Widget = self.send(HttpMethod::Post, Some(id), body)?;
        r.validate()?;
        Ok(r)
    }

    pub fn delete_widget(&self, id: &str) -> Result<(), ApiError> {
        self.request(HttpMethod::Delete, Some(id), Vec::new())?;
        Ok(())
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        id: Option<&str>,
        body: Vec<u8>,
    ) -> Result<T, ApiError> {
        let data = self.request(method, id, body)?;
        serde_json::from_slice(&data).map_err(ApiError::Decode)
    }

    fn request(
        &self,
        method: HttpMethod,
        id: Option<&str>,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = endpoint::join(&self.base_url, WIDGET, id);
        debug!(%method, %url, "widget request");
        let data = RequestBuilder::new()
            .url(url)
            .method(method)
            .auth(self.auth.clone())
            .body(body)
            .error_policy(self.policy.clone())
            .transport(self.transport.clone())
            .build()?
            .send()?;
        Ok(data)
    }
}

impl std::fmt::Debug for WidgetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
