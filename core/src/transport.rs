//! The I/O boundary: something that turns an `HttpRequest` into an
//! `HttpResponse`.
//!
//! # Design
//! The request layer never opens connections itself. Timeouts, TLS and
//! pooling belong to whoever constructs the transport; `UreqTransport` is the
//! stock blocking implementation.

use std::time::Duration;

use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP exchange.
///
/// Implementations must return non-2xx responses as data; classifying them
/// is the job of the request's `ErrorPolicy`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Settings for the stock `UreqTransport`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound on a whole exchange, connect through body.
    pub timeout: Duration,
    /// Skip server certificate verification. Only meant for lab appliances
    /// with self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            accept_invalid_certs: false,
        }
    }
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(config.accept_invalid_certs)
                    .build(),
            )
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap an agent configured elsewhere. The agent must be built with
    /// `http_status_as_error(false)` so error statuses reach the policy.
    pub fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let body = request.body.as_slice();

        let response = match request.method {
            HttpMethod::Get => {
                let mut rb = self.agent.get(url);
                for (k, v) in &request.headers {
                    rb = rb.header(k.as_str(), v.as_str());
                }
                rb.call()
            }
            HttpMethod::Delete => {
                let mut rb = self.agent.delete(url);
                for (k, v) in &request.headers {
                    rb = rb.header(k.as_str(), v.as_str());
                }
                rb.call()
            }
            HttpMethod::Patch | HttpMethod::Post | HttpMethod::Put => {
                let mut rb = match request.method {
                    HttpMethod::Patch => self.agent.patch(url),
                    HttpMethod::Put => self.agent.put(url),
                    _ => self.agent.post(url),
                };
                for (k, v) in &request.headers {
                    rb = rb.header(k.as_str(), v.as_str());
                }
                if body.is_empty() {
                    rb.send_empty()
                } else {
                    rb.send(body)
                }
            }
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                let v = v.to_str().ok()?;
                Some((k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let reader = response.into_body().into_reader();

        Ok(HttpResponse {
            status,
            headers,
            body: Some(Box::new(reader)),
        })
    }
}
