//! Request construction and execution.
//!
//! # Design
//! `RequestBuilder` is a mutable accumulator. `build` validates it and
//! produces a `Request` that owns its own copy of the wire request, so the
//! builder can be reconfigured or dropped without touching anything already
//! built. A `Request` performs exactly one exchange per `send`; there is no
//! retry and no timeout handling at this layer.

use std::io::Read;
use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::auth::Authenticator;
use crate::error::RestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::policy::{DefaultErrorPolicy, ErrorPolicy};
use crate::transport::Transport;

const CONTENT_TYPE: &str = "Content-Type";

/// Accumulates request parameters and validates them into a `Request`.
///
/// Defaults: method `POST`, content type `application/json`, no transport,
/// no authenticator, no error policy.
#[derive(Clone)]
pub struct RequestBuilder {
    url: String,
    method: HttpMethod,
    content_type: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    auth: Option<Arc<dyn Authenticator>>,
    policy: Option<Arc<dyn ErrorPolicy>>,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: HttpMethod::Post,
            content_type: "application/json".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            auth: None,
            policy: None,
            transport: None,
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn auth(mut self, auth: Arc<dyn Authenticator>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Add a header. A later call with the same name (any case) replaces the
    /// earlier value. Empty names are ignored.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if key.is_empty() {
            return self;
        }
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
        self.headers.push((key, value.into()));
        self
    }

    pub fn error_policy(mut self, policy: Arc<dyn ErrorPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate the accumulated parts and produce a send-ready `Request`.
    pub fn build(&self) -> Result<Request, RestError> {
        let transport = self
            .transport
            .clone()
            .ok_or_else(|| RestError::Configuration("transport is not set".to_string()))?;
        let auth = self
            .auth
            .as_ref()
            .ok_or_else(|| RestError::Configuration("auth is not set".to_string()))?;
        validate_url(&self.url)?;
        if self.method.requires_body() && self.body.is_empty() {
            return Err(RestError::Configuration(format!(
                "an HTTP {} request requires a message body",
                self.method
            )));
        }

        let policy = self
            .policy
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultErrorPolicy));

        let mut wire = HttpRequest::new(self.method, self.url.clone());
        wire.body = self.body.clone();
        auth.apply(&mut wire);
        wire.set_header(CONTENT_TYPE, &self.content_type);
        for (k, v) in &self.headers {
            wire.set_header(k, v);
        }

        Ok(Request {
            transport,
            wire,
            policy,
        })
    }
}

fn validate_url(raw: &str) -> Result<(), RestError> {
    if raw.is_empty() {
        return Err(RestError::Configuration("a URL is not set".to_string()));
    }
    let parsed =
        Url::parse(raw).map_err(|e| RestError::Configuration(format!("invalid URL [{raw}]: {e}")))?;
    if !parsed.has_host() {
        return Err(RestError::Configuration(format!("invalid URL [{raw}]: missing host")));
    }
    Ok(())
}

/// A validated, immutable request bound to its transport and error policy.
pub struct Request {
    transport: Arc<dyn Transport>,
    wire: HttpRequest,
    policy: Arc<dyn ErrorPolicy>,
}

impl Request {
    pub fn method(&self) -> HttpMethod {
        self.wire.method
    }

    pub fn url(&self) -> &str {
        &self.wire.url
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.wire.header(name)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.wire.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.wire.body
    }

    /// Execute the exchange and return the raw response body.
    ///
    /// The body is only returned when the error policy accepts the response.
    pub fn send(&self) -> Result<Vec<u8>, RestError> {
        debug!(method = %self.wire.method, url = %self.wire.url, "rest send");
        let response = self.transport.execute(&self.wire)?;
        let (status, data) = read_response(response)?;
        debug!(status, bytes = data.len(), "rest response");
        self.policy.decide(status, &data)?;
        Ok(data)
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.wire.method)
            .field("url", &self.wire.url)
            .finish_non_exhaustive()
    }
}

/// Pull the status and the whole body out of a response. The body stream is
/// dropped on every path out of this function.
fn read_response(response: HttpResponse) -> Result<(u16, Vec<u8>), RestError> {
    let status = response.status;
    let mut data = Vec::new();
    if let Some(mut body) = response.body {
        body.read_to_end(&mut data).map_err(RestError::BodyRead)?;
    }
    Ok((status, data))
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::auth::{BearerAuth, NoAuth};
    use crate::error::{ApplicationError, TransportError};

    /// Transport that replays one canned reply and records what it was sent.
    struct Scripted {
        status: u16,
        body: Option<&'static [u8]>,
        calls: AtomicUsize,
        last: Mutex<Option<HttpRequest>>,
    }

    impl Scripted {
        fn new(status: u16, body: Option<&'static [u8]>) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            let mut resp = HttpResponse::new(self.status);
            if let Some(b) = self.body {
                resp = resp.with_body(Cursor::new(b));
            }
            Ok(resp)
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError::Other("connection refused".to_string()))
        }
    }

    /// Body reader that fails on first read and records whether it was dropped.
    struct Broken(Arc<AtomicBool>);

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    impl Drop for Broken {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    struct BrokenBody(Arc<AtomicBool>);

    impl Transport for BrokenBody {
        fn execute(&self, _: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(200).with_body(Broken(self.0.clone())))
        }
    }

    /// Policy that fails on any non-200 and echoes the body as the message.
    struct EchoPolicy;

    impl ErrorPolicy for EchoPolicy {
        fn decide(&self, status: u16, body: &[u8]) -> Result<(), ApplicationError> {
            if status == 200 {
                return Ok(());
            }
            Err(ApplicationError::with_message(
                status,
                String::from_utf8_lossy(body).into_owned(),
            ))
        }
    }

    fn builder(transport: Arc<dyn Transport>) -> RequestBuilder {
        RequestBuilder::new()
            .url("http://x/api/widget")
            .auth(Arc::new(NoAuth))
            .transport(transport)
    }

    #[test]
    fn build_requires_transport() {
        let err = RequestBuilder::new()
            .url("http://x/api")
            .auth(Arc::new(NoAuth))
            .method(HttpMethod::Get)
            .build()
            .unwrap_err();
        assert!(matches!(err, RestError::Configuration(_)));
    }

    #[test]
    fn build_requires_auth_and_makes_no_call() {
        let t = Scripted::new(200, None);
        let err = RequestBuilder::new()
            .url("http://x/api")
            .method(HttpMethod::Get)
            .transport(t.clone())
            .build()
            .unwrap_err();
        assert!(matches!(err, RestError::Configuration(_)));
        assert_eq!(t.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn build_rejects_empty_and_malformed_urls() {
        let t = Scripted::new(200, None);
        for url in ["", "not a url", "/relative/path", "mailto:someone"] {
            let err = builder(t.clone())
                .url(url)
                .method(HttpMethod::Get)
                .build()
                .unwrap_err();
            assert!(matches!(err, RestError::Configuration(_)), "{url:?}");
        }
        assert_eq!(t.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn post_and_put_require_body() {
        let t = Scripted::new(200, None);
        for method in [HttpMethod::Post, HttpMethod::Put] {
            let err = builder(t.clone()).method(method).build().unwrap_err();
            assert!(matches!(err, RestError::Configuration(_)));
        }
    }

    #[test]
    fn other_methods_accept_empty_body() {
        let t = Scripted::new(200, None);
        for method in [HttpMethod::Get, HttpMethod::Delete, HttpMethod::Patch] {
            assert!(builder(t.clone()).method(method).build().is_ok());
        }
    }

    #[test]
    fn explicit_header_overrides_content_type() {
        let req = builder(Scripted::new(200, None))
            .method(HttpMethod::Get)
            .content_type("text/plain")
            .header("content-type", "application/xml")
            .build()
            .unwrap();
        assert_eq!(req.header("Content-Type"), Some("application/xml"));
        let count = req
            .headers()
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn repeated_setters_overwrite() {
        let req = builder(Scripted::new(200, None))
            .method(HttpMethod::Get)
            .method(HttpMethod::Delete)
            .header("X-Trace", "1")
            .header("X-Trace", "2")
            .header("", "ignored")
            .build()
            .unwrap();
        assert_eq!(req.method(), HttpMethod::Delete);
        assert_eq!(req.header("x-trace"), Some("2"));
        assert_eq!(req.headers().len(), 2);
    }

    #[test]
    fn explicit_authorization_header_wins_over_authenticator() {
        // Explicit headers are applied after the authenticator, so they win.
        let req = builder(Scripted::new(200, None))
            .method(HttpMethod::Get)
            .header("Authorization", "Bearer manual")
            .build()
            .unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer manual"));

        let req = builder(Scripted::new(200, None))
            .method(HttpMethod::Get)
            .auth(Arc::new(BearerAuth::new("tok")))
            .build()
            .unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer tok"));
    }

    #[test]
    fn built_request_is_isolated_from_builder() {
        let b = builder(Scripted::new(200, None)).body(r#"{"name":"w"}"#);
        let first = b.build().unwrap();
        let b = b.url("http://y/other").header("X-Late", "1").body("{}");
        let second = b.build().unwrap();
        assert_eq!(first.url(), "http://x/api/widget");
        assert_eq!(first.header("X-Late"), None);
        assert_eq!(first.body(), br#"{"name":"w"}"#);
        assert_eq!(second.url(), "http://y/other");
    }

    #[test]
    fn send_returns_body_on_success() {
        let t = Scripted::new(200, Some(br#"{"id":"1"}"#));
        let req = builder(t.clone())
            .method(HttpMethod::Post)
            .body(r#"{"name":"w"}"#)
            .build()
            .unwrap();
        let data = req.send().unwrap();
        assert_eq!(data, br#"{"id":"1"}"#);

        let sent = t.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url, "http://x/api/widget");
        assert_eq!(sent.body, br#"{"name":"w"}"#);
        assert_eq!(sent.header("content-type"), Some("application/json"));
        assert_eq!(sent.header("authorization"), None);
    }

    #[test]
    fn send_without_body_yields_empty_bytes() {
        let req = builder(Scripted::new(201, None))
            .method(HttpMethod::Get)
            .build()
            .unwrap();
        assert!(req.send().unwrap().is_empty());
    }

    #[test]
    fn send_reports_policy_failure() {
        let req = builder(Scripted::new(500, Some(br#"{"message":"boom"}"#)))
            .method(HttpMethod::Post)
            .body(r#"{"name":"w"}"#)
            .error_policy(Arc::new(EchoPolicy))
            .build()
            .unwrap();
        let err = req.send().unwrap_err();
        assert!(matches!(err, RestError::Application(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn default_policy_applies_when_none_set() {
        let req = builder(Scripted::new(404, Some(b"missing")))
            .method(HttpMethod::Get)
            .build()
            .unwrap();
        let err = req.send().unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn transport_failure_is_surfaced() {
        let req = builder(Arc::new(Unreachable))
            .method(HttpMethod::Get)
            .build()
            .unwrap();
        assert!(matches!(req.send().unwrap_err(), RestError::Transport(_)));
    }

    #[test]
    fn body_read_failure_releases_stream() {
        let dropped = Arc::new(AtomicBool::new(false));
        let req = builder(Arc::new(BrokenBody(dropped.clone())))
            .method(HttpMethod::Get)
            .build()
            .unwrap();
        assert!(matches!(req.send().unwrap_err(), RestError::BodyRead(_)));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn request_can_be_sent_more_than_once() {
        let t = Scripted::new(200, Some(b"ok"));
        let req = builder(t.clone()).method(HttpMethod::Get).build().unwrap();
        req.send().unwrap();
        req.send().unwrap();
        assert_eq!(t.calls.load(Ordering::SeqCst), 2);
    }
}
