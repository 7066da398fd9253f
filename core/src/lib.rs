//! Generic REST request layer.
//!
//! # Overview
//! `RequestBuilder` collects the declarative parts of a call (URL, method,
//! headers, body) together with two strategies: an `Authenticator` that
//! credentials the request and an `ErrorPolicy` that decides whether a
//! response is a failure. `build` validates everything up front and returns
//! an immutable `Request`; `Request::send` performs one exchange over an
//! injected `Transport` and hands back the raw body.
//!
//! # Design
//! - The transport is a trait object so callers control TLS, pooling and
//!   timeouts. `UreqTransport` is the blocking default.
//! - Bodies are opaque bytes in both directions. Decoding into domain types
//!   happens in the client crates layered on top.
//! - No retries, no background work, no shared global state.

pub mod auth;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod policy;
pub mod request;
pub mod transport;

pub use auth::{Authenticator, BasicAuth, BearerAuth, NoAuth};
pub use error::{ApplicationError, RestError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use policy::{DefaultErrorPolicy, ErrorPolicy};
pub use request::{Request, RequestBuilder};
pub use transport::{Transport, TransportConfig, UreqTransport};
