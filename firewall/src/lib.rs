//! Client for a session-based firewall-management REST API.
//!
//! # Overview
//! `FirewallClient` logs in with user credentials, caches the returned
//! session id and presents it on every later call until the session nears
//! its declared timeout, at which point the next call logs in again.
//!
//! # Design
//! - Requests go through `rest_core::RequestBuilder` with `NoAuth`; the
//!   session rides in the `X-chkp-sid` header instead.
//! - `FirewallErrorPolicy` turns the service's `{message, errors[]}` error
//!   documents into readable failures.
//! - Session state is owned by the client and guarded by a mutex, so one
//!   client can be shared across threads without duplicate logins.

pub mod client;
pub mod config;
pub mod error;
pub mod policy;
pub mod session;
pub mod types;

pub use client::{FirewallClient, SESSION_HEADER};
pub use config::FirewallConfig;
pub use error::ApiError;
pub use policy::{ErrorEntry, ErrorResponse, FirewallErrorPolicy};
pub use session::{Clock, ManualClock, Session, SessionCache, SystemClock};
pub use types::{
    DiscardResponse, Host, LoginResponse, MessageResponse, NatSettings, NoMessage, ObjectRef,
    TaskResponse,
};
