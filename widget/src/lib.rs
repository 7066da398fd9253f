//! Client for the widget CRUD service.
//!
//! # Overview
//! Create, read, update and delete widgets over JSON. Responses are checked
//! for the fields callers rely on, and a 404 comes back as
//! `ApiError::NotFound` so callers can tell a vanished widget from a failing
//! service.

pub mod client;
pub mod error;
pub mod policy;
pub mod types;

pub use client::WidgetClient;
pub use error::ApiError;
pub use policy::WidgetErrorPolicy;
pub use types::{Widget, WidgetNew};
