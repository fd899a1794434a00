//! REST API client module for the emotion-tracker backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to submit emotions and fetch personal and unit summaries.
//!
//! The API uses JWT bearer token authentication. Access tokens are
//! renewed transparently through the refresh endpoint when a request
//! is rejected with 401.

pub mod client;
pub mod error;
pub mod request;

pub use client::ApiClient;
pub use error::ApiError;
pub use request::{ApiRequest, RequestContext};
