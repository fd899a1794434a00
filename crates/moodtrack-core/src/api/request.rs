//! Outgoing request descriptors.

use reqwest::Method;
use serde_json::Value;

use crate::models::PageRequest;

/// A request against the API base URL.
///
/// Descriptors are built per call and never mutated by the client; the
/// retry state travels separately in a [`RequestContext`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add `offset`/`limit` parameters for a list page
    pub fn page(mut self, page: PageRequest) -> Self {
        self.query.extend(
            page.query_pairs()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        self
    }
}

/// Per-attempt state for a request.
///
/// A fresh context is produced for every attempt; `retried` is true only on
/// the single replay that follows a successful token refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    retried: bool,
}

impl RequestContext {
    pub fn initial() -> Self {
        Self { retried: false }
    }

    /// Context for the replay after a token refresh
    pub fn for_retry(self) -> Self {
        Self { retried: true }
    }

    pub fn retried(&self) -> bool {
        self.retried
    }
}
