//! Core library for moodtrack.
//!
//! This crate holds everything that talks to the emotion-tracker API and
//! everything the terminal front end needs to make sense of the answers:
//!
//! - `api`: the authenticated HTTP client and its error type
//! - `auth`: session token storage and remembered passwords
//! - `notify`: user-facing notifications and the login redirect hook
//! - `models`: API data types and pagination envelopes
//! - `period`: morning/evening submission windows
//! - `dashboard`: role-specific dashboard loading
//! - `config`: persisted client configuration
//! - `utils`: formatting helpers

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod notify;
pub mod period;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{FileSessionStore, MemorySessionStore, SessionStore};
pub use config::Config;
pub use dashboard::Dashboard;
pub use notify::{LoginRedirect, Navigator, Notification, Notifier, ToastQueue};
