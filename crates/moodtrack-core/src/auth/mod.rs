//! Authentication module for managing sessions and credentials.
//!
//! This module provides:
//! - `SessionStore`: storage for the access/refresh token pair
//! - `FileSessionStore`: encrypted on-disk session; key in the OS keychain, or
//!   in a key file once the keychain has been unavailable
//! - `MemorySessionStore`: in-process session for tests and one-shot commands
//! - `CredentialStore`: remembered passwords via keyring
//!
//! Access tokens are valid for a day and refresh tokens for a week.

pub mod credentials;
pub mod keys;
pub mod session;

pub use credentials::CredentialStore;
pub use keys::{KeyVault, KeychainVault, SessionKey, SessionKeys};
pub use session::{
    FileSessionStore, MemorySessionStore, SessionStore, SessionTokens, StoredToken,
};
