use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::keys::{KeyVault, KeychainVault, SessionKey, SessionKeys};

/// Session file name in cache directory
pub const SESSION_FILE: &str = "session.bin";

/// Key file used when the keychain is unavailable
const KEY_FILE: &str = "session.key";

/// Access tokens are issued for one day
const ACCESS_TOKEN_TTL_HOURS: i64 = 24;

/// Refresh tokens are issued for seven days
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// A token together with the moment we stop trusting it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn new(value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            value: value.into(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn access(value: impl Into<String>) -> Self {
        Self::new(value, Duration::hours(ACCESS_TOKEN_TTL_HOURS))
    }

    pub fn refresh(value: impl Into<String>) -> Self {
        Self::new(value, Duration::days(REFRESH_TOKEN_TTL_DAYS))
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// The access/refresh pair persisted between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access: Option<StoredToken>,
    pub refresh: Option<StoredToken>,
}

impl SessionTokens {
    pub fn issued(access: &str, refresh: &str) -> Self {
        Self {
            access: Some(StoredToken::access(access)),
            refresh: Some(StoredToken::refresh(refresh)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

fn live(token: Option<StoredToken>) -> Option<String> {
    token.filter(|t| !t.is_expired()).map(|t| t.value)
}

/// Storage for the session token pair.
///
/// Implementations only load, save and clear; the provided methods apply
/// expiry and rotation on top.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<SessionTokens>;

    fn save(&self, tokens: &SessionTokens) -> Result<()>;

    fn clear(&self) -> Result<()>;

    /// The access token, if one is stored and still valid
    fn access_token(&self) -> Option<String> {
        self.load().ok().and_then(|t| live(t.access))
    }

    /// The refresh token, if one is stored and still valid
    fn refresh_token(&self) -> Option<String> {
        self.load().ok().and_then(|t| live(t.refresh))
    }

    /// Persist the pair returned by a login
    fn store_login(&self, access: &str, refresh: &str) -> Result<()> {
        self.save(&SessionTokens::issued(access, refresh))
    }

    /// Persist a refreshed access token, and the refresh token when the
    /// server rotated it
    fn store_refreshed(&self, access: &str, rotated_refresh: Option<&str>) -> Result<()> {
        let mut tokens = self.load().unwrap_or_default();
        tokens.access = Some(StoredToken::access(access));
        if let Some(refresh) = rotated_refresh {
            tokens.refresh = Some(StoredToken::refresh(refresh));
        }
        self.save(&tokens)
    }

    /// Whether there is anything left to authenticate with
    fn is_authenticated(&self) -> bool {
        self.access_token().is_some() || self.refresh_token().is_some()
    }
}

/// Session kept in process memory only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: Mutex<SessionTokens>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: Mutex::new(tokens),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<SessionTokens> {
        self.tokens
            .lock()
            .map(|t| t.clone())
            .map_err(|_| anyhow!("Session lock poisoned"))
    }

    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        *guard = tokens.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save(&SessionTokens::default())
    }
}

/// Session persisted to disk, encrypted with a [`SessionKey`]
pub struct FileSessionStore {
    path: PathBuf,
    keys: SessionKeys,
}

impl FileSessionStore {
    pub fn new(path: PathBuf, key: SessionKey) -> Self {
        Self::with_keys(path, SessionKeys::single(key))
    }

    pub fn with_keys(path: PathBuf, keys: SessionKeys) -> Self {
        Self { path, keys }
    }

    /// Store in `cache_dir`, with the key from the OS keychain
    pub fn open(cache_dir: &Path) -> Result<Self> {
        Self::open_with(cache_dir, &KeychainVault)
    }

    pub fn open_with(cache_dir: &Path, vault: &dyn KeyVault) -> Result<Self> {
        let keys = SessionKeys::resolve(&cache_dir.join(KEY_FILE), vault)?;
        Ok(Self::with_keys(cache_dir.join(SESSION_FILE), keys))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn discard(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(error = %e, "Failed to remove unreadable session file");
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<SessionTokens> {
        if !self.path.exists() {
            return Ok(SessionTokens::default());
        }

        let sealed = std::fs::read(&self.path).context("Failed to read session file")?;

        // Sealed under a key we cannot reach right now; keep it for a run that can
        let (plain, via_fallback) = match self.keys.decrypt(&sealed) {
            Ok(opened) => opened,
            Err(e) => {
                warn!(error = %e, "Session file sealed with another key, treating as logged out");
                return Ok(SessionTokens::default());
            }
        };

        match serde_json::from_slice::<SessionTokens>(&plain) {
            Ok(tokens) => {
                if via_fallback {
                    debug!("Resealing session with the current key");
                    if let Err(e) = self.save(&tokens) {
                        warn!(error = %e, "Failed to reseal session file");
                    }
                }
                Ok(tokens)
            }
            Err(e) => {
                warn!(error = %e, "Discarding damaged session file");
                self.discard();
                Ok(SessionTokens::default())
            }
        }
    }

    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let plain = serde_json::to_vec(tokens)?;
        let sealed = self.keys.encrypt(&plain)?;
        std::fs::write(&self.path, sealed).context("Failed to write session file")?;
        debug!(path = ?self.path, "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        debug!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::keys::tests::FlakyVault;

    #[test]
    fn test_store_login_sets_both_tokens() {
        let store = MemorySessionStore::new();
        assert!(!store.is_authenticated());

        store.store_login("access-1", "refresh-1").expect("store");
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));

        let tokens = store.load().expect("load");
        let access_ttl = tokens.access.expect("access").expires_at - Utc::now();
        let refresh_ttl = tokens.refresh.expect("refresh").expires_at - Utc::now();
        assert!(access_ttl <= Duration::hours(24) && access_ttl > Duration::hours(23));
        assert!(refresh_ttl <= Duration::days(7) && refresh_ttl > Duration::days(6));
    }

    #[test]
    fn test_expired_tokens_are_not_returned() {
        let store = MemorySessionStore::with_tokens(SessionTokens {
            access: Some(StoredToken::new("stale", Duration::minutes(-1))),
            refresh: Some(StoredToken::refresh("refresh-1")),
        });
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_store_refreshed_keeps_refresh_unless_rotated() {
        let store = MemorySessionStore::new();
        store.store_login("access-1", "refresh-1").expect("store");

        store.store_refreshed("access-2", None).expect("refresh");
        assert_eq!(store.access_token().as_deref(), Some("access-2"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));

        store.store_refreshed("access-3", Some("refresh-2")).expect("rotate");
        assert_eq!(store.access_token().as_deref(), Some("access-3"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-2"));
    }

    #[test]
    fn test_clear() {
        let store = MemorySessionStore::new();
        store.store_login("a", "r").expect("store");
        store.clear().expect("clear");
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(SESSION_FILE);
        let key = SessionKey::generate();

        let store = FileSessionStore::new(path.clone(), key.clone());
        store.store_login("access-1", "refresh-1").expect("store");

        let raw = std::fs::read(&path).expect("read raw");
        assert!(!String::from_utf8_lossy(&raw).contains("refresh-1"));

        let reopened = FileSessionStore::new(path, key);
        assert_eq!(reopened.access_token().as_deref(), Some("access-1"));
        assert_eq!(reopened.refresh_token().as_deref(), Some("refresh-1"));

        reopened.clear().expect("clear");
        assert!(!reopened.path().exists());
        assert!(reopened.load().expect("load").is_empty());
    }

    #[test]
    fn test_file_store_wrong_key_keeps_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SESSION_FILE);
        let key = SessionKey::generate();

        FileSessionStore::new(path.clone(), key.clone())
            .store_login("a", "r")
            .expect("store");

        let other = FileSessionStore::new(path.clone(), SessionKey::generate());
        assert!(other.load().expect("load").is_empty());
        assert!(path.exists());

        let original = FileSessionStore::new(path, key);
        assert_eq!(original.refresh_token().as_deref(), Some("r"));
    }

    #[test]
    fn test_damaged_session_is_discarded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SESSION_FILE);
        let key = SessionKey::generate();
        std::fs::write(&path, key.encrypt(b"not json").expect("encrypt")).expect("write");

        let store = FileSessionStore::new(path.clone(), key);
        assert!(store.load().expect("load").is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_session_survives_keychain_outage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FlakyVault::default();

        // Logged in while the keychain worked
        FileSessionStore::open_with(dir.path(), &vault)
            .expect("open")
            .store_login("access-1", "refresh-1")
            .expect("store");

        // Keychain locked: session unreadable but not deleted
        vault.set_down(true);
        let offline = FileSessionStore::open_with(dir.path(), &vault).expect("open");
        assert!(!offline.is_authenticated());
        assert!(offline.path().exists());

        // Keychain back: the old session opens and is resealed with the file key
        vault.set_down(false);
        let online = FileSessionStore::open_with(dir.path(), &vault).expect("open");
        assert_eq!(online.refresh_token().as_deref(), Some("refresh-1"));

        vault.set_down(true);
        let offline_again = FileSessionStore::open_with(dir.path(), &vault).expect("open");
        assert_eq!(offline_again.refresh_token().as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_session_saved_offline_survives_keychain_return() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FlakyVault::default();

        vault.set_down(true);
        FileSessionStore::open_with(dir.path(), &vault)
            .expect("open")
            .store_login("access-1", "refresh-1")
            .expect("store");

        vault.set_down(false);
        let online = FileSessionStore::open_with(dir.path(), &vault).expect("open");
        assert_eq!(online.access_token().as_deref(), Some("access-1"));
    }
}
