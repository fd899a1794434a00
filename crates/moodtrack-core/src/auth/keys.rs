use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use tracing::{debug, warn};

use super::credentials::keychain_entry;

/// Keychain account holding the session encryption key
const KEY_ACCOUNT: &str = "session-key";

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Symmetric key used to encrypt the session file at rest
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey([u8; KEY_LEN]);

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

impl SessionKey {
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        Self(key)
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        <[u8; KEY_LEN]>::try_from(bytes).ok().map(Self)
    }

    /// Encrypt with ChaCha20-Poly1305; the random nonce is prepended
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));

        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| anyhow!("Failed to encrypt session data"))?;

        let mut out = nonce.to_vec();
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() < NONCE_LEN {
            return Err(anyhow!("Session data too short"));
        }
        let (nonce, ciphertext) = data.split_at(NONCE_LEN);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| anyhow!("Failed to decrypt session data"))
    }
}

/// Secure storage able to hold the session key
pub trait KeyVault {
    /// The stored key, `Ok(None)` when none has been created yet
    fn read(&self) -> Result<Option<SessionKey>>;

    fn write(&self, key: &SessionKey) -> Result<()>;
}

/// The OS keychain
pub struct KeychainVault;

impl KeyVault for KeychainVault {
    fn read(&self) -> Result<Option<SessionKey>> {
        match keychain_entry(KEY_ACCOUNT)?.get_secret() {
            Ok(bytes) => {
                let key = SessionKey::from_bytes(&bytes);
                if key.is_none() {
                    warn!(len = bytes.len(), "Stored session key has wrong length, ignoring");
                }
                Ok(key)
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read session key from keychain"),
        }
    }

    fn write(&self, key: &SessionKey) -> Result<()> {
        keychain_entry(KEY_ACCOUNT)?
            .set_secret(&key.0)
            .context("Failed to store session key in keychain")
    }
}

/// Keys that may open the session file.
///
/// `primary` seals every write; `fallback` only opens files sealed before
/// the primary took over.
#[derive(Debug, Clone)]
pub struct SessionKeys {
    pub primary: SessionKey,
    pub fallback: Option<SessionKey>,
}

impl SessionKeys {
    pub fn single(key: SessionKey) -> Self {
        Self {
            primary: key,
            fallback: None,
        }
    }

    /// Pick the sealing key.
    ///
    /// An existing key file always wins, so runs with and without a working
    /// keychain seal with the same key. The keychain key is created only
    /// when no key file exists, and is kept as a fallback for opening
    /// sessions it sealed earlier.
    pub fn resolve(key_file: &Path, vault: &dyn KeyVault) -> Result<Self> {
        if let Some(primary) = read_key_file(key_file)? {
            let fallback = match vault.read() {
                Ok(key) => key.filter(|k| *k != primary),
                Err(e) => {
                    debug!(error = %e, "Keychain unavailable, key file only");
                    None
                }
            };
            return Ok(Self { primary, fallback });
        }

        let key = match vault.read() {
            Ok(Some(key)) => return Ok(Self::single(key)),
            Ok(None) => {
                let key = SessionKey::generate();
                match vault.write(&key) {
                    Ok(()) => return Ok(Self::single(key)),
                    Err(e) => {
                        warn!(error = %e, "Could not store session key in keychain, using key file");
                        key
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Keychain unavailable, using key file");
                SessionKey::generate()
            }
        };

        write_key_file(key_file, &key)?;
        Ok(Self::single(key))
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.primary.encrypt(plaintext)
    }

    /// Open `data` with whichever key sealed it.
    ///
    /// The flag is true when the fallback key was needed.
    pub fn decrypt(&self, data: &[u8]) -> Result<(Vec<u8>, bool)> {
        match self.primary.decrypt(data) {
            Ok(plain) => Ok((plain, false)),
            Err(e) => match self.fallback {
                Some(ref fallback) => fallback.decrypt(data).map(|plain| (plain, true)),
                None => Err(e),
            },
        }
    }
}

fn read_key_file(path: &Path) -> Result<Option<SessionKey>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = std::fs::read(path).context("Failed to read session key file")?;
    let key = SessionKey::from_bytes(&bytes);
    if key.is_none() {
        warn!("Session key file is corrupt, ignoring");
    }
    Ok(key)
}

fn write_key_file(path: &Path, key: &SessionKey) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, key.0).context("Failed to write session key file")?;
    restrict_permissions(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory keychain that can be switched off
    #[derive(Default)]
    pub(crate) struct FlakyVault {
        key: Mutex<Option<SessionKey>>,
        down: AtomicBool,
    }

    impl FlakyVault {
        pub(crate) fn set_down(&self, down: bool) {
            self.down.store(down, Ordering::SeqCst);
        }

        pub(crate) fn stored(&self) -> Option<SessionKey> {
            self.key.lock().expect("lock").clone()
        }
    }

    impl KeyVault for FlakyVault {
        fn read(&self) -> Result<Option<SessionKey>> {
            if self.down.load(Ordering::SeqCst) {
                return Err(anyhow!("keychain locked"));
            }
            Ok(self.stored())
        }

        fn write(&self, key: &SessionKey) -> Result<()> {
            if self.down.load(Ordering::SeqCst) {
                return Err(anyhow!("keychain locked"));
            }
            *self.key.lock().expect("lock") = Some(key.clone());
            Ok(())
        }
    }

    #[test]
    fn test_encrypt_decrypt() {
        let key = SessionKey::generate();
        let sealed = key.encrypt(b"refresh-token").expect("encrypt");
        assert_ne!(&sealed[NONCE_LEN..], b"refresh-token");
        assert_eq!(key.decrypt(&sealed).expect("decrypt"), b"refresh-token");
    }

    #[test]
    fn test_wrong_key_rejected() {
        let sealed = SessionKey::generate().encrypt(b"secret").expect("encrypt");
        assert!(SessionKey::generate().decrypt(&sealed).is_err());
        assert!(SessionKey::generate().decrypt(b"short").is_err());
    }

    #[test]
    fn test_keychain_used_when_available() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key_file = dir.path().join("session.key");
        let vault = FlakyVault::default();

        let first = SessionKeys::resolve(&key_file, &vault).expect("resolve");
        assert_eq!(vault.stored(), Some(first.primary.clone()));
        assert!(!key_file.exists());

        let second = SessionKeys::resolve(&key_file, &vault).expect("resolve");
        assert_eq!(first.primary, second.primary);
    }

    #[test]
    fn test_key_file_wins_once_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key_file = dir.path().join("keys").join("session.key");
        let vault = FlakyVault::default();

        vault.set_down(true);
        let offline = SessionKeys::resolve(&key_file, &vault).expect("resolve");
        assert!(key_file.exists());
        assert_eq!(offline.fallback, None);

        // Keychain back: the file key keeps sealing
        vault.set_down(false);
        let online = SessionKeys::resolve(&key_file, &vault).expect("resolve");
        assert_eq!(online.primary, offline.primary);
    }

    #[test]
    fn test_fallback_opens_keychain_sealed_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key_file = dir.path().join("session.key");
        let vault = FlakyVault::default();

        let keychain = SessionKeys::resolve(&key_file, &vault).expect("resolve");
        let sealed = keychain.encrypt(b"tokens").expect("encrypt");

        vault.set_down(true);
        let offline = SessionKeys::resolve(&key_file, &vault).expect("resolve");
        assert!(offline.decrypt(&sealed).is_err());

        vault.set_down(false);
        let both = SessionKeys::resolve(&key_file, &vault).expect("resolve");
        assert_eq!(both.primary, offline.primary);
        let (plain, via_fallback) = both.decrypt(&sealed).expect("decrypt");
        assert_eq!(plain, b"tokens");
        assert!(via_fallback);
    }
}
