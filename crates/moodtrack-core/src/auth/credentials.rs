use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

const SERVICE_NAME: &str = "moodtrack";

/// Account prefix for remembered passwords, so a username can never shadow
/// the session key entry
const PASSWORD_ACCOUNT_PREFIX: &str = "password:";

/// Keychain entry for `account` under the application's service name
pub(crate) fn keychain_entry(account: &str) -> Result<Entry> {
    Entry::new(SERVICE_NAME, account)
        .with_context(|| format!("Failed to open keychain entry {}", account))
}

fn password_account(username: &str) -> String {
    format!("{}{}", PASSWORD_ACCOUNT_PREFIX, username.trim().to_lowercase())
}

/// Remembered login passwords, kept in the OS keychain
pub struct CredentialStore;

impl CredentialStore {
    pub fn store(username: &str, password: &str) -> Result<()> {
        keychain_entry(&password_account(username))?
            .set_password(password)
            .context("Failed to remember password")?;
        debug!(username = username, "Password remembered");
        Ok(())
    }

    /// Remembered password for `username`, if any
    pub fn get_password(username: &str) -> Result<String> {
        keychain_entry(&password_account(username))?
            .get_password()
            .context("No remembered password")
    }

    /// Forget the password for `username`; a missing entry is not an error
    pub fn delete(username: &str) -> Result<()> {
        match keychain_entry(&password_account(username))?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to forget password"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_account_is_normalized() {
        assert_eq!(password_account("  Alice "), "password:alice");
        assert_ne!(password_account("session-key"), "session-key");
    }
}
