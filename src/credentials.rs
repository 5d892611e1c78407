//! Password storage in the platform keychain

use anyhow::{Context, Result};
use keyring::Entry;
use log::debug;

/// Service name of the keychain entries
pub const KEYRING_APP_ID: &str = "synodsm";

/// Storage for the Download Station password of a user
pub trait SecretStore {
    /// Returns the stored password of `user`
    ///
    /// # Errors
    ///
    /// Returns an error if no password is stored or the store is unavailable.
    fn get_password(&self, user: &str) -> Result<String>;

    /// Stores `password` for `user`, replacing an existing entry
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    fn save_credentials(&self, user: &str, password: &str) -> Result<()>;
}

/// [`SecretStore`] backed by the OS credential manager
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringStore;

impl KeyringStore {
    fn entry(user: &str) -> Result<Entry> {
        Entry::new(KEYRING_APP_ID, user)
            .with_context(|| format!("Failed to open keychain entry for {user}"))
    }
}

impl SecretStore for KeyringStore {
    fn get_password(&self, user: &str) -> Result<String> {
        Self::entry(user)?
            .get_password()
            .with_context(|| format!("Failed to read password of {user} from keychain"))
    }

    fn save_credentials(&self, user: &str, password: &str) -> Result<()> {
        let entry = Self::entry(user)?;

        if entry.get_password().is_ok() {
            debug!("Replacing existing keychain entry for {user}");
            entry
                .delete_credential()
                .with_context(|| format!("Failed to delete keychain entry for {user}"))?;
        }

        entry
            .set_password(password)
            .with_context(|| format!("Failed to store password of {user} in keychain"))
    }
}
