//! [`SecretStore`] over the platform credential store.
//!
//! A lookup that finds nothing (`keyring::Error::NoEntry`) is `Ok(None)`;
//! locked keychains, missing D-Bus services and other platform failures stay
//! errors. Service and account map one-to-one onto the keyring entry, so a
//! password provisioned with Python's `keyring set <service> <account>` is
//! read back as is.

use keyring::Entry;
use tracing::debug;
use zeroize::Zeroizing;

use super::{Secret, SecretStore};
use crate::error::BackendError;

/// [`SecretStore`] backed by the platform credential store.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }
}

impl SecretStore for KeyringStore {
    fn get_secret(&self, service: &str, account: &str) -> Result<Option<Secret>, BackendError> {
        let entry = Entry::new(service, account)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(Zeroizing::new(password))),
            Err(keyring::Error::NoEntry) => {
                debug!(service, account, "no keyring entry");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_secret(&self, service: &str, account: &str, secret: &str) -> Result<(), BackendError> {
        let entry = Entry::new(service, account)?;
        entry.set_password(secret)?;
        debug!(service, account, "keyring entry stored");
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "keyring"
    }
}
