//! Secret store backends.
//!
//! Everything above this layer talks to a [`SecretStore`]; the backends
//! decide where secrets actually live:
//! - **keyring**: the OS credential store via the `keyring` crate
//! - **memory**: an in-process map, for tests and keychain-less hosts

pub mod keyring;
pub mod memory;

use zeroize::Zeroizing;

use crate::error::BackendError;

pub use self::keyring::KeyringStore;
pub use self::memory::MemoryStore;

/// A secret value, wiped from memory when dropped.
pub type Secret = Zeroizing<String>;

/// A credential store addressed by a (service, account) pair.
pub trait SecretStore {
    /// Look up the secret for `service` / `account`.
    ///
    /// Returns `Ok(None)` when the store has no such entry. Failures of the
    /// store itself are returned as `Err` and must never be folded into
    /// `Ok(None)`.
    fn get_secret(&self, service: &str, account: &str) -> Result<Option<Secret>, BackendError>;

    /// Store `secret` under `service` / `account`, replacing any existing value.
    fn set_secret(&self, service: &str, account: &str, secret: &str) -> Result<(), BackendError>;

    /// Short backend name used in diagnostics.
    fn backend_name(&self) -> &str;
}

impl<S: SecretStore + ?Sized> SecretStore for &S {
    fn get_secret(&self, service: &str, account: &str) -> Result<Option<Secret>, BackendError> {
        (**self).get_secret(service, account)
    }

    fn set_secret(&self, service: &str, account: &str, secret: &str) -> Result<(), BackendError> {
        (**self).set_secret(service, account, secret)
    }

    fn backend_name(&self) -> &str {
        (**self).backend_name()
    }
}
