//! In-process secret store.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use zeroize::Zeroizing;

use super::{Secret, SecretStore};
use crate::error::BackendError;

#[derive(Default)]
struct Inner {
    entries: HashMap<(String, String), Secret>,
    failure: Option<String>,
}

/// [`SecretStore`] holding entries in memory.
///
/// Nothing survives the process. [`MemoryStore::fail_with`] puts the store
/// into a state where every call fails, which is how an unreachable backend
/// is simulated.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_secret(self, service: &str, account: &str, secret: &str) -> Self {
        self.insert(service, account, secret);
        self
    }

    pub fn insert(&self, service: &str, account: &str, secret: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.entries.insert(
                (service.to_string(), account.to_string()),
                Zeroizing::new(secret.to_string()),
            );
        }
    }

    /// Make every subsequent call fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failure = Some(reason.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|i| i.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, BackendError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| BackendError::Unavailable("memory store lock poisoned".into()))?;
        if let Some(reason) = &inner.failure {
            return Err(BackendError::Unavailable(reason.clone()));
        }
        Ok(inner)
    }
}

impl SecretStore for MemoryStore {
    fn get_secret(&self, service: &str, account: &str) -> Result<Option<Secret>, BackendError> {
        let inner = self.lock()?;
        Ok(inner
            .entries
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    fn set_secret(&self, service: &str, account: &str, secret: &str) -> Result<(), BackendError> {
        let mut inner = self.lock()?;
        inner.entries.insert(
            (service.to_string(), account.to_string()),
            Zeroizing::new(secret.to_string()),
        );
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_entry_is_none() {
        let store = MemoryStore::new();
        assert!(store.get_secret("svc", "acct").unwrap().is_none());
    }

    #[test]
    fn set_then_get() {
        let store = MemoryStore::new();
        store.set_secret("svc", "acct", "s3cret").unwrap();
        let secret = store.get_secret("svc", "acct").unwrap().unwrap();
        assert_eq!(secret.as_str(), "s3cret");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn service_and_account_are_distinct_keys() {
        let store = MemoryStore::new().with_secret("a", "b", "1");
        assert!(store.get_secret("b", "a").unwrap().is_none());
        assert!(store.get_secret("A", "b").unwrap().is_none());
    }

    #[test]
    fn failing_store_errors_instead_of_returning_none() {
        let store = MemoryStore::new().with_secret("svc", "acct", "x");
        store.fail_with("keychain locked");

        let err = store.get_secret("svc", "acct").unwrap_err();
        assert!(err.to_string().contains("keychain locked"));
        assert!(store.set_secret("svc", "acct", "y").is_err());
    }
}
