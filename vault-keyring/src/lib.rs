//! vault-keyring - OS keychain password provider for Ansible Vault
//!
//! Reads a vault password from the platform credential store and prints it
//! on stdout, following the password-file and vault-id client conventions:
//! - macOS: Keychain
//! - Linux: Secret Service (GNOME Keyring / KWallet)
//! - Windows: Credential Manager
//!
//! Binaries:
//! - `get-pass`: fixed lookup key, no arguments
//! - `vault-keyring-client`: vault-id client with `--vault-id`, `--username`, `--set`
//! - `show-vault-config`: prints the resolved `[vault]` settings

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;

// Re-export commonly used types
pub use backend::{KeyringStore, MemoryStore, Secret, SecretStore};
pub use config::VaultConfig;
pub use error::{BackendError, ClientError, ConfigError, FetchError};
pub use fetcher::{LookupKey, PASS_ACCOUNT, PASS_LABEL, fetch};
