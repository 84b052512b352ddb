//! Error types shared by the library and the binaries.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of the credential store itself.
///
/// A missing entry is not an error; backends report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("keyring backend failed: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from a single fetch-and-print run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Errors while resolving the `[vault]` configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },

    #[error("could not determine the login name; set [vault] username in ansible.cfg")]
    NoUsername,
}

/// Errors from the vault-id client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to read password: {0}")]
    Prompt(#[source] io::Error),
}

impl From<BackendError> for ClientError {
    fn from(e: BackendError) -> Self {
        ClientError::Fetch(FetchError::Backend(e))
    }
}

impl From<io::Error> for ClientError {
    fn from(e: io::Error) -> Self {
        ClientError::Fetch(FetchError::Io(e))
    }
}
