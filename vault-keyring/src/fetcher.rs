//! Credential fetcher.
//!
//! One lookup, one branch: print the secret on stdout and exit 0, or explain
//! on stderr that nothing is provisioned and exit 1. Backend failures are
//! returned to the caller untouched.

use std::fmt;
use std::io::{self, Write};

use tracing::debug;

use crate::backend::{Secret, SecretStore};
use crate::error::FetchError;

/// Service label used by `get-pass`.
pub const PASS_LABEL: &str = "test";
/// Account name used by `get-pass`.
pub const PASS_ACCOUNT: &str = "test";

/// Exit code when the secret was printed.
pub const EXIT_FOUND: u8 = 0;
/// Exit code when the store has no entry for the key.
pub const EXIT_NOT_FOUND: u8 = 1;

/// Address of a secret in the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupKey<'a> {
    pub service: &'a str,
    pub account: &'a str,
}

impl<'a> LookupKey<'a> {
    pub const fn new(service: &'a str, account: &'a str) -> Self {
        Self { service, account }
    }
}

impl LookupKey<'static> {
    /// The compiled-in key `get-pass` looks up.
    pub const PASS: LookupKey<'static> = LookupKey::new(PASS_LABEL, PASS_ACCOUNT);
}

impl fmt::Display for LookupKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.account)
    }
}

/// Stderr text for a missing entry, including how to provision it.
pub fn not_found_diagnostic(key: LookupKey<'_>) -> String {
    format!(
        "ERROR: Password not found for service '{service}' and account '{account}'\n\
         ERROR: Please set the password using: keyring set {service} {account}\n",
        service = key.service,
        account = key.account,
    )
}

/// Look up `key` once and report the outcome on `stdout` / `stderr`.
///
/// Returns the process exit code: [`EXIT_FOUND`] after writing the secret and
/// a newline to `stdout`, [`EXIT_NOT_FOUND`] after writing the diagnostic to
/// `stderr`. Nothing reaches `stdout` unless the secret was found.
pub fn fetch<S, O, E>(
    store: &S,
    key: LookupKey<'_>,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<u8, FetchError>
where
    S: SecretStore + ?Sized,
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    debug!(
        service = key.service,
        account = key.account,
        backend = store.backend_name(),
        "looking up secret"
    );

    let secret = store.get_secret(key.service, key.account)?;
    let code = emit_secret(
        secret,
        || not_found_diagnostic(key),
        EXIT_NOT_FOUND,
        stdout,
        stderr,
    )?;
    Ok(code)
}

/// Print a looked-up secret, or the `missing` diagnostic when there is none.
///
/// The secret and a newline go to `stdout` and [`EXIT_FOUND`] is returned.
/// Otherwise `missing()` goes to `stderr` untouched and `not_found` is
/// returned. Whichever stream was written is flushed.
pub fn emit_secret<O, E, M>(
    secret: Option<Secret>,
    missing: M,
    not_found: u8,
    stdout: &mut O,
    stderr: &mut E,
) -> io::Result<u8>
where
    O: Write + ?Sized,
    E: Write + ?Sized,
    M: FnOnce() -> String,
{
    match secret {
        Some(secret) => {
            writeln!(stdout, "{}", secret.as_str())?;
            stdout.flush()?;
            Ok(EXIT_FOUND)
        }
        None => {
            stderr.write_all(missing().as_bytes())?;
            stderr.flush()?;
            Ok(not_found)
        }
    }
}
