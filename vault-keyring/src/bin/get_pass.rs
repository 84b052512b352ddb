//! Ansible Vault password script backed by the OS keychain.
//!
//! Point `vault_password_file` (or `--vault-password-file`) at this binary.
//! It takes no arguments; anything passed is ignored.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use vault_keyring::fetcher::{self, LookupKey};
use vault_keyring::{KeyringStore, logging};

fn main() -> anyhow::Result<ExitCode> {
    logging::init_logging();

    let code = fetcher::fetch(
        &KeyringStore::new(),
        LookupKey::PASS,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
    .with_context(|| format!("failed to read {} from the OS keyring", LookupKey::PASS))?;

    Ok(ExitCode::from(code))
}
