//! Ansible vault-id client backed by the OS keychain.
//!
//! ```text
//! ansible-playbook --vault-id prod@vault-keyring-client site.yml
//! vault-keyring-client --vault-id prod --set
//! ```

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use vault_keyring::client::{self, ClientArgs, TerminalPrompt};
use vault_keyring::{KeyringStore, VaultConfig, logging};

fn main() -> anyhow::Result<ExitCode> {
    logging::init_logging();

    let args = ClientArgs::parse();
    let config = VaultConfig::load_for_user(args.username.as_deref())
        .context("failed to load vault settings")?;

    let code = client::run(
        &args,
        &config,
        &KeyringStore::new(),
        &mut TerminalPrompt,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;

    Ok(ExitCode::from(code))
}
