//! Print the vault username and key name resolved from the Ansible config.

use anyhow::Context;
use vault_keyring::{VaultConfig, logging};

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = VaultConfig::load().context("failed to load vault settings")?;
    if let Some(source) = &config.source {
        tracing::info!(path = %source.display(), "using ansible config");
    }

    println!("username: {} keyname: {}", config.username, config.keyname);
    Ok(())
}
