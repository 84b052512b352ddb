//! Ansible vault-id client.
//!
//! Ansible runs the client as `vault-keyring-client --vault-id <id>` and reads
//! the password from stdout. The key name defaults to `[vault] keyname` and
//! the account to `[vault] username`; `--set` stores a new password instead.

use std::io::{self, Write};

use clap::Parser;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::backend::SecretStore;
use crate::config::VaultConfig;
use crate::error::ClientError;
use crate::fetcher::emit_secret;

/// Exit code Ansible expects when the vault id is unknown.
pub const EXIT_UNKNOWN_KEY: u8 = 2;
/// Exit code when `--set` confirmation does not match.
pub const EXIT_MISMATCH: u8 = 1;

/// Command-line arguments.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "vault-keyring-client",
    version,
    about = "Get a vault password from the OS keyring"
)]
pub struct ClientArgs {
    /// Name of the vault secret to get from keyring
    #[arg(long, value_name = "ID")]
    pub vault_id: Option<String>,

    /// The username whose keyring is queried
    #[arg(long)]
    pub username: Option<String>,

    /// Set the password instead of getting it
    #[arg(long)]
    pub set: bool,
}

/// Source of interactively entered passwords.
pub trait PasswordPrompt {
    fn prompt(&mut self, message: &str) -> io::Result<String>;
}

impl<F> PasswordPrompt for F
where
    F: FnMut(&str) -> io::Result<String>,
{
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        self(message)
    }
}

/// Reads from the controlling terminal without echo.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        rpassword::prompt_password(message)
    }
}

/// Run the client and return the process exit code.
pub fn run<S, P, O, E>(
    args: &ClientArgs,
    config: &VaultConfig,
    store: &S,
    prompt: &mut P,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<u8, ClientError>
where
    S: SecretStore + ?Sized,
    P: PasswordPrompt + ?Sized,
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    let keyname = args.vault_id.as_deref().unwrap_or(&config.keyname);
    let username = args.username.as_deref().unwrap_or(&config.username);

    if args.set {
        return store_password(keyname, username, store, prompt, stdout, stderr);
    }

    debug!(keyname, username, "fetching vault password");
    let secret = store.get_secret(keyname, username)?;
    let code = emit_secret(
        secret,
        || {
            format!(
                "vault-keyring-client could not find key=\"{keyname}\" for user=\"{username}\" via backend=\"{}\"\n",
                store.backend_name()
            )
        },
        EXIT_UNKNOWN_KEY,
        stdout,
        stderr,
    )?;
    Ok(code)
}

fn store_password<S, P, O, E>(
    keyname: &str,
    username: &str,
    store: &S,
    prompt: &mut P,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<u8, ClientError>
where
    S: SecretStore + ?Sized,
    P: PasswordPrompt + ?Sized,
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    writeln!(
        stdout,
        "Storing password in \"{username}\" user keyring using key name: {keyname}"
    )?;
    stdout.flush()?;

    let password = Zeroizing::new(prompt.prompt("Password: ").map_err(ClientError::Prompt)?);
    let confirm =
        Zeroizing::new(prompt.prompt("Confirm password: ").map_err(ClientError::Prompt)?);

    if *password != *confirm {
        writeln!(stderr, "Passwords do not match")?;
        stderr.flush()?;
        return Ok(EXIT_MISMATCH);
    }

    store.set_secret(keyname, username, &password)?;
    info!(keyname, username, "vault password stored");
    Ok(0)
}
