//! `[vault]` settings from the Ansible configuration file.
//!
//! The file is located the way Ansible does it:
//! 1. `ANSIBLE_CONFIG` (a directory means `<dir>/ansible.cfg`)
//! 2. `./ansible.cfg`, unless the current directory is world-writable
//! 3. `~/.ansible.cfg`
//! 4. `/etc/ansible/ansible.cfg`
//!
//! Only `[vault] username` and `[vault] keyname` are read. Values are taken
//! raw, the way Python's `configparser` hands them to Ansible: no backslash
//! escapes or quote stripping, option names matched case-insensitively, and
//! inline ` ;` comments removed. Missing or empty values fall back to the
//! login name and [`DEFAULT_KEYNAME`].

use std::env;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "ANSIBLE_CONFIG";
/// Key name used when `[vault] keyname` is not set.
pub const DEFAULT_KEYNAME: &str = "ansible";

const CONFIG_FILE: &str = "ansible.cfg";
const HOME_CONFIG_FILE: &str = ".ansible.cfg";
const SYSTEM_CONFIG: &str = "/etc/ansible/ansible.cfg";
const VAULT_SECTION: &str = "vault";

// Same order as Python's getpass.getuser(), which then falls back to passwd.
const LOGIN_ENV_VARS: [&str; 4] = ["LOGNAME", "USER", "LNAME", "USERNAME"];

/// `[vault]` values as written in the config file, before defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultSection {
    pub username: Option<String>,
    pub keyname: Option<String>,
    /// File the values came from, if any was found.
    pub source: Option<PathBuf>,
}

impl VaultSection {
    /// Read the first config file `search` finds, or nothing.
    pub fn load(search: &ConfigSearch) -> Result<Self, ConfigError> {
        match search.locate() {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no ansible config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut section = Self::parse(&src).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded ansible config");

        section.source = Some(path.to_path_buf());
        Ok(section)
    }

    pub fn parse(src: &str) -> Result<Self, ini::ParseError> {
        let opt = ParseOption {
            enabled_escape: false,
            enabled_quote: false,
            ..Default::default()
        };
        let ini = Ini::load_from_str_opt(src, opt)?;

        let lookup = |key: &str| {
            ini.section(Some(VAULT_SECTION)).and_then(|props| {
                props
                    .iter()
                    .filter(|(k, _)| k.eq_ignore_ascii_case(key))
                    .last()
                    .map(|(_, v)| strip_inline_comment(v).to_string())
            })
        };

        Ok(Self {
            username: lookup("username"),
            keyname: lookup("keyname"),
            source: None,
        })
    }

    /// Apply defaults. The login name is only looked up when neither
    /// `username_override` nor the file supplies one.
    pub fn into_config(
        self,
        username_override: Option<&str>,
    ) -> Result<VaultConfig, ConfigError> {
        let username = non_empty(username_override).or(non_empty(self.username.as_deref()));
        VaultConfig::resolve(username, self.keyname.as_deref(), self.source)
    }
}

/// Resolved vault settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Keyring account the vault password is stored under.
    pub username: String,
    /// Keyring service the vault password is stored under.
    pub keyname: String,
    /// File the values came from, if any was found.
    pub source: Option<PathBuf>,
}

impl VaultConfig {
    /// Locate the config file from the process environment and resolve it.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for_user(None)
    }

    /// Like [`VaultConfig::load`], with an explicit username taking the place
    /// of the configured or login one.
    pub fn load_for_user(username: Option<&str>) -> Result<Self, ConfigError> {
        VaultSection::load(&ConfigSearch::from_env())?.into_config(username)
    }

    pub fn load_with(search: &ConfigSearch) -> Result<Self, ConfigError> {
        VaultSection::load(search)?.into_config(None)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        VaultSection::from_file(path)?.into_config(None)
    }

    /// Apply defaults to raw config values.
    pub fn resolve(
        username: Option<&str>,
        keyname: Option<&str>,
        source: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let username = match non_empty(username) {
            Some(u) => u.to_string(),
            None => current_username().ok_or(ConfigError::NoUsername)?,
        };
        let keyname = non_empty(keyname).unwrap_or(DEFAULT_KEYNAME).to_string();

        Ok(Self {
            username,
            keyname,
            source,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// configparser only treats `;` as a comment when whitespace precedes it.
fn strip_inline_comment(value: &str) -> &str {
    let mut prev_ws = false;
    for (i, c) in value.char_indices() {
        if c == ';' && prev_ws {
            return value[..i].trim_end();
        }
        prev_ws = c.is_whitespace();
    }
    value
}

/// Login name: first non-empty of `LOGNAME`, `USER`, `LNAME`, `USERNAME`,
/// then the passwd entry of the current uid.
pub fn current_username() -> Option<String> {
    LOGIN_ENV_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|v| !v.is_empty())
        .or_else(passwd_username)
}

#[cfg(unix)]
fn passwd_username() -> Option<String> {
    use nix::unistd::{User, getuid};

    match User::from_uid(getuid()) {
        Ok(Some(user)) => Some(user.name),
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "passwd lookup failed");
            None
        }
    }
}

#[cfg(not(unix))]
fn passwd_username() -> Option<String> {
    None
}

/// Where to look for the Ansible configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigSearch {
    /// Value of `ANSIBLE_CONFIG`.
    pub explicit: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    pub home: Option<PathBuf>,
    pub system: Option<PathBuf>,
}

impl ConfigSearch {
    pub fn from_env() -> Self {
        let home = dirs::home_dir();
        let explicit = env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(|v| expand_home(PathBuf::from(v), home.as_deref()));

        Self {
            explicit,
            cwd: env::current_dir().ok(),
            home,
            system: Some(PathBuf::from(SYSTEM_CONFIG)),
        }
    }

    /// Candidate files in priority order, existing or not.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut out = Vec::with_capacity(4);
        if let Some(explicit) = &self.explicit {
            if explicit.is_dir() {
                out.push(explicit.join(CONFIG_FILE));
            } else {
                out.push(explicit.clone());
            }
        }
        if let Some(cwd) = &self.cwd {
            if is_world_writable(cwd) {
                warn!(
                    dir = %cwd.display(),
                    "ignoring ansible.cfg in world-writable current directory"
                );
            } else {
                out.push(cwd.join(CONFIG_FILE));
            }
        }
        if let Some(home) = &self.home {
            out.push(home.join(HOME_CONFIG_FILE));
        }
        if let Some(system) = &self.system {
            out.push(system.clone());
        }
        out
    }

    /// First candidate that exists as a file.
    pub fn locate(&self) -> Option<PathBuf> {
        self.candidates().into_iter().find(|p| p.is_file())
    }
}

fn expand_home(path: PathBuf, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path,
    }
}

#[cfg(unix)]
fn is_world_writable(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(dir)
        .map(|m| m.permissions().mode() & 0o002 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_world_writable(_dir: &Path) -> bool {
    false
}
