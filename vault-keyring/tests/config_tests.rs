//! Integration tests for `[vault]` config resolution.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vault_keyring::config::{CONFIG_ENV, ConfigSearch, DEFAULT_KEYNAME, VaultSection};
use vault_keyring::{ConfigError, VaultConfig};

const NO_LOGIN: [(&str, Option<&str>); 4] = [
    ("LOGNAME", None),
    ("USER", None),
    ("LNAME", None),
    ("USERNAME", None),
];

fn write_cfg(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn search_in(
    explicit: Option<PathBuf>,
    cwd: Option<&Path>,
    home: Option<&Path>,
) -> ConfigSearch {
    ConfigSearch {
        explicit,
        cwd: cwd.map(Path::to_path_buf),
        home: home.map(Path::to_path_buf),
        system: None,
    }
}

#[test]
fn reads_username_and_keyname() {
    let dir = TempDir::new().unwrap();
    let path = write_cfg(
        dir.path(),
        "ansible.cfg",
        "[defaults]\ninventory = hosts\n\n[vault]\nusername = deploy\nkeyname = prod-vault\n",
    );

    let cfg = VaultConfig::from_file(&path).unwrap();

    assert_eq!(cfg.username, "deploy");
    assert_eq!(cfg.keyname, "prod-vault");
    assert_eq!(cfg.source.as_deref(), Some(path.as_path()));
}

#[test]
fn missing_vault_section_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_cfg(dir.path(), "ansible.cfg", "[defaults]\nforks = 10\n");

    temp_env::with_vars(
        [
            ("LOGNAME", Some("alice")),
            ("USER", Some("bob")),
            ("LNAME", None),
            ("USERNAME", None),
        ],
        || {
            let cfg = VaultConfig::from_file(&path).unwrap();
            assert_eq!(cfg.username, "alice", "LOGNAME wins over USER");
            assert_eq!(cfg.keyname, DEFAULT_KEYNAME);
        },
    );
}

#[test]
fn empty_values_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_cfg(dir.path(), "ansible.cfg", "[vault]\nusername =\nkeyname =\n");

    temp_env::with_vars(
        [
            ("LOGNAME", None),
            ("USER", Some("carol")),
            ("LNAME", None),
            ("USERNAME", None),
        ],
        || {
            let cfg = VaultConfig::from_file(&path).unwrap();
            assert_eq!(cfg.username, "carol");
            assert_eq!(cfg.keyname, "ansible");
        },
    );
}

#[cfg(unix)]
#[test]
fn empty_login_env_falls_back_to_passwd() {
    use nix::unistd::{User, getuid};

    let expected = User::from_uid(getuid()).ok().flatten().map(|u| u.name);

    temp_env::with_vars(NO_LOGIN, || {
        let result = VaultConfig::resolve(None, Some("k"), None);
        match expected {
            Some(name) => assert_eq!(result.unwrap().username, name),
            None => assert!(matches!(result, Err(ConfigError::NoUsername))),
        }
    });
}

#[test]
fn configured_username_does_not_need_login_name() {
    temp_env::with_vars(NO_LOGIN, || {
        let cfg = VaultConfig::resolve(Some("svc-account"), None, None).unwrap();
        assert_eq!(cfg.username, "svc-account");
    });
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_cfg(dir.path(), "ansible.cfg", "[vault\nusername = x\n");

    let err = VaultConfig::from_file(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
    assert!(err.to_string().contains("ansible.cfg"));
}

#[test]
fn unreadable_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();

    let err = VaultConfig::from_file(&dir.path().join("missing.cfg")).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn explicit_file_wins() {
    let dir = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let explicit = write_cfg(dir.path(), "custom.cfg", "[vault]\nkeyname = explicit\n");
    write_cfg(home.path(), ".ansible.cfg", "[vault]\nkeyname = home\n");

    let search = search_in(Some(explicit.clone()), None, Some(home.path()));

    assert_eq!(search.locate(), Some(explicit));
}

#[test]
fn explicit_directory_means_ansible_cfg_inside() {
    let dir = TempDir::new().unwrap();
    let inside = write_cfg(dir.path(), "ansible.cfg", "[vault]\n");

    let search = search_in(Some(dir.path().to_path_buf()), None, None);

    assert_eq!(search.locate(), Some(inside));
}

#[test]
fn missing_explicit_file_falls_through() {
    let home = TempDir::new().unwrap();
    let home_cfg = write_cfg(home.path(), ".ansible.cfg", "[vault]\n");

    let search = search_in(
        Some(home.path().join("does-not-exist.cfg")),
        None,
        Some(home.path()),
    );

    assert_eq!(search.locate(), Some(home_cfg));
}

#[test]
fn cwd_config_beats_home_config() {
    let cwd = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let cwd_cfg = write_cfg(cwd.path(), "ansible.cfg", "[vault]\nkeyname = project\n");
    write_cfg(home.path(), ".ansible.cfg", "[vault]\nkeyname = home\n");

    let search = search_in(None, Some(cwd.path()), Some(home.path()));

    assert_eq!(search.locate(), Some(cwd_cfg));
}

#[cfg(unix)]
#[test]
fn world_writable_cwd_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let cwd = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_cfg(cwd.path(), "ansible.cfg", "[vault]\nkeyname = untrusted\n");
    let home_cfg = write_cfg(home.path(), ".ansible.cfg", "[vault]\nkeyname = home\n");
    fs::set_permissions(cwd.path(), fs::Permissions::from_mode(0o777)).unwrap();

    let search = search_in(None, Some(cwd.path()), Some(home.path()));

    assert_eq!(search.locate(), Some(home_cfg));
}

#[test]
fn nothing_found_uses_defaults() {
    let empty = TempDir::new().unwrap();
    let search = search_in(None, Some(empty.path()), Some(empty.path()));

    temp_env::with_vars(
        [
            ("LOGNAME", Some("dave")),
            ("USER", None),
            ("LNAME", None),
            ("USERNAME", None),
        ],
        || {
            let cfg = VaultConfig::load_with(&search).unwrap();
            assert_eq!(cfg.username, "dave");
            assert_eq!(cfg.keyname, DEFAULT_KEYNAME);
            assert!(cfg.source.is_none());
        },
    );
}

#[test]
fn from_env_reads_ansible_config_variable() {
    let dir = TempDir::new().unwrap();
    let path = write_cfg(dir.path(), "site.cfg", "[vault]\n");

    temp_env::with_var(CONFIG_ENV, Some(path.as_os_str()), || {
        let search = ConfigSearch::from_env();
        assert_eq!(search.explicit.as_deref(), Some(path.as_path()));
        assert_eq!(search.locate(), Some(path.clone()));
    });
}

#[test]
fn from_env_ignores_empty_ansible_config() {
    temp_env::with_var(CONFIG_ENV, Some(""), || {
        assert!(ConfigSearch::from_env().explicit.is_none());
    });
}

#[test]
fn backslashes_are_kept_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = write_cfg(
        dir.path(),
        "ansible.cfg",
        "[vault]\nusername = CORP\\ansible\nkeyname = C:\\vault\\new\n",
    );

    let cfg = VaultConfig::from_file(&path).unwrap();

    assert_eq!(cfg.username, r"CORP\ansible");
    assert_eq!(cfg.keyname, r"C:\vault\new");
}

#[test]
fn quotes_are_kept_verbatim() {
    let section = VaultSection::parse("[vault]\nkeyname = \"prod\"\n").unwrap();

    assert_eq!(section.keyname.as_deref(), Some("\"prod\""));
}

#[test]
fn option_names_are_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let path = write_cfg(
        dir.path(),
        "ansible.cfg",
        "[vault]\nUsername = deploy\nKEYNAME = prod\n",
    );

    let cfg = VaultConfig::from_file(&path).unwrap();

    assert_eq!(cfg.username, "deploy");
    assert_eq!(cfg.keyname, "prod");
}

#[test]
fn inline_semicolon_comments_are_stripped() {
    let dir = TempDir::new().unwrap();
    let path = write_cfg(
        dir.path(),
        "ansible.cfg",
        "[vault]\nusername = deploy ; ci account\nkeyname = prod ; team vault\n",
    );

    let cfg = VaultConfig::from_file(&path).unwrap();

    assert_eq!(cfg.username, "deploy");
    assert_eq!(cfg.keyname, "prod");
}

#[test]
fn semicolon_inside_value_is_kept() {
    let section = VaultSection::parse("[vault]\nkeyname = a;b\n").unwrap();

    assert_eq!(section.keyname.as_deref(), Some("a;b"));
}

#[test]
fn explicit_username_skips_login_lookup() {
    let empty = TempDir::new().unwrap();
    let search = search_in(None, Some(empty.path()), Some(empty.path()));

    temp_env::with_vars(NO_LOGIN, || {
        let cfg = VaultSection::load(&search)
            .unwrap()
            .into_config(Some("deploy"))
            .unwrap();
        assert_eq!(cfg.username, "deploy");
        assert_eq!(cfg.keyname, DEFAULT_KEYNAME);
    });
}

#[test]
fn explicit_username_beats_configured_one() {
    let section = VaultSection::parse("[vault]\nusername = from-file\n").unwrap();

    let cfg = section.into_config(Some("from-flag")).unwrap();

    assert_eq!(cfg.username, "from-flag");
}
