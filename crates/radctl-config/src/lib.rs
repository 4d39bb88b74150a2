//! Host profiles for the radctl CLI.
//!
//! TOML profiles merged with `RADCTL_*` environment variables, password
//! resolution (env + keyring + plaintext), and translation to
//! `radctl_core::SessionConfig`. The CLI layers its flags on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use radctl_core::api::DEFAULT_PORT;
use radctl_core::{Endpoint, Protocol, SessionConfig, TlsMode};

/// Service name for passwords stored in the system keyring.
pub const KEYRING_SERVICE: &str = "radctl";

/// Environment variable consulted before the keyring.
pub const PASSWORD_ENV: &str = "RADCTL_PASSWORD";

const ENV_PREFIX: &str = "RADCTL_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: String },

    #[error("no password available for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named host profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Cached sessions older than this many seconds are discarded. 0 keeps them forever.
    #[serde(default)]
    pub max_session_time: u64,

    /// Override for `~/.cache/rad`.
    pub cache_dir: Option<PathBuf>,

    /// Check cached sessions are alive before reusing them.
    #[serde(default = "default_verify_cached")]
    pub verify_cached: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            max_session_time: 0,
            cache_dir: None,
            verify_cached: default_verify_cached(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_verify_cached() -> bool {
    true
}

/// One RAD daemon and how to log into it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    pub hostname: String,

    #[serde(default)]
    pub protocol: Protocol,

    #[serde(default = "default_port")]
    pub port: u16,

    pub username: Option<String>,

    /// Plaintext password (prefer keyring or `RADCTL_PASSWORD`).
    pub password: Option<String>,

    /// Custom CA bundle; implies certificate verification.
    pub ca_cert: Option<PathBuf>,

    /// Verify the daemon certificate against the system roots.
    pub verify_tls: Option<bool>,

    /// Override `defaults.max_session_time`.
    pub max_session_time: Option<u64>,

    /// Override `defaults.timeout`.
    pub timeout: Option<u64>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Profile {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            protocol: Protocol::default(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            ca_cert: None,
            verify_tls: None,
            max_session_time: None,
            timeout: None,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.protocol, self.hostname.clone(), self.port)
    }

    pub fn tls_mode(&self) -> TlsMode {
        TlsMode::from_flags(self.verify_tls.unwrap_or(false), self.ca_cert.clone())
    }
}

impl Config {
    /// `--profile` if given, else `default_profile`, else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.profile_names(),
            })
    }

    fn profile_names(&self) -> String {
        if self.profiles.is_empty() {
            return "(none)".into();
        }
        self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "radctl", "radctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("radctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path` (if present), then `RADCTL_*` variables. Nested
/// keys use a double underscore: `RADCTL_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "loaded config");
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve a login password: `RADCTL_PASSWORD`, then the system keyring,
/// then the profile's plaintext password.
pub fn resolve_password(
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(pw) = entry.get_password() {
            debug!(profile = profile_name, "password taken from keyring");
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(pw) = profile.and_then(|p| p.password.as_ref()) {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Save `password` in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    let keyring_err = |e: keyring::Error| ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    };
    keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))
        .and_then(|entry| entry.set_password(password.expose_secret()))
        .map_err(keyring_err)
}

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

// ── Session configuration ───────────────────────────────────────────

/// Build a `SessionConfig` from a profile and the global defaults, with no
/// CLI overrides applied.
pub fn session_config(profile: &Profile, defaults: &Defaults) -> Result<SessionConfig, ConfigError> {
    if profile.hostname.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "hostname".into(),
            reason: "must not be empty".into(),
        });
    }
    if profile.port == 0 {
        return Err(ConfigError::Validation {
            field: "port".into(),
            reason: "must be between 1 and 65535".into(),
        });
    }

    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    let max_session_time = profile.max_session_time.unwrap_or(defaults.max_session_time);

    let mut config = SessionConfig::new(profile.endpoint())
        .with_tls(profile.tls_mode())
        .with_timeout(Duration::from_secs(timeout))
        .with_max_session_time(Duration::from_secs(max_session_time))
        .with_verify_cached(defaults.verify_cached);
    if let Some(dir) = &defaults.cache_dir {
        config = config.with_cache_dir(dir.clone());
    }
    Ok(config)
}
