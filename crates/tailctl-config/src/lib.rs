//! Shared configuration for tailctl.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `tailctl_api::ClientConfig`. The CLI layers its flag
//! overrides on top of these helpers.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use tailctl_api::{
    ClientConfig, Credentials, DEFAULT_BASE_URL, DEFAULT_TAILNET, TlsMode, TransportConfig,
};

/// Service name for system keyring entries.
pub const KEYRING_SERVICE: &str = "tailctl";

/// Prefix for environment overrides of config file values.
pub const ENV_PREFIX: &str = "TSCTL_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// How a profile authenticates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Long-lived API key sent as HTTP Basic.
    #[default]
    ApiKey,
    /// OAuth client exchanged for a bearer token before the first call.
    Oauth,
}

/// A named API profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Tailnet name; `-` means the credential's own tailnet.
    #[serde(default = "default_tailnet")]
    pub tailnet: String,

    #[serde(default)]
    pub auth_mode: AuthMode,

    /// API key (plaintext -- prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// OAuth client ID.
    pub oauth_client_id: Option<String>,

    /// OAuth client secret (plaintext -- prefer keyring or env var).
    pub oauth_client_secret: Option<String>,

    /// Environment variable name containing the OAuth client secret.
    pub oauth_client_secret_env: Option<String>,

    /// Extra headers sent on every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept any TLS certificate.
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tailnet: default_tailnet(),
            auth_mode: AuthMode::default(),
            api_key: None,
            api_key_env: None,
            oauth_client_id: None,
            oauth_client_secret: None,
            oauth_client_secret_env: None,
            headers: BTreeMap::new(),
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_tailnet() -> String {
    DEFAULT_TAILNET.into()
}

/// Which profile secret a keyring entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    ApiKey,
    OauthClientSecret,
}

impl SecretKind {
    fn keyring_suffix(self) -> &'static str {
        match self {
            Self::ApiKey => "api-key",
            Self::OauthClientSecret => "oauth-client-secret",
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "tailctl", "tailctl").map_or_else(
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
    p.push("tailctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Environment keys nest on a double underscore:
/// `TSCTL_DEFAULTS__TIMEOUT=60`, `TSCTL_DEFAULT_PROFILE=work`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_user(profile_name: &str, kind: SecretKind) -> String {
    format!("{profile_name}/{}", kind.keyring_suffix())
}

/// Store a profile secret in the system keyring.
pub fn store_secret(profile_name: &str, kind: SecretKind, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name, kind))?;
    entry.set_password(secret)?;
    Ok(())
}

/// Resolve one secret: named env var, then keyring, then plaintext.
fn resolve_secret(
    env_name: Option<&str>,
    plaintext: Option<&str>,
    profile_name: &str,
    kind: SecretKind,
) -> Option<SecretString> {
    // 1. Env var named by the profile
    if let Some(env_name) = env_name {
        if let Ok(val) = std::env::var(env_name) {
            debug!(profile = profile_name, env = env_name, "secret from environment");
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name, kind)) {
        if let Ok(secret) = entry.get_password() {
            debug!(profile = profile_name, "secret from keyring");
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    plaintext.map(|s| SecretString::from(s.to_owned()))
}

/// Resolve an API key from the credential chain (no CLI flag step).
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_secret(
        profile.api_key_env.as_deref(),
        profile.api_key.as_deref(),
        profile_name,
        SecretKind::ApiKey,
    )
    .ok_or_else(|| ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the OAuth client secret alone, for callers that already hold a
/// client id.
pub fn resolve_oauth_secret(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_secret(
        profile.oauth_client_secret_env.as_deref(),
        profile.oauth_client_secret.as_deref(),
        profile_name,
        SecretKind::OauthClientSecret,
    )
    .ok_or_else(|| ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve OAuth client credentials (id + secret) without CLI flags.
pub fn resolve_oauth_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let client_id = profile
        .oauth_client_id
        .clone()
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    Ok((client_id, resolve_oauth_secret(profile, profile_name)?))
}

/// Resolve `Credentials` from a profile's `auth_mode` field.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    match profile.auth_mode {
        AuthMode::ApiKey => Ok(Credentials::ApiKey(resolve_api_key(profile, profile_name)?)),
        AuthMode::Oauth => {
            let (client_id, client_secret) = resolve_oauth_credentials(profile, profile_name)?;
            Ok(Credentials::OAuth {
                client_id,
                client_secret,
            })
        }
    }
}

/// TLS mode for a profile: `insecure` wins, then `ca_cert`, then the system store.
pub fn profile_tls(profile: &Profile) -> TlsMode {
    if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    }
}

/// Build a `ClientConfig` from a profile and already-resolved credentials.
pub fn build_client_config(
    profile: &Profile,
    credentials: Credentials,
    tls: TlsMode,
    timeout: Duration,
) -> Result<ClientConfig, ConfigError> {
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    if profile.tailnet.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "tailnet".into(),
            reason: "tailnet cannot be empty (use '-' for the credential's own tailnet)".into(),
        });
    }

    let mut headers = tailctl_api::config::default_headers();
    headers.extend(profile.headers.clone());

    Ok(ClientConfig {
        base_url,
        tailnet: profile.tailnet.clone(),
        credentials,
        headers,
        transport: TransportConfig {
            tls,
            timeout,
            ..TransportConfig::default()
        },
    })
}

/// Build a `ClientConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientConfig, ConfigError> {
    let credentials = resolve_credentials(profile, profile_name)?;
    let timeout = Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout));
    build_client_config(profile, credentials, profile_tls(profile), timeout)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use tailctl_api::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "work"

[defaults]
output = "yaml"
timeout = 45

[profiles.work]
tailnet = "example.com"
api_key = "tskey-api-plain"

[profiles.work.headers]
X-Team = "netops"

[profiles.robot]
auth_mode = "oauth"
oauth_client_id = "k123"
oauth_client_secret = "tskey-client-plain"
base_url = "https://headscale.internal/api/v2"
timeout = 5
insecure = true
"#;

    fn sample_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let cfg = load_config_from(&path).unwrap();
        (dir, cfg)
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let (_dir, cfg) = sample_config();

        assert_eq!(cfg.default_profile.as_deref(), Some("work"));
        assert_eq!(cfg.defaults.output, "yaml");
        assert_eq!(cfg.defaults.timeout, 45);

        let work = &cfg.profiles["work"];
        assert_eq!(work.base_url, DEFAULT_BASE_URL);
        assert_eq!(work.tailnet, "example.com");
        assert_eq!(work.auth_mode, AuthMode::ApiKey);

        let robot = &cfg.profiles["robot"];
        assert_eq!(robot.auth_mode, AuthMode::Oauth);
        assert_eq!(robot.tailnet, "-");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.work]\ntimeout = \"thirty\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                tailnet: "corp.example".into(),
                api_key_env: Some("CORP_TS_KEY".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = &loaded.profiles["default"];
        assert_eq!(profile.tailnet, "corp.example");
        assert_eq!(profile.api_key_env.as_deref(), Some("CORP_TS_KEY"));
        assert_eq!(profile.api_key, None);
    }

    #[test]
    fn api_key_profile_builds_client_config() {
        let (_dir, cfg) = sample_config();
        let client_cfg = profile_to_client_config(&cfg.profiles["work"], "work").unwrap();

        assert_eq!(client_cfg.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(client_cfg.tailnet, "example.com");
        assert_eq!(client_cfg.headers["Accept"], "application/json");
        assert_eq!(client_cfg.headers["X-Team"], "netops");
        assert_eq!(client_cfg.transport.tls, TlsMode::System);
        assert_eq!(client_cfg.transport.timeout, Duration::from_secs(30));
        match client_cfg.credentials {
            Credentials::ApiKey(key) => assert_eq!(key.expose_secret(), "tskey-api-plain"),
            other => panic!("expected ApiKey, got {other:?}"),
        }
    }

    #[test]
    fn oauth_profile_builds_client_config() {
        let (_dir, cfg) = sample_config();
        let client_cfg = profile_to_client_config(&cfg.profiles["robot"], "robot").unwrap();

        assert_eq!(
            client_cfg.base_url.as_str(),
            "https://headscale.internal/api/v2"
        );
        assert_eq!(client_cfg.transport.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(client_cfg.transport.timeout, Duration::from_secs(5));
        match client_cfg.credentials {
            Credentials::OAuth {
                client_id,
                client_secret,
            } => {
                assert_eq!(client_id, "k123");
                assert_eq!(client_secret.expose_secret(), "tskey-client-plain");
            }
            other => panic!("expected OAuth, got {other:?}"),
        }
    }

    #[test]
    fn api_key_env_takes_priority_over_plaintext() {
        let Ok(path_value) = std::env::var("PATH") else {
            return;
        };
        let profile = Profile {
            api_key: Some("plaintext".into()),
            api_key_env: Some("PATH".into()),
            ..Profile::default()
        };
        let key = resolve_api_key(&profile, "env-priority-test").unwrap();
        assert_eq!(key.expose_secret(), path_value);
    }

    #[test]
    fn profile_without_key_has_no_credentials() {
        let profile = Profile::default();
        let err = resolve_api_key(&profile, "tailctl-test-no-such-profile").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NoCredentials { ref profile } if profile == "tailctl-test-no-such-profile"
        ));
    }

    #[test]
    fn oauth_without_client_id_has_no_credentials() {
        let profile = Profile {
            auth_mode: AuthMode::Oauth,
            oauth_client_secret: Some("s".into()),
            ..Profile::default()
        };
        assert!(matches!(
            resolve_credentials(&profile, "x"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn oauth_secret_resolves_without_client_id() {
        let profile = Profile {
            oauth_client_secret: Some("tskey-client-plain".into()),
            ..Profile::default()
        };
        let secret = resolve_oauth_secret(&profile, "tailctl-test-no-such-profile").unwrap();
        assert_eq!(secret.expose_secret(), "tskey-client-plain");
    }

    #[test]
    fn invalid_base_url_is_validation_error() {
        let profile = Profile {
            base_url: "not a url".into(),
            api_key: Some("k".into()),
            ..Profile::default()
        };
        let err = profile_to_client_config(&profile, "bad").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "base_url"));
    }

    #[test]
    fn empty_tailnet_is_validation_error() {
        let profile = Profile {
            tailnet: "  ".into(),
            api_key: Some("k".into()),
            ..Profile::default()
        };
        let err = profile_to_client_config(&profile, "bad").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "tailnet"));
    }

    #[test]
    fn ca_cert_selects_custom_ca() {
        let profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/ssl/private-ca.pem")),
            ..Profile::default()
        };
        assert_eq!(
            profile_tls(&profile),
            TlsMode::CustomCa(PathBuf::from("/etc/ssl/private-ca.pem"))
        );
    }
}
