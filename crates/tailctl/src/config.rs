//! CLI configuration: thin wrapper around `tailctl_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--base-url,
//! --tailnet, --api-key, --oauth-client-*, --insecure, --timeout).

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use tailctl_api::{ClientConfig, Credentials, TlsMode};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use tailctl_config::{
    AuthMode, Config, Profile, SecretKind, config_path, load_config, save_config, store_secret,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Output format: flag > env > config default > table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build the `ClientConfig` for this invocation.
///
/// Uses the active profile when one exists, with flags layered on top.
/// Without a profile, flags alone are enough as long as they carry
/// credentials; the base URL and tailnet then fall back to the public API
/// and `-`.
pub fn resolve_client_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let Some(profile) = config.profiles.get(&profile_name) else {
        let credentials = flag_credentials(global, None, &profile_name)?.ok_or_else(|| {
            if global.profile.is_some() {
                CliError::ProfileNotFound {
                    name: profile_name.clone(),
                    available: available_profiles(config),
                }
            } else {
                CliError::NoConfig {
                    path: config_path().display().to_string(),
                }
            }
        })?;
        return resolve_profile(&Profile::default(), credentials, global, config);
    };

    let credentials = match flag_credentials(global, Some(profile), &profile_name)? {
        Some(credentials) => credentials,
        None => tailctl_config::resolve_credentials(profile, &profile_name)?,
    };
    resolve_profile(profile, credentials, global, config)
}

/// Apply flag overrides to a profile and hand it to the shared builder.
fn resolve_profile(
    profile: &Profile,
    credentials: Credentials,
    global: &GlobalOpts,
    config: &Config,
) -> Result<ClientConfig, CliError> {
    let mut profile = profile.clone();

    // 1. Base URL and tailnet (flag > env > profile)
    if let Some(ref base_url) = global.base_url {
        profile.base_url.clone_from(base_url);
    }
    if let Some(ref tailnet) = global.tailnet {
        profile.tailnet.clone_from(tailnet);
    }

    // 2. TLS verification
    let tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        tailctl_config::profile_tls(&profile)
    };

    // 3. Timeout (flag > profile > config default)
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Ok(tailctl_config::build_client_config(
        &profile,
        credentials,
        tls,
        Duration::from_secs(timeout),
    )?)
}

/// Credentials given directly on the command line, if any.
///
/// `--api-key` wins. `--oauth-client-id` without `--oauth-client-secret`
/// takes the secret from the profile's credential chain.
fn flag_credentials(
    global: &GlobalOpts,
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<Option<Credentials>, CliError> {
    if let Some(ref key) = global.api_key {
        return Ok(Some(Credentials::api_key(key.clone())));
    }

    let Some(ref client_id) = global.oauth_client_id else {
        return Ok(None);
    };

    let client_secret = match (&global.oauth_client_secret, profile) {
        (Some(secret), _) => SecretString::from(secret.clone()),
        (None, Some(profile)) => tailctl_config::resolve_oauth_secret(profile, profile_name)?,
        (None, None) => {
            return Err(CliError::NoCredentials {
                profile: profile_name.into(),
            });
        }
    };

    Ok(Some(Credentials::OAuth {
        client_id: client_id.clone(),
        client_secret,
    }))
}
