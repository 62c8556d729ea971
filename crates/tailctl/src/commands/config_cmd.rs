//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, AuthMode, Config, Profile, SecretKind};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for a secret without echo; empty input is rejected.
fn prompt_secret(label: &str, field: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(label).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Offer keyring storage; returns the secret back when the user picks the
/// config file instead.
fn store_or_keep(
    profile_name: &str,
    kind: SecretKind,
    secret: String,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the secret?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_secret(profile_name, kind, &secret)?;
        eprintln!("   ✓ Secret stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret))
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be 'true' or 'false'".into(),
    })
}

/// Apply one `config set <key> <value>` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "base_url" | "base-url" => {
            url_check(&value)?;
            profile.base_url = value;
        }
        "tailnet" => profile.tailnet = value,
        "auth_mode" | "auth-mode" => {
            profile.auth_mode = match value.as_str() {
                "api-key" => AuthMode::ApiKey,
                "oauth" => AuthMode::Oauth,
                _ => {
                    return Err(CliError::Validation {
                        field: "auth_mode".into(),
                        reason: "must be 'api-key' or 'oauth'".into(),
                    });
                }
            };
        }
        "api_key" | "api-key" => profile.api_key = Some(value),
        "api_key_env" | "api-key-env" => profile.api_key_env = Some(value),
        "oauth_client_id" | "oauth-client-id" => profile.oauth_client_id = Some(value),
        "oauth_client_secret" | "oauth-client-secret" => {
            profile.oauth_client_secret = Some(value);
        }
        "oauth_client_secret_env" | "oauth-client-secret-env" => {
            profile.oauth_client_secret_env = Some(value);
        }
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        other => {
            if let Some(name) = other.strip_prefix("headers.") {
                profile.headers.insert(name.to_owned(), value);
                return Ok(());
            }
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: base_url, tailnet, auth_mode, \
                     api_key, api_key_env, oauth_client_id, oauth_client_secret, \
                     oauth_client_secret_env, insecure, timeout, ca_cert, headers.<Name>"
                ),
            });
        }
    }
    Ok(())
}

fn url_check(value: &str) -> Result<(), CliError> {
    url::Url::parse(value).map(|_| ()).map_err(|_| CliError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {value}"),
    })
}

/// Config with plaintext secrets masked, for `config show`.
fn redacted(cfg: &Config) -> serde_json::Value {
    let mut value = serde_json::to_value(cfg).unwrap_or_default();
    if let Some(profiles) = value.get_mut("profiles").and_then(|p| p.as_object_mut()) {
        for profile in profiles.values_mut() {
            for key in ["api_key", "oauth_client_secret"] {
                if let Some(slot) = profile.get_mut(key).filter(|v| !v.is_null()) {
                    *slot = serde_json::Value::String("********".into());
                }
            }
        }
    }
    value
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("tailctl configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Tailnet
            let tailnet: String = Input::new()
                .with_prompt("Tailnet ('-' for the credential's own)")
                .default("-".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Auth mode
            let auth_choices = &["API key", "OAuth client (client-credentials)"];
            let auth_selection = Select::new()
                .with_prompt("Authentication method")
                .items(auth_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile {
                tailnet,
                ..Profile::default()
            };

            if auth_selection == 0 {
                let key = prompt_secret("API key: ", "api_key")?;
                profile.auth_mode = AuthMode::ApiKey;
                profile.api_key = store_or_keep(&profile_name, SecretKind::ApiKey, key)?;
            } else {
                let client_id: String = Input::new()
                    .with_prompt("OAuth client ID")
                    .interact_text()
                    .map_err(prompt_err)?;
                let secret = prompt_secret("OAuth client secret: ", "oauth_client_secret")?;
                profile.auth_mode = AuthMode::Oauth;
                profile.oauth_client_id = Some(client_id);
                profile.oauth_client_secret =
                    store_or_keep(&profile_name, SecretKind::OauthClientSecret, secret)?;
            }

            // 4. Merge into any existing config
            let mut cfg = config::load_config()?;
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: tailctl devices list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let shown = redacted(&cfg);
            let out = output::render_value(global.output_format(), &shown, |v| {
                serde_json::to_string_pretty(v).unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::success(
                &format!("Set {key} on profile '{profile_name}'"),
                global.color,
                global.quiet,
            );
            Ok(())
        }

        // ── SetSecret ───────────────────────────────────────────────
        ConfigCommand::SetSecret => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .get(&profile_name)
                .ok_or_else(|| CliError::ProfileNotFound {
                    name: profile_name.clone(),
                    available: config::available_profiles(&cfg),
                })?;

            let (kind, label) = match profile.auth_mode {
                AuthMode::ApiKey => (SecretKind::ApiKey, "API key: "),
                AuthMode::Oauth => (SecretKind::OauthClientSecret, "OAuth client secret: "),
            };
            let secret = prompt_secret(label, "secret")?;
            config::store_secret(&profile_name, kind, &secret)?;

            output::success(
                &format!("Secret stored in system keyring for profile '{profile_name}'"),
                global.color,
                global.quiet,
            );
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: tailctl config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(
                &format!("Default profile set to '{name}'"),
                global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}
