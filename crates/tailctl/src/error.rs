//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use tailctl_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the API at {url}")]
    #[diagnostic(
        code(tailctl::connection_failed),
        help(
            "Check network access and the base URL.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(tailctl::tls_error),
        help("Configure ca_cert in your profile, or use --insecure (-k) for testing.")
    )]
    Tls { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(tailctl::timeout),
        help("Increase the timeout with --timeout or the profile's timeout key.")
    )]
    Timeout {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(tailctl::no_credentials),
        help(
            "Configure credentials with: tailctl config init\n\
             Or set TSCTL_API_KEY (or TSCTL_OAUTH_CLIENT_ID + TSCTL_OAUTH_CLIENT_SECRET)."
        )
    )]
    NoCredentials { profile: String },

    #[error("OAuth token exchange failed ({status}): {message}")]
    #[diagnostic(
        code(tailctl::oauth_failed),
        help("Verify the OAuth client ID and secret, and that the client has the needed scopes.")
    )]
    OAuthFailed { status: u16, message: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(code(tailctl::auth_failed))]
    AuthFailed { message: String },

    #[error("No bearer token available for OAuth credentials")]
    #[diagnostic(code(tailctl::missing_token))]
    MissingToken,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({status}): {message}")]
    #[diagnostic(code(tailctl::api_error))]
    Api {
        status: u16,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unexpected response body: {message}")]
    #[diagnostic(code(tailctl::unexpected_body), help("Re-run with --output raw to see it."))]
    UnexpectedBody { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tailctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(tailctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: tailctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(tailctl::no_config),
        help(
            "Create one with: tailctl config init\n\
             Expected at: {path}\n\
             Or pass --api-key / set TSCTL_API_KEY."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(tailctl::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(tailctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(tailctl::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    #[diagnostic(code(tailctl::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NoCredentials { .. }
            | Self::OAuthFailed { .. }
            | Self::AuthFailed { .. }
            | Self::MissingToken => exit_code::AUTH,
            Self::Api { status, .. } => status_exit_code(*status),
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Build an [`Api`](Self::Api) error with help text chosen by status.
    pub fn api(status: u16, message: String) -> Self {
        let help = match status {
            401 => Some("The API key or token was rejected. Check it is not expired or revoked."),
            403 => Some("The credential lacks permission for this operation (check OAuth scopes)."),
            404 => Some("Check the ID, and the tailnet name (--tailnet, or '-' for your own)."),
            409 => Some("The resource changed concurrently. Fetch it again and retry."),
            412 => Some("The ACL ETag no longer matches. Fetch the policy again before updating."),
            429 => Some("Rate limited. Wait a moment and retry."),
            _ => None,
        };
        Self::Api {
            status,
            message,
            help: help.map(str::to_owned),
        }
    }
}

/// Exit code for a non-2xx HTTP status.
pub fn status_exit_code(status: u16) -> i32 {
    match status {
        401 | 403 => exit_code::AUTH,
        404 => exit_code::NOT_FOUND,
        409 => exit_code::CONFLICT,
        _ => exit_code::GENERAL,
    }
}

// ── Library error mapping ────────────────────────────────────────────

impl From<tailctl_api::Error> for CliError {
    fn from(err: tailctl_api::Error) -> Self {
        use tailctl_api::Error as ApiError;

        match err {
            ApiError::Transport(e) if e.is_timeout() => Self::Timeout {
                source: Box::new(e),
            },
            ApiError::Transport(e) => Self::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },
            ApiError::Tls(message) => Self::Tls { message },
            ApiError::MissingCredentials => Self::MissingToken,
            ApiError::Authentication { message } => Self::AuthFailed { message },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "base_url".into(),
                reason: e.to_string(),
            },
            ApiError::InvalidHeader { name, message } => Self::Validation {
                field: format!("header {name}"),
                reason: message,
            },
            ApiError::Api { status, message } => Self::api(status, message),
            ApiError::Deserialization { message, .. } => Self::UnexpectedBody { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(Box::new(other)),
        }
    }
}
