use thiserror::Error;

/// Top-level error type for the `tailctl-api` crate.
///
/// Unsuccessful HTTP statuses are *not* errors: every endpoint method hands
/// back an [`ApiResponse`](crate::ApiResponse) and the caller branches on the
/// status. This enum only covers failures that happen before or instead of
/// a response: transport, URL construction, and local credential state.
/// [`ApiResponse::error_for_status`](crate::ApiResponse::error_for_status)
/// is the opt-in path that turns a non-2xx response into [`Error::Api`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// No usable credential: OAuth client credentials are configured but
    /// no bearer token has been exchanged yet.
    #[error("No credentials available -- call get_oauth_token first or configure an API key")]
    MissingCredentials,

    /// The OAuth exchange returned success but no usable token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A configured header name or value is not valid HTTP.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response, raised only through `ApiResponse::error_for_status`.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::MissingCredentials | Self::Authentication { .. } => true,
            Self::Api { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Returns `true` if the failure happened on the wire and the same
    /// request could plausibly succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
