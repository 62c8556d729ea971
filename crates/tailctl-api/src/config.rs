// ── Runtime client configuration ──
//
// Describes *how* to reach the API: base URL, tailnet, credentials, default
// headers and transport tuning. Never touches disk; `tailctl-config` builds
// one of these from profiles and hands it in.

use std::collections::BTreeMap;

use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Public Tailscale API root.
pub const DEFAULT_BASE_URL: &str = "https://api.tailscale.com/api/v2";

/// Tailnet alias meaning "the tailnet the credential belongs to".
pub const DEFAULT_TAILNET: &str = "-";

/// Configuration for one [`TailnetClient`](crate::TailnetClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.tailscale.com/api/v2`.
    pub base_url: Url,
    /// Tailnet name used by tailnet-scoped endpoints.
    pub tailnet: String,
    pub credentials: Credentials,
    /// Headers sent on every request. Starts as `Accept: application/json`.
    pub headers: BTreeMap<String, String>,
    pub transport: TransportConfig,
}

impl ClientConfig {
    /// Config against the public API with default headers and transport.
    pub fn new(tailnet: impl Into<String>, credentials: Credentials) -> Result<Self, Error> {
        Ok(Self {
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            tailnet: tailnet.into(),
            credentials,
            headers: default_headers(),
            transport: TransportConfig::default(),
        })
    }

    /// Point the config at a different API root.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, Error> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    /// Add or replace a default header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

/// The header set every client starts with.
pub fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Accept".to_owned(), "application/json".to_owned())])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_public_defaults() {
        let config = ClientConfig::new("example.com", Credentials::api_key("k")).unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.tailnet, "example.com");
        assert_eq!(
            config.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn with_header_overrides_default() {
        let config = ClientConfig::new("-", Credentials::api_key("k"))
            .unwrap()
            .with_header("Accept", "application/hujson");
        assert_eq!(config.headers.len(), 1);
        assert_eq!(config.headers["Accept"], "application/hujson");
    }

    #[test]
    fn with_base_url_rejects_garbage() {
        let config = ClientConfig::new("-", Credentials::api_key("k")).unwrap();
        assert!(matches!(
            config.with_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }
}
