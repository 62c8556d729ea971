// Tailscale API HTTP client
//
// Wraps `reqwest::Client` with base-URL/tailnet path construction and
// per-request credential selection. Endpoint groups (devices, keys, acl,
// dns, logs, oauth) are inherent methods in their own files; this module
// only owns transport mechanics.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;
use reqwest::RequestBuilder;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{AuthStrategy, Credentials};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::response::ApiResponse;
use crate::transport::header_map;

/// Client for one tailnet on one API root.
///
/// Every endpoint method issues exactly one HTTP request and returns the
/// [`ApiResponse`] as received; non-2xx statuses are not errors.
///
/// # Credential selection
///
/// A stored bearer token always wins. Without one, an API key goes out as
/// HTTP Basic (`key:` with an empty password). OAuth client credentials
/// alone send nothing and fail locally with [`Error::MissingCredentials`].
///
/// # Bearer token slot
///
/// The token is the only mutable state. It is written by
/// [`get_oauth_token`](Self::get_oauth_token),
/// [`set_bearer_token`](Self::set_bearer_token) and
/// [`clear_bearer_token`](Self::clear_bearer_token); the lock is held only
/// while a request's headers are built, never across an `.await`. Treat
/// those three methods as single-writer: concurrent exchanges race and the
/// last one wins.
pub struct TailnetClient {
    http: reqwest::Client,
    base_url: Url,
    tailnet: String,
    credentials: Credentials,
    bearer_token: RwLock<Option<SecretString>>,
}

impl TailnetClient {
    /// Build a client from a [`ClientConfig`].
    ///
    /// The config's header map becomes the `reqwest::Client` default header
    /// set. Credentials are attached per request.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let headers = header_map(&config.headers)?;
        let http = config.transport.build_client_with_headers(headers)?;
        Ok(Self::assemble(
            http,
            config.base_url,
            config.tailnet,
            config.credentials,
        ))
    }

    /// Wrap an existing `reqwest::Client` (caller manages default headers).
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        tailnet: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self::assemble(http, base_url, tailnet.into(), credentials))
    }

    fn assemble(
        http: reqwest::Client,
        base_url: Url,
        tailnet: String,
        credentials: Credentials,
    ) -> Self {
        let bearer = match &credentials {
            Credentials::Bearer(token) => Some(token.clone()),
            Credentials::ApiKey(_) | Credentials::OAuth { .. } => None,
        };
        Self {
            http,
            base_url,
            tailnet,
            credentials,
            bearer_token: RwLock::new(bearer),
        }
    }

    /// The configured API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The tailnet used by tailnet-scoped endpoints.
    pub fn tailnet(&self) -> &str {
        &self.tailnet
    }

    /// The credentials the client was constructed with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Bearer token slot ────────────────────────────────────────────

    /// Store a bearer token; every later request uses it instead of the API key.
    pub fn set_bearer_token(&self, token: SecretString) {
        trace!("storing bearer token");
        *self
            .bearer_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the stored bearer token, falling back to the configured credentials.
    pub fn clear_bearer_token(&self) {
        trace!("clearing bearer token");
        *self
            .bearer_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The scheme the next request will authenticate with, or `None` if it
    /// would fail with [`Error::MissingCredentials`].
    pub fn auth_strategy(&self) -> Option<AuthStrategy> {
        if self.has_bearer_token() {
            return Some(AuthStrategy::Bearer);
        }
        self.credentials.initial_strategy()
    }

    /// Attach exactly one `Authorization` header.
    fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, Error> {
        {
            let guard = self
                .bearer_token
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(token) = guard.as_ref() {
                return Ok(builder.bearer_auth(token.expose_secret()));
            }
        }

        match &self.credentials {
            Credentials::ApiKey(key) => Ok(builder.basic_auth(key.expose_secret(), Some(""))),
            Credentials::Bearer(token) => Ok(builder.bearer_auth(token.expose_secret())),
            Credentials::OAuth { .. } => Err(Error::MissingCredentials),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base_url}/{path}` with exactly one slash at the join.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// `{base_url}/tailnet/{tailnet}/{path}`
    pub(crate) fn tailnet_url(&self, path: &str) -> Result<Url, Error> {
        let path = path.trim_start_matches('/');
        self.api_url(&format!("tailnet/{}/{path}", self.tailnet))
    }

    /// `{base_url}/device/{id}` plus an optional suffix.
    pub(crate) fn device_url(&self, device_id: &str, suffix: Option<&str>) -> Result<Url, Error> {
        match suffix {
            Some(suffix) => self.api_url(&format!("device/{device_id}/{suffix}")),
            None => self.api_url(&format!("device/{device_id}")),
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get(&self, url: Url) -> Result<ApiResponse, Error> {
        debug!("GET {url}");
        self.send(self.http.get(url)).await
    }

    pub(crate) async fn post_json<B: Serialize + Sync + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<ApiResponse, Error> {
        debug!("POST {url}");
        self.send(self.http.post(url).json(body)).await
    }

    /// POST `body` untouched with the given content type and extra headers.
    pub(crate) async fn post_raw(
        &self,
        url: Url,
        body: Bytes,
        content_type: &'static str,
        extra_headers: HeaderMap,
    ) -> Result<ApiResponse, Error> {
        debug!(bytes = body.len(), "POST {url}");
        let builder = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .headers(extra_headers)
            .body(body);
        self.send(builder).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<ApiResponse, Error> {
        debug!("DELETE {url}");
        self.send(self.http.delete(url)).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<ApiResponse, Error> {
        let builder = self.authorize(builder)?;
        let resp = builder.send().await?;
        let resp = ApiResponse::read(resp).await?;
        debug!(status = resp.status_code(), "response received");
        Ok(resp)
    }
}

impl fmt::Debug for TailnetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TailnetClient")
            .field("base_url", &self.base_url.as_str())
            .field("tailnet", &self.tailnet)
            .field("credentials", &self.credentials)
            .field("auth_strategy", &self.auth_strategy())
            .finish_non_exhaustive()
    }
}
