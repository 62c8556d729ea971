// tailctl-api: Async Rust client for the Tailscale control-plane REST API (v2)

pub mod acl;
pub mod auth;
pub mod client;
pub mod config;
pub mod devices;
pub mod dns;
pub mod error;
pub mod keys;
pub mod logs;
pub mod models;
pub mod oauth;
pub mod response;
pub mod transport;

pub use acl::{ACL_CONTENT_TYPE, AclApplyOutcome};
pub use auth::{AuthStrategy, Credentials};
pub use client::TailnetClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TAILNET};
pub use error::Error;
pub use response::ApiResponse;
pub use transport::{TlsMode, TransportConfig};

// Re-exported so callers can name secrets and statuses without extra deps.
pub use reqwest::StatusCode;
pub use secrecy::{ExposeSecret, SecretString};
