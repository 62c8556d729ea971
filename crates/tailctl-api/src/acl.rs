// Policy file (ACL) endpoints
//
// Policy bodies are HuJSON and go out byte-for-byte: callers pass the file
// contents, never a re-serialized value, so comments and formatting survive.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, IF_MATCH};
use tracing::{debug, info};

use crate::client::TailnetClient;
use crate::error::Error;
use crate::response::ApiResponse;

/// Content type for policy bodies. The API accepts plain JSON under it too.
pub const ACL_CONTENT_TYPE: &str = "application/hujson";

/// Result of [`TailnetClient::apply_acls`].
#[derive(Debug, Clone)]
pub enum AclApplyOutcome {
    /// Validation did not return 200; no update was sent.
    Rejected(ApiResponse),
    /// Validation passed and the update was sent. Its status is not
    /// interpreted; check it before trusting the body.
    Submitted(ApiResponse),
}

impl AclApplyOutcome {
    /// The last response received.
    pub fn response(&self) -> &ApiResponse {
        match self {
            Self::Rejected(resp) | Self::Submitted(resp) => resp,
        }
    }

    /// `true` when the update was sent and returned 200.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Submitted(resp) if resp.status_code() == 200)
    }
}

impl TailnetClient {
    /// Current policy file.
    ///
    /// `GET /tailnet/{tailnet}/acl`
    pub async fn get_acls(&self) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("acl")?;
        self.get(url).await
    }

    /// Run the policy through the server-side validator without applying it.
    ///
    /// `POST /tailnet/{tailnet}/acl/validate`
    pub async fn validate_acls(&self, policy: impl AsRef<[u8]>) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("acl/validate")?;
        let body = Bytes::copy_from_slice(policy.as_ref());
        self.post_raw(url, body, ACL_CONTENT_TYPE, HeaderMap::new())
            .await
    }

    /// Replace the whole policy file. This is not a diff: the body must be
    /// the complete policy as it should exist afterwards.
    ///
    /// `POST /tailnet/{tailnet}/acl`
    pub async fn update_acls(&self, policy: impl AsRef<[u8]>) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("acl")?;
        let body = Bytes::copy_from_slice(policy.as_ref());
        self.post_raw(url, body, ACL_CONTENT_TYPE, HeaderMap::new())
            .await
    }

    /// [`update_acls`](Self::update_acls) guarded by `If-Match`. The server
    /// answers 412 if the policy changed since `etag` was read.
    pub async fn update_acls_if_match(
        &self,
        policy: impl AsRef<[u8]>,
        etag: &str,
    ) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("acl")?;
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(etag).map_err(|e| Error::InvalidHeader {
            name: IF_MATCH.to_string(),
            message: e.to_string(),
        })?;
        headers.insert(IF_MATCH, value);
        let body = Bytes::copy_from_slice(policy.as_ref());
        self.post_raw(url, body, ACL_CONTENT_TYPE, headers).await
    }

    /// Validate, then update only if validation returned exactly 200.
    pub async fn apply_acls(&self, policy: impl AsRef<[u8]>) -> Result<AclApplyOutcome, Error> {
        let policy = policy.as_ref();

        debug!(bytes = policy.len(), "validating policy");
        let validation = self.validate_acls(policy).await?;
        if validation.status_code() != 200 {
            info!(
                status = validation.status_code(),
                "policy rejected by validator; skipping update"
            );
            return Ok(AclApplyOutcome::Rejected(validation));
        }

        debug!("policy validated, updating");
        let update = self.update_acls(policy).await?;
        Ok(AclApplyOutcome::Submitted(update))
    }
}
