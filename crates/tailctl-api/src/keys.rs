// Auth key endpoints
//
// Keys are scoped to the tailnet and to the user owning the credential.

use tracing::debug;

use crate::client::TailnetClient;
use crate::error::Error;
use crate::models::CreateKeyRequest;
use crate::response::ApiResponse;

impl TailnetClient {
    /// List active keys.
    ///
    /// `GET /tailnet/{tailnet}/keys`
    pub async fn get_keys(&self) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("keys")?;
        self.get(url).await
    }

    /// Same request as [`get_keys`](Self::get_keys).
    pub async fn get_authorization_keys(&self) -> Result<ApiResponse, Error> {
        self.get_keys().await
    }

    /// One key by ID.
    ///
    /// `GET /tailnet/{tailnet}/keys/{id}`
    pub async fn get_key(&self, key_id: &str) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url(&format!("keys/{key_id}"))?;
        self.get(url).await
    }

    /// Create a key with the requested capabilities.
    ///
    /// The response carries the secret `key` field exactly once; the server
    /// cannot return it again.
    ///
    /// `POST /tailnet/{tailnet}/keys`
    pub async fn create_authorization_key(
        &self,
        request: &CreateKeyRequest,
    ) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("keys")?;
        debug!(
            reusable = request.capabilities.devices.create.reusable,
            ephemeral = request.capabilities.devices.create.ephemeral,
            "creating auth key"
        );
        self.post_json(url, request).await
    }

    /// Revoke a key.
    ///
    /// `DELETE /tailnet/{tailnet}/keys/{id}`
    pub async fn delete_key(&self, key_id: &str) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url(&format!("keys/{key_id}"))?;
        debug!(key_id, "deleting key");
        self.delete(url).await
    }
}
