// OAuth client-credentials exchange
//
// Trades a client id/secret for a scoped bearer token and stores it in the
// client's token slot. Refresh and expiry tracking are left to the caller:
// run the exchange again when requests start coming back 401.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::auth::Credentials;
use crate::client::TailnetClient;
use crate::error::Error;
use crate::models::TokenResponse;
use crate::response::ApiResponse;

impl TailnetClient {
    /// Exchange OAuth client credentials for a bearer token.
    ///
    /// `POST {base_url}/oauth/token` (form-encoded, `grant_type=client_credentials`).
    ///
    /// On a 2xx response the `access_token` is stored and every later
    /// request authenticates with it instead of any API key. Non-2xx
    /// responses are returned untouched and leave the slot as it was.
    pub async fn get_oauth_token(
        &self,
        client_id: &str,
        client_secret: &SecretString,
    ) -> Result<ApiResponse, Error> {
        let url = self.api_url("oauth/token")?;
        debug!(client_id, "POST {url} (client-credentials grant)");

        let form = [
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
            ("grant_type", "client_credentials"),
        ];
        let resp = self.http().post(url).form(&form).send().await?;
        let resp = ApiResponse::read(resp).await?;

        if !resp.is_success() {
            debug!(status = resp.status_code(), "token exchange rejected");
            return Ok(resp);
        }

        let token: TokenResponse = resp.json()?;
        if token.access_token.is_empty() {
            return Err(Error::Authentication {
                message: "token endpoint returned an empty access_token".into(),
            });
        }
        debug!(
            expires_in = ?token.expires_in,
            scope = ?token.scope,
            "bearer token acquired"
        );
        self.set_bearer_token(SecretString::from(token.access_token));
        Ok(resp)
    }

    /// Run [`get_oauth_token`](Self::get_oauth_token) with the client's own
    /// OAuth credentials. Returns `Ok(None)` when the client was built with
    /// something other than [`Credentials::OAuth`].
    pub async fn exchange_oauth_credentials(&self) -> Result<Option<ApiResponse>, Error> {
        let Credentials::OAuth {
            client_id,
            client_secret,
        } = self.credentials()
        else {
            return Ok(None);
        };
        self.get_oauth_token(client_id, client_secret)
            .await
            .map(Some)
    }
}
