// Device endpoints
//
// Listing, details, authorization, tags and subnet routes. Device-scoped
// paths hang off `/device/{id}`; only the list is tailnet-scoped.

use tracing::debug;

use crate::client::TailnetClient;
use crate::error::Error;
use crate::models::{AuthorizedRequest, RoutesRequest, TagsRequest};
use crate::response::ApiResponse;

impl TailnetClient {
    /// List the devices in the tailnet.
    ///
    /// `GET /tailnet/{tailnet}/devices`
    pub async fn get_devices(&self) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("devices")?;
        self.get(url).await
    }

    /// Details for one device.
    ///
    /// `GET /device/{id}`
    pub async fn get_device(&self, device_id: &str) -> Result<ApiResponse, Error> {
        let url = self.device_url(device_id, None)?;
        self.get(url).await
    }

    /// Authorize a device into the tailnet. Only needed on tailnets with
    /// device approval turned on.
    ///
    /// `POST /device/{id}/authorized` with `{"authorized": true}`
    pub async fn authorize_device(&self, device_id: &str) -> Result<ApiResponse, Error> {
        self.set_device_authorized(device_id, true).await
    }

    /// Authorize or de-authorize a device.
    ///
    /// `POST /device/{id}/authorized` with `{"authorized": <bool>}`
    pub async fn set_device_authorized(
        &self,
        device_id: &str,
        authorized: bool,
    ) -> Result<ApiResponse, Error> {
        let url = self.device_url(device_id, Some("authorized"))?;
        debug!(device_id, authorized, "setting device authorization");
        self.post_json(url, &AuthorizedRequest { authorized }).await
    }

    /// Replace a device's tags. Tags must already be in `tag:<name>` form.
    ///
    /// `POST /device/{id}/tags` with `{"tags": [...]}`
    pub async fn update_device_tags(
        &self,
        device_id: &str,
        tags: &[String],
    ) -> Result<ApiResponse, Error> {
        let url = self.device_url(device_id, Some("tags"))?;
        debug!(device_id, ?tags, "updating device tags");
        self.post_json(
            url,
            &TagsRequest {
                tags: tags.to_vec(),
            },
        )
        .await
    }

    /// Subnet routes a device advertises, and which of them are enabled.
    /// The two sets are independent.
    ///
    /// `GET /device/{id}/routes`
    pub async fn get_device_routes(&self, device_id: &str) -> Result<ApiResponse, Error> {
        let url = self.device_url(device_id, Some("routes"))?;
        self.get(url).await
    }

    /// Replace the enabled subnet routes for a device. Routes are CIDR
    /// strings and may be enabled before the device advertises them.
    ///
    /// `POST /device/{id}/routes` with `{"routes": [...]}`
    pub async fn set_device_routes(
        &self,
        device_id: &str,
        routes: &[String],
    ) -> Result<ApiResponse, Error> {
        let url = self.device_url(device_id, Some("routes"))?;
        debug!(device_id, ?routes, "setting device routes");
        self.post_json(
            url,
            &RoutesRequest {
                routes: routes.to_vec(),
            },
        )
        .await
    }

    /// Remove a device from the tailnet.
    ///
    /// `DELETE /device/{id}`
    pub async fn delete_device(&self, device_id: &str) -> Result<ApiResponse, Error> {
        let url = self.device_url(device_id, None)?;
        debug!(device_id, "deleting device");
        self.delete(url).await
    }
}
