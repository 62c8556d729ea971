// DNS endpoints: global nameservers, MagicDNS preference, search paths.

use tracing::debug;

use crate::client::TailnetClient;
use crate::error::Error;
use crate::models::{DnsPreferences, NameserversRequest, SearchPathsRequest};
use crate::response::ApiResponse;

impl TailnetClient {
    /// `GET /tailnet/{tailnet}/dns/nameservers`
    pub async fn get_nameservers(&self) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("dns/nameservers")?;
        self.get(url).await
    }

    /// Replace the global nameserver list. An empty list also turns
    /// MagicDNS off server-side.
    ///
    /// `POST /tailnet/{tailnet}/dns/nameservers` with `{"dns": [...]}`
    pub async fn set_nameservers(&self, nameservers: &[String]) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("dns/nameservers")?;
        debug!(?nameservers, "setting nameservers");
        self.post_json(
            url,
            &NameserversRequest {
                dns: nameservers.to_vec(),
            },
        )
        .await
    }

    /// `GET /tailnet/{tailnet}/dns/preferences`
    pub async fn get_dns_preferences(&self) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("dns/preferences")?;
        self.get(url).await
    }

    /// `POST /tailnet/{tailnet}/dns/preferences` with `{"magicDNS": <bool>}`
    pub async fn set_dns_preferences(&self, magic_dns: bool) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("dns/preferences")?;
        debug!(magic_dns, "setting DNS preferences");
        self.post_json(url, &DnsPreferences { magic_dns }).await
    }

    /// `GET /tailnet/{tailnet}/dns/searchpaths`
    pub async fn get_dns_searchpaths(&self) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("dns/searchpaths")?;
        self.get(url).await
    }

    /// Replace the search path list.
    ///
    /// `POST /tailnet/{tailnet}/dns/searchpaths` with `{"searchPaths": [...]}`
    pub async fn set_dns_searchpaths(&self, search_paths: &[String]) -> Result<ApiResponse, Error> {
        let url = self.tailnet_url("dns/searchpaths")?;
        debug!(?search_paths, "setting DNS search paths");
        self.post_json(
            url,
            &SearchPathsRequest {
                search_paths: search_paths.to_vec(),
            },
        )
        .await
    }
}
