// Audit (configuration) and network flow log endpoints.
//
// `start` and `end` are RFC 3339 UTC timestamps (`2023-05-12T14:29:00Z`).
// They are written into the query string as given; no validation happens
// here and `Url::set_query` only escapes characters that cannot appear in a
// query at all.

use tracing::debug;
use url::Url;

use crate::client::TailnetClient;
use crate::error::Error;
use crate::response::ApiResponse;

impl TailnetClient {
    /// Configuration audit log entries between `start` and `end`.
    ///
    /// `GET /tailnet/{tailnet}/logs?start=&end=`
    pub async fn get_audit_logs(&self, start: &str, end: &str) -> Result<ApiResponse, Error> {
        let url = self.log_url("logs", start, end)?;
        self.get(url).await
    }

    /// Older name for [`get_audit_logs`](Self::get_audit_logs).
    #[deprecated(note = "use get_audit_logs")]
    pub async fn get_logs(&self, start: &str, end: &str) -> Result<ApiResponse, Error> {
        self.get_audit_logs(start, end).await
    }

    /// Network flow log entries between `start` and `end`.
    ///
    /// `GET /tailnet/{tailnet}/network-logs?start=&end=`
    pub async fn get_network_logs(&self, start: &str, end: &str) -> Result<ApiResponse, Error> {
        let url = self.log_url("network-logs", start, end)?;
        self.get(url).await
    }

    fn log_url(&self, path: &str, start: &str, end: &str) -> Result<Url, Error> {
        let mut url = self.tailnet_url(path)?;
        url.set_query(Some(&format!("start={start}&end={end}")));
        debug!(start, end, "log window");
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::auth::Credentials;
    use crate::client::TailnetClient;

    #[test]
    fn log_url_keeps_timestamps_verbatim() {
        let client = TailnetClient::with_client(
            reqwest::Client::new(),
            "https://api.tailscale.com/api/v2",
            "example.com",
            Credentials::api_key("k"),
        )
        .unwrap();

        let url = client
            .log_url("network-logs", "2023-05-12T14:29:00Z", "2023-05-12T14:29:10Z")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.tailscale.com/api/v2/tailnet/example.com/network-logs\
             ?start=2023-05-12T14:29:00Z&end=2023-05-12T14:29:10Z"
        );
    }
}
