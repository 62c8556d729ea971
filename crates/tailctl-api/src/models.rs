// Request bodies and response models for the v2 API.
//
// Request bodies are one struct per write endpoint so the wire field names
// are fixed at compile time. Response models exist for callers that want to
// parse an `ApiResponse`; the client itself never does. Fields use
// `#[serde(default)]` and a flattened `extra` map because the API adds
// fields over time.

use serde::{Deserialize, Serialize};

// ── Request bodies ───────────────────────────────────────────────────

/// `POST /device/{id}/authorized`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedRequest {
    pub authorized: bool,
}

/// `POST /device/{id}/tags`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsRequest {
    pub tags: Vec<String>,
}

/// `POST /device/{id}/routes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesRequest {
    pub routes: Vec<String>,
}

/// `POST /tailnet/{tailnet}/dns/nameservers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameserversRequest {
    pub dns: Vec<String>,
}

/// `POST /tailnet/{tailnet}/dns/searchpaths`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPathsRequest {
    pub search_paths: Vec<String>,
}

/// DNS preferences, both the request body and the response of
/// `/tailnet/{tailnet}/dns/preferences`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsPreferences {
    #[serde(rename = "magicDNS")]
    pub magic_dns: bool,
}

/// `POST /tailnet/{tailnet}/keys`
///
/// ```json
/// {
///   "capabilities": { "devices": { "create": {
///       "reusable": false, "ephemeral": false, "preauthorized": false,
///       "tags": ["tag:example"] } } },
///   "expirySeconds": 86400,
///   "description": "ci runners"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyRequest {
    pub capabilities: KeyCapabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCapabilities {
    #[serde(default)]
    pub devices: DeviceCapabilities,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    #[serde(default)]
    pub create: DeviceCreateCapabilities,
}

/// What a device joining with the key is allowed to do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCreateCapabilities {
    #[serde(default)]
    pub reusable: bool,
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default)]
    pub preauthorized: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl CreateKeyRequest {
    /// An auth key request with the given device-creation capabilities.
    pub fn auth_key(create: DeviceCreateCapabilities) -> Self {
        Self {
            capabilities: KeyCapabilities {
                devices: DeviceCapabilities { create },
            },
            expiry_seconds: None,
            description: None,
        }
    }

    pub fn with_expiry_seconds(mut self, seconds: u64) -> Self {
        self.expiry_seconds = Some(seconds);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ── OAuth ────────────────────────────────────────────────────────────

/// Token endpoint response for the client-credentials grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// `GET /tailnet/{tailnet}/devices`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceList {
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// A device as returned by `/device/{id}` and the device list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub authorized: bool,
    #[serde(default)]
    pub client_version: Option<String>,
    #[serde(default)]
    pub update_available: bool,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub key_expiry_disabled: bool,
    /// Catch-all for fields not modelled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `GET /device/{id}/routes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRoutes {
    #[serde(default)]
    pub advertised_routes: Vec<String>,
    #[serde(default)]
    pub enabled_routes: Vec<String>,
}

// ── Keys ─────────────────────────────────────────────────────────────

/// `GET /tailnet/{tailnet}/keys`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyList {
    #[serde(default)]
    pub keys: Vec<Key>,
}

/// An auth key. `key` is only present in the create response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub revoked: Option<String>,
    #[serde(default)]
    pub capabilities: Option<KeyCapabilities>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── DNS ──────────────────────────────────────────────────────────────

/// `GET /tailnet/{tailnet}/dns/nameservers`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nameservers {
    #[serde(default)]
    pub dns: Vec<String>,
    /// Present in the set response when the change toggled MagicDNS.
    #[serde(default, rename = "magicDNS", skip_serializing_if = "Option::is_none")]
    pub magic_dns: Option<bool>,
}

/// `GET /tailnet/{tailnet}/dns/searchpaths`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPaths {
    #[serde(default)]
    pub search_paths: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn request_bodies_use_wire_names() {
        assert_eq!(
            serde_json::to_value(AuthorizedRequest { authorized: true }).unwrap(),
            json!({"authorized": true})
        );
        assert_eq!(
            serde_json::to_value(SearchPathsRequest {
                search_paths: vec!["corp.example.com".into()]
            })
            .unwrap(),
            json!({"searchPaths": ["corp.example.com"]})
        );
        assert_eq!(
            serde_json::to_value(DnsPreferences { magic_dns: false }).unwrap(),
            json!({"magicDNS": false})
        );
        assert_eq!(
            serde_json::to_value(NameserversRequest {
                dns: vec!["8.8.8.8".into()]
            })
            .unwrap(),
            json!({"dns": ["8.8.8.8"]})
        );
    }

    #[test]
    fn create_key_request_shape() {
        let req = CreateKeyRequest::auth_key(DeviceCreateCapabilities {
            reusable: true,
            ephemeral: false,
            preauthorized: true,
            tags: vec!["tag:ci".into()],
        })
        .with_expiry_seconds(3600)
        .with_description("ci runners");

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "capabilities": {"devices": {"create": {
                    "reusable": true,
                    "ephemeral": false,
                    "preauthorized": true,
                    "tags": ["tag:ci"]
                }}},
                "expirySeconds": 3600,
                "description": "ci runners"
            })
        );
    }

    #[test]
    fn create_key_request_omits_unset_optionals() {
        let value = serde_json::to_value(CreateKeyRequest::default()).unwrap();
        assert_eq!(
            value,
            json!({"capabilities": {"devices": {"create": {
                "reusable": false, "ephemeral": false, "preauthorized": false
            }}}})
        );
    }

    #[test]
    fn device_keeps_unknown_fields() {
        let device: Device = serde_json::from_value(json!({
            "id": "12345",
            "name": "laptop.tail1234.ts.net",
            "addresses": ["100.64.0.1"],
            "tags": ["tag:dev"],
            "authorized": true,
            "blocksIncomingConnections": false
        }))
        .unwrap();

        assert_eq!(device.id, "12345");
        assert_eq!(device.addresses, vec!["100.64.0.1"]);
        assert!(device.authorized);
        assert!(device.extra.contains_key("blocksIncomingConnections"));
    }
}
