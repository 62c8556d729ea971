// The raw HTTP result every endpoint hands back.
//
// Status, headers and body are captured as received. Parsing is opt-in via
// `json()` / `json_value()`, and turning a non-2xx status into an error is
// opt-in via `error_for_status()`.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::Error;

/// Error body shape returned by the API on non-2xx responses.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// An HTTP response, unmodified.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Drain a `reqwest::Response` into an owned value.
    pub(crate) async fn read(resp: reqwest::Response) -> Result<Self, Error> {
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Assemble a response by hand (tests, fixtures).
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Numeric status code, for callers that compare against literals.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The `ETag` header, used by the ACL endpoint for `If-Match` updates.
    pub fn etag(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| {
            let body = self.text();
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Deserialize the body into an untyped JSON value.
    pub fn json_value(&self) -> Result<serde_json::Value, Error> {
        self.json()
    }

    /// Pass successful responses through; convert anything else into
    /// [`Error::Api`] using the API's `{"message": ...}` error body.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            return Ok(self);
        }
        Err(Error::Api {
            status: self.status.as_u16(),
            message: self.error_message(),
        })
    }

    /// Best-effort human-readable error message for a non-2xx response.
    pub fn error_message(&self) -> String {
        if let Ok(ErrorBody {
            message: Some(message),
        }) = serde_json::from_slice::<ErrorBody>(&self.body)
        {
            return message;
        }
        let raw = self.text();
        let raw = raw.trim();
        if raw.is_empty() {
            self.status.to_string()
        } else {
            raw.chars().take(200).collect()
        }
    }
}
