// RAD response envelope.
//
// Every RAD REST reply is `{ "status": "...", "payload": ... }`. The status
// is the string "success" on success; anything else is an error status
// whose details live in `payload.code` / `payload.stderr`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, STATUS_NOT_FOUND};

/// Status string of a successful call.
pub const STATUS_SUCCESS: &str = "success";

#[derive(Deserialize)]
struct Envelope {
    status: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// Normalized reply: envelope status plus decoded JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RadResponse {
    /// HTTP status code of the underlying exchange.
    pub http_status: u16,
    pub status: String,
    pub payload: Value,
}

impl RadResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn is_not_found(&self) -> bool {
        self.status == STATUS_NOT_FOUND
    }

    /// Read a scalar payload field as a string (numbers are stringified).
    pub fn payload_field(&self, key: &str) -> Option<String> {
        match self.payload.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Decode an HTTP reply. Replies without a parseable envelope are
    /// mapped to an `HTTP <code>` status when the HTTP status is an error,
    /// and rejected otherwise.
    pub(crate) async fn from_http(resp: reqwest::Response) -> Result<Self, Error> {
        let http = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        Self::from_body(http, body)
    }

    pub(crate) fn from_body(http: reqwest::StatusCode, body: String) -> Result<Self, Error> {
        if body.trim().is_empty() && http.is_success() {
            return Ok(Self {
                http_status: http.as_u16(),
                status: STATUS_SUCCESS.into(),
                payload: Value::Null,
            });
        }

        match serde_json::from_str::<Envelope>(&body) {
            Ok(Envelope {
                status: Some(status),
                payload,
            }) => Ok(Self {
                http_status: http.as_u16(),
                status,
                payload,
            }),
            _ if !http.is_success() => Ok(Self {
                http_status: http.as_u16(),
                status: format!("HTTP {http}"),
                payload: Value::Null,
            }),
            Ok(_) => Err(Error::Deserialization {
                message: "response envelope has no status".into(),
                body,
            }),
            Err(e) => {
                let preview: String = body.chars().take(200).collect();
                Err(Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                })
            }
        }
    }
}
