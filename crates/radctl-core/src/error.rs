// ── Core error types ──
//
// Protocol errors from radctl-api pass through unchanged. The core adds
// the failures of decoding RAD's loosely typed property/resource payloads.

use thiserror::Error;

use crate::value::DecodeError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Protocol (wrapped transparently) ─────────────────────────────
    #[error(transparent)]
    Api(#[from] radctl_api::Error),

    // ── Decoding ─────────────────────────────────────────────────────
    #[error("Cannot decode property '{property}': {source}")]
    Decode {
        property: String,
        #[source]
        source: DecodeError,
    },

    #[error("Unknown resource type '{type_tag}'")]
    UnknownResourceType { type_tag: String },

    #[error("Property '{name}' appears more than once in resource '{resource}'")]
    DuplicateProperty { resource: String, name: String },

    // ── Structure ────────────────────────────────────────────────────
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_not_found())
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_auth_expired())
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}
