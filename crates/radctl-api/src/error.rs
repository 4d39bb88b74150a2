use thiserror::Error;

/// Status string the daemon reports when the addressed object does not exist.
pub const STATUS_NOT_FOUND: &str = "object not found";

/// Top-level error type for the `radctl-api` crate.
///
/// Protocol-level failures (a well-formed HTTP exchange whose envelope
/// status is not `"success"`) are always translated into one of the typed
/// variants below. Transport failures are carried through unchanged in
/// [`Error::Transport`]. `radctl-core` wraps these into its own error.
#[derive(Debug, Error)]
pub enum Error {
    // ── Addressing ──────────────────────────────────────────────────
    /// The href does not start with `api` or lacks a required segment.
    #[error("Malformed href '{href}': {reason}")]
    MalformedHref { href: String, reason: String },

    /// A collection-only operation was attempted on an instance, or the reverse.
    #[error("Invalid scope for {operation} on {href}: {reason}")]
    InvalidScope {
        operation: &'static str,
        href: String,
        reason: &'static str,
    },

    /// The object has no session attached, so it cannot issue requests.
    #[error("Object {href} is not attached to a session")]
    Detached { href: String },

    // ── Authentication ──────────────────────────────────────────────
    /// The login RPC returned a non-success status.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Protocol ────────────────────────────────────────────────────
    /// The daemon reported `object not found` for the addressed href.
    #[error("Object not found: {href}")]
    NotFound { href: String },

    /// A list/get request returned a non-success status.
    #[error("Request to {href} failed: {status}")]
    RequestFailed { href: String, status: String },

    /// A remote method returned a non-success status.
    #[error("Remote method '{method}' failed: {message}")]
    RemoteMethod {
        method: String,
        status: String,
        code: Option<String>,
        message: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Endpoint URL has an unsupported scheme or no host.
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// TLS configuration error (unreadable or invalid CA bundle).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Session cache ───────────────────────────────────────────────
    /// I/O failure while persisting the session cache.
    #[error("Session cache error at {path}: {source}")]
    Cache {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON payload did not have the expected shape, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::RemoteMethod { status, .. } => status == STATUS_NOT_FOUND,
            _ => false,
        }
    }

    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::RequestFailed { status, .. } => status.contains("401"),
            _ => false,
        }
    }

    /// Extract the remote error code, if the daemon supplied one.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::RemoteMethod { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn malformed_href(href: &str, reason: impl Into<String>) -> Self {
        Self::MalformedHref {
            href: href.to_owned(),
            reason: reason.into(),
        }
    }
}
