// HTTP transport for RAD sessions.
//
// Wraps a `reqwest::Client` plus the cookie jar that carries the RAD
// session cookie. The client itself cannot be persisted, so the transport
// exposes a serializable `TransportState` (TLS policy + cookies) that the
// session cache stores and later restores.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::cookie::{CookieStore, Jar};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::response::RadResponse;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification policy for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "path", rename_all = "snake_case")]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Verify against a custom CA bundle (PEM).
    CustomCa(PathBuf),
    /// Accept any certificate. RAD daemons ship self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

impl TlsMode {
    /// Map the login flags (`--ssl-cert-verify`, `--ssl-cert-path`) to a policy.
    /// A CA path implies verification.
    pub fn from_flags(verify: bool, ca_path: Option<PathBuf>) -> Self {
        match (verify, ca_path) {
            (_, Some(path)) => Self::CustomCa(path),
            (true, None) => Self::System,
            (false, None) => Self::DangerAcceptInvalid,
        }
    }
}

/// Persistable part of a [`Transport`].
///
/// The jar only exposes `name=value` pairs, so cookie attributes are not
/// stored. On restore every cookie is re-scoped to the base URL with
/// `Path=/`, plus `Secure` for https endpoints. Expiry is not kept; the
/// cache age limit and the liveness check decide whether a login is reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportState {
    pub tls: TlsMode,
    /// `name=value` pairs scoped to the session base URL.
    #[serde(default)]
    pub cookies: Vec<String>,
}

/// One HTTP client bound to a TLS policy and a cookie jar.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    cookie_jar: Arc<Jar>,
    tls: TlsMode,
}

impl Transport {
    /// Fresh, unauthenticated transport with an empty cookie jar.
    pub fn new(tls: TlsMode, timeout: Duration) -> Result<Self, Error> {
        let cookie_jar = Arc::new(Jar::default());
        let http = build_client(&tls, timeout, &cookie_jar)?;
        Ok(Self {
            http,
            cookie_jar,
            tls,
        })
    }

    /// Rebuild a transport from cached state, re-seeding the cookie jar.
    pub fn restore(state: TransportState, base_url: &Url, timeout: Duration) -> Result<Self, Error> {
        let transport = Self::new(state.tls, timeout)?;
        let secure = if base_url.scheme() == "https" { "; Secure" } else { "" };
        for cookie in &state.cookies {
            transport
                .cookie_jar
                .add_cookie_str(&format!("{cookie}; Path=/{secure}"), base_url);
        }
        trace!(count = state.cookies.len(), "restored cookies");
        Ok(transport)
    }

    /// Capture the persistable state for `base_url`.
    pub fn snapshot(&self, base_url: &Url) -> TransportState {
        let cookies = self
            .cookie_jar
            .cookies(base_url)
            .and_then(|header| header.to_str().ok().map(String::from))
            .map(|header| {
                header
                    .split("; ")
                    .filter(|pair| !pair.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        TransportState {
            tls: self.tls.clone(),
            cookies,
        }
    }

    pub fn tls(&self) -> &TlsMode {
        &self.tls
    }

    /// Send one request and normalize the reply into a [`RadResponse`].
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<RadResponse, Error> {
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;

        RadResponse::from_http(resp).await
    }
}

fn build_client(tls: &TlsMode, timeout: Duration, jar: &Arc<Jar>) -> Result<reqwest::Client, Error> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("radctl/", env!("CARGO_PKG_VERSION")))
        .cookie_provider(Arc::clone(jar));

    match tls {
        TlsMode::System => {}
        TlsMode::CustomCa(path) => {
            let cert_pem = std::fs::read(path)
                .map_err(|e| Error::Tls(format!("failed to read CA cert {}: {e}", path.display())))?;
            let cert = reqwest::Certificate::from_pem(&cert_pem)
                .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        TlsMode::DangerAcceptInvalid => {
            builder = builder.danger_accept_invalid_certs(true);
        }
    }

    builder
        .build()
        .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
}
