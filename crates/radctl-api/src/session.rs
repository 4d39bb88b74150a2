// ── RAD session ──
//
// One authenticated connection to one endpoint. The session owns its
// transport, persists it to a per-endpoint cache file after login, and
// resolves addressable objects through list/get calls.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::{Display, EnumString};
use tracing::{debug, info};
use url::Url;

use crate::cache::{self, CacheFile};
use crate::error::Error;
use crate::href::Href;
use crate::object::{Interface, RadObject};
use crate::response::RadResponse;
use crate::transport::{DEFAULT_TIMEOUT, TlsMode, Transport};

/// Default RAD REST port.
pub const DEFAULT_PORT: u16 = 6788;

const DETAIL_QUERY: &str = "?_rad_detail";

/// The authentication interface's `Session` collection.
pub struct Authentication;

impl Interface for Authentication {
    const NAMESPACE: &'static str = "com.oracle.solaris.rad.authentication";
    const API_VERSION: &'static str = "1.0";
    const COLLECTION: &'static str = "Session";
}

// ── Endpoint & configuration ────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

/// Protocol, host and port of one RAD daemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(protocol: Protocol, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol,
            host: host.into(),
            port,
        }
    }

    /// Parse `https://host[:port]`. The port defaults to 6788.
    pub fn from_url(raw: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::InvalidEndpoint {
            url: raw.to_owned(),
            reason: reason.to_owned(),
        };
        let url = Url::parse(raw)?;
        let protocol: Protocol = url
            .scheme()
            .parse()
            .map_err(|_| invalid("scheme must be http or https"))?;
        let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
        Ok(Self::new(protocol, host, url.port().unwrap_or(DEFAULT_PORT)))
    }

    /// `{protocol}://{host}:{port}`
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// Cache file name: `{protocol}_{host}_{port}.dat`.
    pub fn cache_file_name(&self) -> String {
        format!("{}_{}_{}.dat", self.protocol, self.host, self.port)
    }
}

/// Everything a [`Session`] needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub endpoint: Endpoint,
    pub tls: TlsMode,
    /// Directory holding the per-endpoint cache files.
    pub cache_dir: PathBuf,
    /// Cached sessions older than this are discarded. Zero never expires.
    pub max_session_time: Duration,
    pub timeout: Duration,
    /// Check a cached session is still alive before trusting it.
    pub verify_cached: bool,
}

impl SessionConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            tls: TlsMode::default(),
            cache_dir: default_cache_dir(),
            max_session_time: Duration::ZERO,
            timeout: DEFAULT_TIMEOUT,
            verify_cached: true,
        }
    }

    pub fn from_url(raw: &str) -> Result<Self, Error> {
        Endpoint::from_url(raw).map(Self::new)
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_max_session_time(mut self, max: Duration) -> Self {
        self.max_session_time = max;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_verify_cached(mut self, verify: bool) -> Self {
        self.verify_cached = verify;
        self
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(self.endpoint.cache_file_name())
    }
}

/// `~/.cache/rad`
pub fn default_cache_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".cache").join("rad"),
        |dirs| dirs.home_dir().join(".cache").join("rad"),
    )
}

// ── State ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    /// Fresh transport, no login reference.
    Unauthenticated,
    /// Restored from the cache without a liveness check.
    Cached,
    /// Logged in this run, or cached and verified live.
    Authenticated,
    /// The cached session failed its liveness check and was discarded.
    Stale,
}

/// Instance override for [`Session::get_object`]. `name` wins over `uri`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    pub name: Option<String>,
    pub uri: Option<String>,
}

impl Lookup {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            uri: None,
        }
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            name: None,
            uri: Some(uri.into()),
        }
    }

    fn instance_id(&self) -> Option<&str> {
        self.name.as_deref().or(self.uri.as_deref())
    }
}

// ── Session ─────────────────────────────────────────────────────────

/// An authenticated (or authenticatable) connection to one RAD endpoint.
///
/// Not meant for concurrent use: every operation awaits its single request
/// before returning.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    base_url: Url,
    transport: Transport,
    reference_id: Option<u64>,
    state: SessionState,
}

impl Session {
    /// Unauthenticated session with a fresh transport. Does not touch the cache.
    pub fn new(config: SessionConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&config.endpoint.url())?;
        let transport = Transport::new(config.tls.clone(), config.timeout)?;
        Ok(Self {
            config,
            base_url,
            transport,
            reference_id: None,
            state: SessionState::Unauthenticated,
        })
    }

    /// `new` followed by `load(false)`.
    pub async fn open(config: SessionConfig) -> Result<Self, Error> {
        let mut session = Self::new(config)?;
        session.load(false).await?;
        Ok(session)
    }

    /// Release the transport. Cached state on disk is left as is.
    pub fn close(self) {
        debug!(endpoint = %self.url(), state = %self.state, "closing session");
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn reference_id(&self) -> Option<u64> {
        self.reference_id
    }

    /// `{protocol}://{host}:{port}`
    pub fn url(&self) -> String {
        self.config.endpoint.url()
    }

    pub fn cache_path(&self) -> PathBuf {
        self.config.cache_path()
    }

    /// This session's own href: the login reference, or the `Session`
    /// collection before login.
    pub fn href(&self) -> Href {
        let href = Href::collection(
            Authentication::NAMESPACE,
            Authentication::API_VERSION,
            Authentication::COLLECTION,
        );
        match self.reference_id {
            Some(id) => href.with_reference(id),
            None => href,
        }
    }

    /// Restore the cached transport when allowed, otherwise start fresh.
    pub async fn load(&mut self, force: bool) -> Result<SessionState, Error> {
        debug!(force, "loading or generating session");

        let cached = if force {
            None
        } else {
            cache::read(&self.cache_path(), self.config.max_session_time)
        };

        let Some(cached) = cached else {
            self.fresh_transport()?;
            debug!("created new session");
            return Ok(self.state);
        };

        self.transport = Transport::restore(cached.transport, &self.base_url, self.config.timeout)?;
        self.config.tls = self.transport.tls().clone();
        self.reference_id = cached.reference_id;
        self.state = SessionState::Cached;

        if self.config.verify_cached {
            if self.is_logged_in().await? {
                self.state = SessionState::Authenticated;
            } else {
                debug!("cached session is no longer valid");
                self.fresh_transport()?;
                self.state = SessionState::Stale;
            }
        }
        Ok(self.state)
    }

    /// Authenticate and persist the session.
    ///
    /// Always starts from a fresh transport using `tls`. On failure the
    /// cache file is left untouched.
    pub async fn login(
        &mut self,
        username: &str,
        password: &SecretString,
        tls: TlsMode,
    ) -> Result<(), Error> {
        self.config.tls = tls;
        self.load(true).await?;

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
            "scheme": "pam",
            "preserve": true,
            "timeout": -1,
        });
        let resp = self
            .send(Method::POST, &self.href().to_string(), Some(&body))
            .await?;
        if !resp.is_success() {
            debug!(host = %self.config.endpoint.host, username, status = %resp.status, "login failed");
            return Err(Error::Authentication {
                message: format!("login to {} as {username} failed: {}", self.url(), resp.status),
            });
        }

        let reference = resp
            .payload_field("href")
            .and_then(|raw| raw.parse::<Href>().ok())
            .and_then(|href| href.reference_id().map(|id| (href, id)));
        let Some((href, reference_id)) = reference else {
            debug!(payload = %resp.payload, "login reply without a session reference");
            return Err(Error::Authentication {
                message: format!("login to {} returned no session reference", self.url()),
            });
        };

        self.reference_id = Some(reference_id);
        self.state = SessionState::Authenticated;
        self.save()?;
        info!(host = %self.config.endpoint.host, username, href = %href, "logged in");
        Ok(())
    }

    /// Persist the transport state and reference id.
    pub fn save(&self) -> Result<(), Error> {
        let snapshot = CacheFile::new(self.transport.snapshot(&self.base_url), self.reference_id);
        cache::write(&self.cache_path(), &snapshot)
    }

    /// Drop back to Unauthenticated and remove the cache file.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.fresh_transport()?;
        cache::remove(&self.cache_path())
    }

    /// Check the login reference is still alive with a `GET`.
    pub async fn is_logged_in(&self) -> Result<bool, Error> {
        let Some(id) = self.reference_id else {
            return Ok(false);
        };
        let resp = self.send(Method::GET, &self.href().to_string(), None).await?;
        if !resp.is_success() {
            debug!(reference = id, status = %resp.status, "session liveness check failed");
        }
        Ok(resp.is_success())
    }

    // ── Object resolution ───────────────────────────────────────────

    /// List every member of the collection `prototype` addresses.
    pub async fn list_objects<'a, K: Interface>(
        &'a self,
        prototype: &RadObject<'_, K>,
        detailed: bool,
    ) -> Result<Vec<RadObject<'a, K>>, Error> {
        let href = prototype.href();
        if !href.is_collection() {
            return Err(Error::InvalidScope {
                operation: "list",
                href: href.to_string(),
                reason: "object addresses an instance, not a collection",
            });
        }

        let resp = self.send(Method::GET, &with_detail(href, detailed), None).await?;
        if !resp.is_success() {
            return Err(Error::RequestFailed {
                href: href.to_string(),
                status: resp.status,
            });
        }

        let items = match resp.payload {
            Value::Array(items) => items,
            other => {
                return Err(Error::Deserialization {
                    message: format!("list of {href} did not return an array"),
                    body: other.to_string(),
                });
            }
        };
        items
            .into_iter()
            .map(|item| self.hydrate::<K>(item, None))
            .collect()
    }

    /// Fetch one instance. `lookup` overrides the prototype's instance id.
    pub async fn get_object<'a, K: Interface>(
        &'a self,
        prototype: &RadObject<'_, K>,
        lookup: Option<&Lookup>,
        detailed: bool,
    ) -> Result<RadObject<'a, K>, Error> {
        let mut target = prototype.clone();
        if let Some(id) = lookup.and_then(Lookup::instance_id) {
            target.href_mut().set_instance_id(Some(id.to_owned()));
        }
        let href = target.href();
        if href.is_collection() {
            return Err(Error::InvalidScope {
                operation: "get",
                href: href.to_string(),
                reason: "object addresses a collection; supply an instance id",
            });
        }

        let resp = self.send(Method::GET, &with_detail(href, detailed), None).await?;
        if resp.is_not_found() {
            return Err(Error::NotFound {
                href: href.to_string(),
            });
        }
        if !resp.is_success() {
            return Err(Error::RequestFailed {
                href: href.to_string(),
                status: resp.status,
            });
        }
        self.hydrate::<K>(resp.payload, Some(href))
    }

    fn hydrate<K: Interface>(
        &self,
        mut item: Value,
        requested: Option<&Href>,
    ) -> Result<RadObject<'_, K>, Error> {
        let href = match item.get("href").and_then(Value::as_str) {
            Some(raw) => raw.parse::<Href>()?,
            None => requested.cloned().ok_or_else(|| Error::Deserialization {
                message: format!("{} item has no href", K::COLLECTION),
                body: item.to_string(),
            })?,
        };
        let payload = item
            .get_mut(K::COLLECTION)
            .map(Value::take)
            .filter(|v| !v.is_null());
        Ok(RadObject::bound(self, href, payload))
    }

    // ── Transport plumbing ──────────────────────────────────────────

    pub(crate) async fn send(
        &self,
        method: Method,
        relative: &str,
        body: Option<&Value>,
    ) -> Result<RadResponse, Error> {
        let url = self.base_url.join(relative)?;
        self.transport.send(method, url, body).await
    }

    fn fresh_transport(&mut self) -> Result<(), Error> {
        self.transport = Transport::new(self.config.tls.clone(), self.config.timeout)?;
        self.reference_id = None;
        self.state = SessionState::Unauthenticated;
        Ok(())
    }
}

fn with_detail(href: &Href, detailed: bool) -> String {
    if detailed {
        format!("{href}{DETAIL_QUERY}")
    } else {
        href.to_string()
    }
}
