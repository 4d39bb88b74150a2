// ── Addressable objects ──
//
// A `RadObject<K>` is one remote object of kind `K`: either the whole
// collection or one instance of it. It borrows the `Session` it was
// resolved through and uses it only to issue requests.

use std::fmt;
use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, STATUS_NOT_FOUND};
use crate::href::Href;
use crate::response::RadResponse;
use crate::session::Session;

/// Class-level constants of one remote object kind.
pub trait Interface {
    /// Interface namespace, e.g. `com.oracle.solaris.rad.zonemgr`.
    const NAMESPACE: &'static str;
    /// Default API version requested for this kind.
    const API_VERSION: &'static str;
    /// Collection name, also the key of the detailed payload in list/get replies.
    const COLLECTION: &'static str;
}

/// A remote object of kind `K`, optionally bound to a session.
pub struct RadObject<'s, K> {
    session: Option<&'s Session>,
    href: Href,
    payload: Option<Value>,
    kind: PhantomData<K>,
}

impl<K> Clone for RadObject<'_, K> {
    fn clone(&self) -> Self {
        Self {
            session: self.session,
            href: self.href.clone(),
            payload: self.payload.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for RadObject<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadObject")
            .field("href", &self.href.to_string())
            .field("attached", &self.session.is_some())
            .field("payload", &self.payload)
            .finish()
    }
}

impl<K: Interface> RadObject<'static, K> {
    /// Detached prototype addressing the whole collection.
    pub fn collection() -> Self {
        Self::detached(Href::collection(K::NAMESPACE, K::API_VERSION, K::COLLECTION))
    }

    /// Detached prototype addressing one instance.
    pub fn instance(instance_id: impl Into<String>) -> Self {
        Self::detached(
            Href::collection(K::NAMESPACE, K::API_VERSION, K::COLLECTION).with_instance(instance_id),
        )
    }

    /// Detached object parsed from an href string. The href must address
    /// this kind's namespace and collection; any version is accepted.
    pub fn parse(href: &str) -> Result<Self, Error> {
        let parsed: Href = href.parse()?;
        if parsed.namespace() != K::NAMESPACE || parsed.collection_name() != K::COLLECTION {
            return Err(Error::malformed_href(
                href,
                format!("does not address {}/{}", K::NAMESPACE, K::COLLECTION),
            ));
        }
        Ok(Self::detached(parsed))
    }

    fn detached(href: Href) -> Self {
        Self {
            session: None,
            href,
            payload: None,
            kind: PhantomData,
        }
    }
}

impl<'s, K> RadObject<'s, K> {
    /// Object returned by a list/get call.
    pub(crate) fn bound(session: &'s Session, href: Href, payload: Option<Value>) -> Self {
        Self {
            session: Some(session),
            href,
            payload,
            kind: PhantomData,
        }
    }

    /// Re-bind this object to `session`, keeping href and payload.
    pub fn attach<'t>(self, session: &'t Session) -> RadObject<'t, K> {
        RadObject {
            session: Some(session),
            href: self.href,
            payload: self.payload,
            kind: PhantomData,
        }
    }

    /// Request a different API version of the same interface.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.href = self.href.with_version(version);
        self
    }

    pub fn href(&self) -> &Href {
        &self.href
    }

    pub(crate) fn href_mut(&mut self) -> &mut Href {
        &mut self.href
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.href.instance_id()
    }

    pub fn session(&self) -> Option<&'s Session> {
        self.session
    }

    /// Raw payload from the detailed list/get reply, if any.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Deserialize the detailed payload into a typed summary.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let payload = self.payload.clone().unwrap_or(Value::Null);
        serde_json::from_value(payload).map_err(|e| Error::Deserialization {
            message: format!("{} payload: {e}", self.href),
            body: self
                .payload
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_default(),
        })
    }

    /// Issue `method` against `{session url}/{href}{path}`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RadResponse, Error> {
        let session = self.session.ok_or_else(|| Error::Detached {
            href: self.href.to_string(),
        })?;
        session.send(method, &format!("{}{path}", self.href), body).await
    }

    /// Invoke a remote method (`PUT {href}/_rad_method/{name}`) and return
    /// the payload of a successful call.
    pub async fn rad_method(&self, name: &str, body: &Value) -> Result<Value, Error> {
        let resp = self
            .request(Method::PUT, &format!("/_rad_method/{name}"), Some(body))
            .await?;
        if resp.is_success() {
            return Ok(resp.payload);
        }

        let code = resp.payload_field("code");
        let stderr = resp.payload_field("stderr");
        warn!(
            href = %self.href,
            method = name,
            status = %resp.status,
            code = code.as_deref().unwrap_or("-"),
            stderr = stderr.as_deref().unwrap_or("-"),
            "remote method failed"
        );

        if resp.status == STATUS_NOT_FOUND {
            return Err(Error::NotFound {
                href: self.href.to_string(),
            });
        }
        Err(Error::RemoteMethod {
            method: name.to_owned(),
            message: stderr.unwrap_or_else(|| resp.status.clone()),
            status: resp.status,
            code,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Widget;

    impl Interface for Widget {
        const NAMESPACE: &'static str = "com.example.widgets";
        const API_VERSION: &'static str = "1.2";
        const COLLECTION: &'static str = "Widget";
    }

    #[test]
    fn prototypes_render_hrefs() {
        assert_eq!(
            RadObject::<Widget>::collection().href().to_string(),
            "api/com.example.widgets/1.2/Widget"
        );
        let one = RadObject::<Widget>::instance("w1");
        assert_eq!(one.instance_id(), Some("w1"));
        assert!(one.session().is_none());
    }

    #[test]
    fn parse_checks_kind() {
        let ok = RadObject::<Widget>::parse("api/com.example.widgets/1.0/Widget/w2").unwrap();
        assert_eq!(ok.href().version(), "1.0");
        assert_eq!(ok.instance_id(), Some("w2"));

        let err = RadObject::<Widget>::parse("api/com.example.other/1.0/Widget").unwrap_err();
        assert!(matches!(err, Error::MalformedHref { .. }));
    }

    #[test]
    fn api_version_override() {
        let obj = RadObject::<Widget>::collection().with_api_version("2.0");
        assert_eq!(obj.href().to_string(), "api/com.example.widgets/2.0/Widget");
    }

    #[tokio::test]
    async fn detached_request_fails() {
        let obj = RadObject::<Widget>::instance("w1");
        let err = obj.rad_method("poke", &Value::Null).await.unwrap_err();
        assert!(matches!(err, Error::Detached { .. }), "got {err:?}");
    }

    #[test]
    fn payload_as_reports_shape_errors() {
        #[derive(serde::Deserialize)]
        struct Summary {
            #[allow(dead_code)]
            name: String,
        }
        let obj = RadObject::<Widget>::collection();
        assert!(obj.payload_as::<Summary>().is_err());
        assert!(obj.payload_as::<Option<Summary>>().unwrap().is_none());
    }
}
