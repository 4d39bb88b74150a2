// ── Href addressing ──
//
// Every remote object is addressed by `api/{namespace}/{version}/{collection}`
// optionally followed by an instance id or a `_rad_reference/{N}` suffix.
// Parsing keeps the instance id as the server spelled it, so rendering a
// parsed href reproduces it byte for byte.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

const API_SEGMENT: &str = "api";
const REFERENCE_SEGMENT: &str = "_rad_reference";

/// What an [`Href`] points at below its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// The collection itself.
    Collection,
    /// One named instance. `id` is percent-decoded and may contain `/`;
    /// `encoded` is the path text rendered into the href.
    Instance { id: String, encoded: String },
    /// A server-assigned numeric reference (e.g. a login session).
    Reference(u64),
}

/// Parsed form of a RAD href.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Href {
    namespace: String,
    version: String,
    collection: String,
    target: Target,
}

impl Target {
    /// Instance target for a decoded id, encoded the canonical way.
    fn instance(id: String) -> Self {
        let encoded = encode_instance(&id);
        Self::Instance { id, encoded }
    }
}

impl Href {
    /// Collection-scoped href: `api/{namespace}/{version}/{collection}`.
    pub fn collection(
        namespace: impl Into<String>,
        version: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            version: version.into(),
            collection: collection.into(),
            target: Target::Collection,
        }
    }

    /// Same collection, scoped to one instance.
    pub fn with_instance(mut self, instance_id: impl Into<String>) -> Self {
        self.target = Target::instance(instance_id.into());
        self
    }

    /// Same collection, scoped to a numeric reference.
    pub fn with_reference(mut self, reference_id: u64) -> Self {
        self.target = Target::Reference(reference_id);
        self
    }

    /// Same href with a different API version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// `true` when the href names the whole collection.
    pub fn is_collection(&self) -> bool {
        matches!(self.target, Target::Collection)
    }

    pub fn instance_id(&self) -> Option<&str> {
        match &self.target {
            Target::Instance { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn reference_id(&self) -> Option<u64> {
        match self.target {
            Target::Reference(id) => Some(id),
            _ => None,
        }
    }

    /// Replace the target with an instance id, or reset to the collection.
    pub fn set_instance_id(&mut self, instance_id: Option<String>) {
        self.target = instance_id.map_or(Target::Collection, Target::instance);
    }

    /// Drop the target, leaving the collection href.
    pub fn to_collection(&self) -> Self {
        Self {
            target: Target::Collection,
            ..self.clone()
        }
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{API_SEGMENT}/{}/{}/{}",
            self.namespace, self.version, self.collection
        )?;
        match &self.target {
            Target::Collection => Ok(()),
            Target::Instance { encoded, .. } => write!(f, "/{encoded}"),
            Target::Reference(id) => write!(f, "/{REFERENCE_SEGMENT}/{id}"),
        }
    }
}

impl FromStr for Href {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let href = raw.strip_prefix('/').unwrap_or(raw);
        let parts: Vec<&str> = href.split('/').collect();

        if parts.first() != Some(&API_SEGMENT) {
            return Err(Error::malformed_href(raw, "must start with 'api'"));
        }

        let (namespace, version, collection) = match parts.get(1..4) {
            Some([ns, ver, coll]) if !ns.is_empty() && !ver.is_empty() && !coll.is_empty() => {
                (*ns, *ver, *coll)
            }
            _ => {
                return Err(Error::malformed_href(
                    raw,
                    "expected api/{namespace}/{version}/{collection}",
                ));
            }
        };

        let target = match parts.get(4) {
            None | Some(&"") => Target::Collection,
            Some(&REFERENCE_SEGMENT) => {
                let id = match parts.get(5..) {
                    Some([id]) => id.parse::<u64>().map_err(|_| {
                        Error::malformed_href(raw, format!("reference id '{id}' is not an integer"))
                    })?,
                    _ => {
                        return Err(Error::malformed_href(
                            raw,
                            "expected exactly one segment after _rad_reference",
                        ));
                    }
                };
                Target::Reference(id)
            }
            Some(_) => {
                let encoded = parts.get(4..).unwrap_or_default().join("/");
                let decoded = urlencoding::decode(&encoded)
                    .map_err(|e| Error::malformed_href(raw, format!("invalid instance id: {e}")))?;
                Target::Instance {
                    id: decoded.into_owned(),
                    encoded,
                }
            }
        };

        Ok(Self {
            namespace: namespace.to_owned(),
            version: version.to_owned(),
            collection: collection.to_owned(),
            target,
        })
    }
}

/// Percent-encode an instance id, keeping `/` and `,` literal.
fn encode_instance(id: &str) -> String {
    id.split('/')
        .map(|segment| urlencoding::encode(segment).replace("%2C", ","))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_collection_href() {
        let href: Href = "api/com.oracle.solaris.rad.zonemgr/1.6/Zone".parse().unwrap();
        assert_eq!(href.namespace(), "com.oracle.solaris.rad.zonemgr");
        assert_eq!(href.version(), "1.6");
        assert_eq!(href.collection_name(), "Zone");
        assert!(href.is_collection());
        assert_eq!(href.instance_id(), None);
        assert_eq!(href.reference_id(), None);
    }

    #[test]
    fn nested_instance_keeps_slashes() {
        let href: Href = "api/ns/ver/coll/inst1/inst2".parse().unwrap();
        assert_eq!(href.instance_id(), Some("inst1/inst2"));
    }

    #[test]
    fn strips_one_leading_slash() {
        let href: Href = "/api/ns/ver/coll/x".parse().unwrap();
        assert_eq!(href.instance_id(), Some("x"));
        assert_eq!(href.to_string(), "api/ns/ver/coll/x");
    }

    #[test]
    fn rejects_missing_api_prefix() {
        let err = "not-api/x/y/z".parse::<Href>().unwrap_err();
        assert!(matches!(err, Error::MalformedHref { .. }), "got {err:?}");
    }

    #[test]
    fn rejects_missing_segments() {
        assert!("api/ns/ver".parse::<Href>().is_err());
        assert!("api//ver/coll".parse::<Href>().is_err());
        assert!("".parse::<Href>().is_err());
    }

    #[test]
    fn parses_rad_reference() {
        let href: Href = "api/com.oracle.solaris.rad.authentication/1.0/Session/_rad_reference/1024"
            .parse()
            .unwrap();
        assert_eq!(href.reference_id(), Some(1024));
        assert_eq!(href.instance_id(), None);
    }

    #[test]
    fn rejects_non_numeric_reference() {
        let err = "api/ns/1.0/Session/_rad_reference/abc"
            .parse::<Href>()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedHref { .. }));
    }

    #[test]
    fn round_trips_canonical_hrefs() {
        for raw in [
            "api/ns/1.0/Zone",
            "api/ns/1.0/Zone/web01",
            "api/ns/1.0/ZfsDataset/rpool/export/home",
            "api/ns/1.0/Session/_rad_reference/7",
            "api/ns/1.0/Kstat/kstat%3A/zones/cpu,0",
            "api/ns/1.0/ZfsDataset/tank/with%20space",
            "api/ns/1.0/ZfsDataset/rpool%2Fexport",
            "api/ns/1.0/Kstat/kstat%3a/zones/cpu%2C0",
        ] {
            let href: Href = raw.parse().unwrap();
            assert_eq!(href.to_string(), raw);
        }
    }

    #[test]
    fn server_encoding_is_kept_verbatim() {
        let href: Href = "api/ns/1.0/ZfsDataset/rpool%2Fexport%2Ch".parse().unwrap();
        assert_eq!(href.instance_id(), Some("rpool/export,h"));
        assert_eq!(href.to_string(), "api/ns/1.0/ZfsDataset/rpool%2Fexport%2Ch");

        let rebuilt = Href::collection("ns", "1.0", "ZfsDataset").with_instance("rpool/export,h");
        assert_eq!(rebuilt.to_string(), "api/ns/1.0/ZfsDataset/rpool/export,h");
    }

    #[test]
    fn encodes_reserved_characters_except_slash_and_comma() {
        let href = Href::collection("ns", "1.0", "ZfsDataset").with_instance("rpool/data set?#,x");
        assert_eq!(
            href.to_string(),
            "api/ns/1.0/ZfsDataset/rpool/data%20set%3F%23,x"
        );
    }

    #[test]
    fn set_instance_id_toggles_scope() {
        let mut href = Href::collection("ns", "1.0", "Zone");
        href.set_instance_id(Some("web01".into()));
        assert_eq!(href.instance_id(), Some("web01"));
        href.set_instance_id(None);
        assert!(href.is_collection());
        assert_eq!(href.to_string(), "api/ns/1.0/Zone");
    }
}
