// Zones and the zone manager (`com.oracle.solaris.rad.zonemgr`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use radctl_api::{Interface, Lookup, RadObject, Session};

use crate::error::CoreError;
use crate::model::decode_payload;
use crate::property::Property;
use crate::resource::{RawResource, Registry, Resource, TMP_ID};
use crate::schema::{ANET, GLOBAL, ZONE_REGISTRY};

pub const ZONEMGR_NAMESPACE: &str = "com.oracle.solaris.rad.zonemgr";
pub const ZONEMGR_VERSION: &str = "1.6";

pub struct ZoneKind;

impl Interface for ZoneKind {
    const NAMESPACE: &'static str = ZONEMGR_NAMESPACE;
    const API_VERSION: &'static str = ZONEMGR_VERSION;
    const COLLECTION: &'static str = "Zone";
}

pub struct ZoneManagerKind;

impl Interface for ZoneManagerKind {
    const NAMESPACE: &'static str = ZONEMGR_NAMESPACE;
    const API_VERSION: &'static str = ZONEMGR_VERSION;
    const COLLECTION: &'static str = "ZoneManager";
}

/// Detailed zone payload from a list/get call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub brand: Option<String>,
    pub uuid: Option<String>,
    pub auxstate: Option<Vec<String>>,
    pub state: Option<String>,
}

// ── Zone ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Zone<'s> {
    object: RadObject<'s, ZoneKind>,
}

impl<'s> Zone<'s> {
    pub fn from_object(object: RadObject<'s, ZoneKind>) -> Self {
        Self { object }
    }

    pub async fn list(session: &'s Session) -> Result<Vec<Self>, CoreError> {
        let objects = session
            .list_objects(&RadObject::<ZoneKind>::collection(), true)
            .await?;
        Ok(objects.into_iter().map(Self::from_object).collect())
    }

    pub async fn get(session: &'s Session, name: &str) -> Result<Self, CoreError> {
        let object = session
            .get_object(
                &RadObject::<ZoneKind>::collection(),
                Some(&Lookup::name(name)),
                true,
            )
            .await?;
        Ok(Self::from_object(object))
    }

    pub fn object(&self) -> &RadObject<'s, ZoneKind> {
        &self.object
    }

    pub fn summary(&self) -> Result<ZoneSummary, CoreError> {
        Ok(self.object.payload_as()?)
    }

    /// `getResources`, optionally restricted to one type or one scope.
    pub async fn get_resources(
        &self,
        filter: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Vec<RawResource>, CoreError> {
        let mut body = Map::new();
        if let Some(filter) = filter {
            body.insert("filter".into(), json!({ "type": filter }));
        }
        if let Some(scope) = scope {
            body.insert("scope".into(), json!({ "type": scope }));
        }
        let payload = self
            .object
            .rad_method("getResources", &Value::Object(body))
            .await?;
        decode_payload("getResources", payload)
    }

    /// `getResourceProperties` for resources of type `filter`, decoded with
    /// that type's schema.
    pub async fn get_resource_properties(
        &self,
        filter: &str,
        properties: Option<&[&str]>,
    ) -> Result<Vec<Property>, CoreError> {
        let schema = ZONE_REGISTRY.schema_for(filter)?;
        let mut body = Map::new();
        body.insert("filter".into(), json!({ "type": filter }));
        if let Some(properties) = properties {
            body.insert("properties".into(), json!(properties));
        }
        let payload = self
            .object
            .rad_method("getResourceProperties", &Value::Object(body))
            .await?;
        let raw = decode_payload::<Vec<_>>("getResourceProperties", payload)?;
        Ok(Resource::load(schema, &raw)?.into_properties())
    }

    /// The zone's full configuration as one tree rooted at `global`, with
    /// per-anet children (vlan, mac) linked under their anet.
    pub async fn get_properties(&self) -> Result<Resource, CoreError> {
        let scoped = self.get_resources(None, Some(ANET.type_tag)).await?;
        let all = self.get_resources(None, None).await?;
        build_resource_tree(&ZONE_REGISTRY, ANET.type_tag, &scoped, &all)
    }
}

/// Assemble the resource tree from two `getResources` results.
///
/// `scoped` holds the children of `scope_type` resources, each naming its
/// parent as `"{type},tmp-id={n}"`. `all` holds every top-level resource;
/// exactly one must be `global`, which becomes the root.
pub fn build_resource_tree(
    registry: &Registry,
    scope_type: &str,
    scoped: &[RawResource],
    all: &[RawResource],
) -> Result<Resource, CoreError> {
    let mut by_parent: HashMap<&str, Vec<Resource>> = HashMap::new();
    for raw in scoped {
        let Some(parent) = raw.parent.as_deref() else {
            debug!(resource = %raw.type_tag, "scoped resource without parent");
            continue;
        };
        by_parent
            .entry(parent)
            .or_default()
            .push(Resource::from_raw(registry, raw)?);
    }

    let mut global = None;
    let mut others = Vec::new();
    for raw in all {
        let mut resource = Resource::from_raw(registry, raw)?;
        if resource.type_tag() == scope_type {
            if let Some(tmp_id) = resource.get(TMP_ID)? {
                let key = format!("{scope_type},{TMP_ID}={tmp_id}");
                if let Some(children) = by_parent.remove(key.as_str()) {
                    resource.set_children(children);
                }
            }
        }
        if resource.type_tag() == GLOBAL.type_tag {
            if global.replace(resource).is_some() {
                return Err(CoreError::malformed("more than one global resource"));
            }
        } else {
            others.push(resource);
        }
    }

    let mut global = global.ok_or_else(|| CoreError::malformed("no global resource"))?;
    global.set_children(others);
    Ok(global)
}

// ── Zone manager ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ZoneManager<'s> {
    object: RadObject<'s, ZoneManagerKind>,
}

impl<'s> ZoneManager<'s> {
    /// The zone manager is a singleton collection; resolve its only member.
    pub async fn open(session: &'s Session) -> Result<Self, CoreError> {
        let mut objects = session
            .list_objects(&RadObject::<ZoneManagerKind>::collection(), false)
            .await?;
        match objects.len() {
            1 => Ok(Self {
                object: objects.remove(0),
            }),
            n => Err(CoreError::malformed(format!(
                "expected one ZoneManager instance, found {n}"
            ))),
        }
    }

    pub fn object(&self) -> &RadObject<'s, ZoneManagerKind> {
        &self.object
    }

    pub async fn create(
        &self,
        name: &str,
        path: Option<&str>,
        template: Option<&str>,
    ) -> Result<Value, CoreError> {
        let body = json!({ "name": name, "path": path, "template": template });
        Ok(self.object.rad_method("create", &body).await?)
    }

    pub async fn delete(&self, name: &str) -> Result<Value, CoreError> {
        Ok(self
            .object
            .rad_method("delete", &json!({ "name": name }))
            .await?)
    }

    /// Apply a zonecfg-style configuration to `name`. With `noexecute` the
    /// daemon only validates it.
    pub async fn import_config(
        &self,
        noexecute: bool,
        name: &str,
        configuration: &str,
    ) -> Result<Value, CoreError> {
        let body = json!({
            "noexecute": noexecute,
            "name": name,
            "configuration": [configuration],
        });
        Ok(self.object.rad_method("importConfig", &body).await?)
    }
}
