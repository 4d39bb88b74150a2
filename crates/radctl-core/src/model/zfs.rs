// ZFS datasets and pools (`com.oracle.solaris.rad.zfsmgr`).

use serde_json::{Value, json};

use radctl_api::{Href, Interface, Lookup, RadObject, Session};

use crate::error::CoreError;
use crate::model::{decode_payload, get_props};
use crate::property::RawProperty;
use crate::resource::Resource;
use crate::schema::{ZFS_DATASET, ZPOOL};

pub const ZFSMGR_NAMESPACE: &str = "com.oracle.solaris.rad.zfsmgr";
pub const ZFSMGR_VERSION: &str = "1.0";

pub struct ZfsDatasetKind;

impl Interface for ZfsDatasetKind {
    const NAMESPACE: &'static str = ZFSMGR_NAMESPACE;
    const API_VERSION: &'static str = ZFSMGR_VERSION;
    const COLLECTION: &'static str = "ZfsDataset";
}

pub struct ZpoolKind;

impl Interface for ZpoolKind {
    const NAMESPACE: &'static str = ZFSMGR_NAMESPACE;
    const API_VERSION: &'static str = ZFSMGR_VERSION;
    const COLLECTION: &'static str = "Zpool";
}

// ── Datasets ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ZfsDataset<'s> {
    object: RadObject<'s, ZfsDatasetKind>,
}

impl<'s> ZfsDataset<'s> {
    pub fn from_object(object: RadObject<'s, ZfsDatasetKind>) -> Self {
        Self { object }
    }

    pub async fn list(session: &'s Session) -> Result<Vec<Self>, CoreError> {
        let objects = session
            .list_objects(&RadObject::<ZfsDatasetKind>::collection(), false)
            .await?;
        Ok(objects.into_iter().map(Self::from_object).collect())
    }

    /// Resolve a dataset by name, e.g. `rpool/export/home`.
    pub async fn get(session: &'s Session, name: &str) -> Result<Self, CoreError> {
        let object = session
            .get_object(
                &RadObject::<ZfsDatasetKind>::collection(),
                Some(&Lookup::name(name)),
                false,
            )
            .await?;
        Ok(Self::from_object(object))
    }

    pub fn object(&self) -> &RadObject<'s, ZfsDatasetKind> {
        &self.object
    }

    /// Dataset name taken from the href instance id.
    pub fn name(&self) -> Option<&str> {
        self.object.instance_id()
    }

    /// Names of the filesystems below this dataset.
    pub async fn get_filesystems(&self, recursive: bool) -> Result<Vec<String>, CoreError> {
        let payload = self
            .object
            .rad_method("get_filesystems", &json!({ "recursive": recursive }))
            .await?;
        let items: Vec<Value> = decode_payload("get_filesystems", payload)?;
        items.iter().map(filesystem_name).collect()
    }

    pub async fn get_props(&self, names: Option<&[&str]>) -> Result<Vec<RawProperty>, CoreError> {
        get_props(&self.object, &ZFS_DATASET, names).await
    }

    /// `get_props` decoded into a flat `zfs` resource.
    pub async fn get_properties(&self, names: Option<&[&str]>) -> Result<Resource, CoreError> {
        let raw = self.get_props(names).await?;
        Resource::load(&ZFS_DATASET, &raw)
    }
}

/// A `get_filesystems` entry is either a bare name or an object reference.
fn filesystem_name(item: &Value) -> Result<String, CoreError> {
    match item {
        Value::String(name) => Ok(name.clone()),
        Value::Object(fields) => {
            if let Some(Value::String(name)) = fields.get("name") {
                return Ok(name.clone());
            }
            let href = fields
                .get("href")
                .and_then(Value::as_str)
                .ok_or_else(|| CoreError::malformed(format!("filesystem entry {item}")))?;
            let href: Href = href.parse().map_err(CoreError::Api)?;
            href.instance_id()
                .map(str::to_owned)
                .ok_or_else(|| CoreError::malformed(format!("filesystem href {href} has no name")))
        }
        other => Err(CoreError::malformed(format!("filesystem entry {other}"))),
    }
}

// ── Pools ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Zpool<'s> {
    object: RadObject<'s, ZpoolKind>,
}

impl<'s> Zpool<'s> {
    pub fn from_object(object: RadObject<'s, ZpoolKind>) -> Self {
        Self { object }
    }

    pub async fn list(session: &'s Session) -> Result<Vec<Self>, CoreError> {
        let objects = session
            .list_objects(&RadObject::<ZpoolKind>::collection(), false)
            .await?;
        Ok(objects.into_iter().map(Self::from_object).collect())
    }

    pub async fn get(session: &'s Session, name: &str) -> Result<Self, CoreError> {
        let object = session
            .get_object(
                &RadObject::<ZpoolKind>::collection(),
                Some(&Lookup::name(name)),
                false,
            )
            .await?;
        Ok(Self::from_object(object))
    }

    pub fn object(&self) -> &RadObject<'s, ZpoolKind> {
        &self.object
    }

    pub fn name(&self) -> Option<&str> {
        self.object.instance_id()
    }

    pub async fn get_props(&self, names: Option<&[&str]>) -> Result<Vec<RawProperty>, CoreError> {
        get_props(&self.object, &ZPOOL, names).await
    }

    pub async fn get_properties(&self, names: Option<&[&str]>) -> Result<Resource, CoreError> {
        let raw = self.get_props(names).await?;
        Resource::load(&ZPOOL, &raw)
    }
}
