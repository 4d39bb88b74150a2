// ── Managed object kinds ──
//
// Each kind pairs an `Interface` marker (namespace, version, collection)
// with a thin wrapper over `RadObject` exposing that kind's remote methods.

pub mod kstat;
pub mod zfs;
pub mod zone;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use radctl_api::{Interface, RadObject};

use crate::error::CoreError;
use crate::property::RawProperty;
use crate::resource::Schema;

pub use kstat::{Kstat, KstatKind, Nv};
pub use zfs::{ZfsDataset, ZfsDatasetKind, Zpool, ZpoolKind};
pub use zone::{Zone, ZoneKind, ZoneManager, ZoneManagerKind, ZoneSummary, build_resource_tree};

/// Deserialize a remote method payload into `T`.
pub(crate) fn decode_payload<T: DeserializeOwned>(method: &str, payload: Value) -> Result<T, CoreError> {
    serde_json::from_value(payload)
        .map_err(|e| CoreError::malformed(format!("unexpected {method} reply: {e}")))
}

/// `get_props` with definitions derived from `schema`, shared by datasets and pools.
pub(crate) async fn get_props<K: Interface>(
    object: &RadObject<'_, K>,
    schema: &Schema,
    names: Option<&[&str]>,
) -> Result<Vec<RawProperty>, CoreError> {
    let body = json!({ "props": schema.definitions(names) });
    let payload = object.rad_method("get_props", &body).await?;
    decode_payload("get_props", payload)
}
