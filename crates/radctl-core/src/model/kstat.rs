// Kernel statistics (`com.oracle.solaris.rad.kstat`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};

use radctl_api::{Interface, Lookup, RadObject, Session};

use crate::error::CoreError;
use crate::model::decode_payload;

pub struct KstatKind;

impl Interface for KstatKind {
    const NAMESPACE: &'static str = "com.oracle.solaris.rad.kstat";
    const API_VERSION: &'static str = "2.0";
    const COLLECTION: &'static str = "Kstat";
}

/// One named value in a kstat map. Exactly one of the value fields is
/// normally set, matching `type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nv {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub flags: Option<Value>,
    pub string: Option<String>,
    pub strings: Option<Vec<String>>,
    pub integer: Option<Number>,
    pub integers: Option<Vec<Number>>,
    pub kstat: Option<Value>,
}

impl Nv {
    /// Whichever value field is set, or `0` when none is.
    pub fn value(&self) -> Value {
        if let Some(n) = &self.integer {
            return Value::Number(n.clone());
        }
        if let Some(s) = &self.string {
            return Value::String(s.clone());
        }
        if let Some(ns) = &self.integers {
            return ns.iter().cloned().map(Value::Number).collect();
        }
        if let Some(ss) = &self.strings {
            return ss.iter().cloned().map(Value::String).collect();
        }
        self.kstat.clone().unwrap_or_else(|| json!(0))
    }
}

#[derive(Debug, Clone)]
pub struct Kstat<'s> {
    object: RadObject<'s, KstatKind>,
}

impl<'s> Kstat<'s> {
    /// Resolve a kstat by URI, e.g. `kstat:/system/cpu/0/sys`.
    pub async fn get(session: &'s Session, uri: &str) -> Result<Self, CoreError> {
        let object = session
            .get_object(
                &RadObject::<KstatKind>::collection(),
                Some(&Lookup::uri(uri)),
                false,
            )
            .await?;
        Ok(Self { object })
    }

    pub fn object(&self) -> &RadObject<'s, KstatKind> {
        &self.object
    }

    pub fn uri(&self) -> Option<&str> {
        self.object.instance_id()
    }

    /// `getMap` keyed by statistic name.
    pub async fn get_map(&self) -> Result<BTreeMap<String, Nv>, CoreError> {
        let payload = self.object.rad_method("getMap", &json!({})).await?;
        decode_payload("getMap", payload)
    }

    pub async fn get_flags(&self) -> Result<Value, CoreError> {
        Ok(self.object.rad_method("getFlags", &json!({})).await?)
    }

    pub async fn get_map_metadata(&self) -> Result<Value, CoreError> {
        Ok(self.object.rad_method("getMapMetadata", &json!({})).await?)
    }

    pub async fn get_nv_metadata(&self) -> Result<Value, CoreError> {
        Ok(self.object.rad_method("getNvMetadata", &json!({})).await?)
    }
}
