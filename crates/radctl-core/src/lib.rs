// radctl-core: typed decoding of RAD property/resource payloads and the
// managed object kinds (zones, zone manager, ZFS datasets, pools, kstats).

pub mod error;
pub mod model;
pub mod property;
pub mod resource;
pub mod schema;
pub mod value;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use property::{Property, PropertySpec, RawProperty};
pub use resource::{RawResource, Registry, Resource, Schema, TMP_ID};
pub use value::{BoolLiterals, DecodeError, Decoder, PropertyValue, format_bytes, format_size};

pub use model::{
    Kstat, KstatKind, Nv, ZfsDataset, ZfsDatasetKind, Zone, ZoneKind, ZoneManager,
    ZoneManagerKind, ZoneSummary, Zpool, ZpoolKind, build_resource_tree,
};

// The protocol layer, for consumers that only depend on core.
pub use radctl_api as api;
pub use radctl_api::{Endpoint, Protocol, Session, SessionConfig, SessionState, TlsMode};
