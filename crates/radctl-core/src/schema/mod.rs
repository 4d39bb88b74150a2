// Static schema tables for the resource kinds radctl understands.

mod zfs;
mod zone;

pub use zfs::{ZFS_DATASET, ZPOOL};
pub use zone::{
    ANET, CAPPED_CPU, CAPPED_MEMORY, DEDICATED_CPU, DEVICE, GLOBAL, KEYSOURCE, MAC, SUSPEND,
    VIRTUAL_CPU, VLAN, ZONE_REGISTRY,
};
