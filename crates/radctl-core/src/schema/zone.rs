// Zone configuration resources, as returned by `Zone.getResources`.

use crate::property::PropertySpec;
use crate::resource::{Registry, Schema};
use crate::value::{BoolLiterals, Decoder};

const ON_OFF: Decoder = Decoder::Boolean(BoolLiterals::ON_OFF);
const TRUE_FALSE: Decoder = Decoder::Boolean(BoolLiterals::TRUE_FALSE);

pub static GLOBAL: Schema = Schema::new(
    "global",
    &[
        PropertySpec::new("zonename", Decoder::String),
        PropertySpec::new("zonepath", Decoder::Path),
        PropertySpec::new("brand", Decoder::String),
        PropertySpec::new("autoboot", TRUE_FALSE),
        PropertySpec::new("autoshutdown", Decoder::String),
        PropertySpec::new("bootargs", Decoder::String),
        PropertySpec::new("file-mac-profile", Decoder::String),
        PropertySpec::new("pool", Decoder::String),
        PropertySpec::new("scheduling-class", Decoder::String),
        PropertySpec::new("ip-type", Decoder::String),
        PropertySpec::new("hostid", Decoder::String),
        PropertySpec::new("tenant", Decoder::String),
        PropertySpec::new("cpu-arch", Decoder::String),
        PropertySpec::new("boot-priority", Decoder::String),
        PropertySpec::new("host-compatible", Decoder::String),
        PropertySpec::new("boot-disk-protection", Decoder::String),
    ],
);

pub static ANET: Schema = Schema::new(
    "anet",
    &[
        PropertySpec::new("id", Decoder::Integer),
        PropertySpec::new("tmp-id", Decoder::Integer),
        PropertySpec::new("vlan-id", Decoder::Integer),
        PropertySpec::new("lower-link", Decoder::String),
        PropertySpec::new("allowed-address", Decoder::String),
        PropertySpec::new("configure-allowed-address", TRUE_FALSE),
        PropertySpec::new("defrouter", Decoder::String),
        PropertySpec::new("allowed-dhcp-cids", Decoder::String),
        PropertySpec::new("link-protection", Decoder::Array),
        PropertySpec::new("iov", ON_OFF),
        PropertySpec::new("lro", Decoder::String),
        PropertySpec::new("ring-group", Decoder::String),
        PropertySpec::new("mac-address", Decoder::String),
        PropertySpec::new("auto-mac-address", Decoder::String),
    ],
);

pub static VLAN: Schema = Schema::new(
    "vlan",
    &[
        PropertySpec::new("tmp-id", Decoder::Integer),
        PropertySpec::new("vlan-id", Decoder::Integer),
        PropertySpec::new("allowed-vlan-ids", Decoder::Array),
    ],
);

pub static MAC: Schema = Schema::new("mac", &[PropertySpec::new("tmp-id", Decoder::Integer)]);

pub static DEVICE: Schema = Schema::new(
    "device",
    &[
        PropertySpec::new("id", Decoder::Integer),
        PropertySpec::new("tmp-id", Decoder::Integer),
        PropertySpec::new("create-size", Decoder::Size),
        PropertySpec::new("storage", Decoder::String),
        PropertySpec::new("allow-partition", TRUE_FALSE),
        PropertySpec::new("allow-raw-io", TRUE_FALSE),
        PropertySpec::new("bootpri", Decoder::Integer),
    ],
);

pub static CAPPED_MEMORY: Schema = Schema::new(
    "capped-memory",
    &[
        PropertySpec::new("physical", Decoder::Bytes),
        PropertySpec::new("pagesize-policy", Decoder::String),
    ],
);

pub static VIRTUAL_CPU: Schema = Schema::new(
    "virtual-cpu",
    &[PropertySpec::new("ncpus", Decoder::IntegerOrString)],
);

pub static CAPPED_CPU: Schema = Schema::new(
    "capped-cpu",
    &[PropertySpec::new("ncpus", Decoder::IntegerOrString)],
);

pub static DEDICATED_CPU: Schema = Schema::new(
    "dedicated-cpu",
    &[PropertySpec::new("ncpus", Decoder::IntegerOrString)],
);

pub static SUSPEND: Schema = Schema::new("suspend", &[PropertySpec::new("path", Decoder::Path)]);

pub static KEYSOURCE: Schema = Schema::new("keysource", &[PropertySpec::new("raw", Decoder::String)]);

pub static ZONE_REGISTRY: Registry = Registry::new(&[
    &GLOBAL,
    &ANET,
    &DEVICE,
    &VLAN,
    &MAC,
    &CAPPED_MEMORY,
    &VIRTUAL_CPU,
    &CAPPED_CPU,
    &DEDICATED_CPU,
    &SUSPEND,
    &KEYSOURCE,
]);
