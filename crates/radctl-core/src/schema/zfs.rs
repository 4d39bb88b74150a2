// Flat property tables for `ZfsDataset.get_props` and `Zpool.get_props`.

use crate::property::PropertySpec;
use crate::resource::Schema;
use crate::value::{BoolLiterals, Decoder};

const ON_OFF: Decoder = Decoder::Boolean(BoolLiterals::ON_OFF);

pub static ZFS_DATASET: Schema = Schema::new(
    "zfs",
    &[
        PropertySpec::new("name", Decoder::Path),
        PropertySpec::new("available", Decoder::Bytes),
        PropertySpec::new("compressratio", Decoder::String),
        PropertySpec::new("creation", Decoder::Integer),
        PropertySpec::new("defer_destroy", Decoder::String),
        PropertySpec::new("keychangedate", Decoder::String),
        PropertySpec::new("keystatus", Decoder::String),
        PropertySpec::new("mounted", Decoder::String),
        PropertySpec::new("origin", Decoder::String),
        PropertySpec::new("referenced", Decoder::Bytes),
        PropertySpec::new("rekeydate", Decoder::String),
        PropertySpec::new("type", Decoder::String),
        PropertySpec::new("used", Decoder::Bytes),
        PropertySpec::new("usedbydata", Decoder::Bytes),
        PropertySpec::new("usedbychildren", Decoder::Bytes),
        PropertySpec::new("usedbydataset", Decoder::Bytes),
        PropertySpec::new("usedbyrefreservation", Decoder::Bytes),
        PropertySpec::new("usedbysnapshots", Decoder::Bytes),
        PropertySpec::new("userrefs", Decoder::Integer),
        PropertySpec::new("volblocksize", Decoder::String),
        PropertySpec::new("aclmode", Decoder::String),
        PropertySpec::new("aclinherit", Decoder::String),
        PropertySpec::new("atime", Decoder::String),
        PropertySpec::new("canmount", Decoder::String),
        PropertySpec::new("checksum", Decoder::String),
        PropertySpec::new("compression", Decoder::String),
        PropertySpec::new("copies", Decoder::String),
        PropertySpec::new("dedup", Decoder::String),
        PropertySpec::new("devices", Decoder::String),
        PropertySpec::new("exec", Decoder::String),
        PropertySpec::new("logbias", Decoder::String),
        PropertySpec::new("mlslabel", Decoder::String),
        PropertySpec::new("mountpoint", Decoder::Path),
        PropertySpec::new("nbmand", Decoder::String),
        PropertySpec::new("primarycache", Decoder::String),
        PropertySpec::new("quota", Decoder::Bytes),
        PropertySpec::new("sync", Decoder::String),
        PropertySpec::new("defaultuserquota", Decoder::Bytes),
        PropertySpec::new("defaultgroupquota", Decoder::Bytes),
        PropertySpec::new("readonly", Decoder::String),
        PropertySpec::new("recordsize", Decoder::String),
        PropertySpec::new("refquota", Decoder::Bytes),
        PropertySpec::new("refreservation", Decoder::Bytes),
        PropertySpec::new("reservation", Decoder::Bytes),
        PropertySpec::new("rstchown", Decoder::String),
        PropertySpec::new("secondarycache", Decoder::String),
        PropertySpec::new("setuid", Decoder::String),
        PropertySpec::new("shadow", Decoder::String),
        PropertySpec::new("sharenfs", Decoder::String),
        PropertySpec::new("sharesmb", Decoder::String),
        PropertySpec::new("snapdir", Decoder::String),
        PropertySpec::new("version", Decoder::String),
        PropertySpec::new("volsize", Decoder::Bytes),
        PropertySpec::new("vscan", Decoder::String),
        PropertySpec::new("xattr", Decoder::String),
        PropertySpec::new("zoned", Decoder::String),
        PropertySpec::new("casesensitivity", Decoder::String),
        PropertySpec::new("normalization", Decoder::String),
        PropertySpec::new("utf8only", Decoder::String),
        PropertySpec::new("encryption", Decoder::String),
        PropertySpec::new("multilevel", Decoder::String),
        PropertySpec::new("keysource", Decoder::String),
    ],
);

pub static ZPOOL: Schema = Schema::new(
    "zpool",
    &[
        PropertySpec::new("name", Decoder::String),
        PropertySpec::new("allocated", Decoder::Bytes),
        PropertySpec::new("altroot", Decoder::Path),
        PropertySpec::new("autoexpand", ON_OFF),
        PropertySpec::new("autoreplace", ON_OFF),
        PropertySpec::new("bootfs", Decoder::Path),
        PropertySpec::new("cachefile", Decoder::Path),
        PropertySpec::new("capacity", Decoder::Integer),
        PropertySpec::new("clustered", ON_OFF),
        PropertySpec::new("dedupditto", Decoder::String),
        PropertySpec::new("dedupratio", Decoder::String),
        PropertySpec::new("delegation", ON_OFF),
        PropertySpec::new("failmode", Decoder::String),
        PropertySpec::new("free", Decoder::Bytes),
        PropertySpec::new("guid", Decoder::String),
        PropertySpec::new("health", Decoder::String),
        PropertySpec::new("lastscrub", Decoder::String),
        PropertySpec::new("listshares", ON_OFF),
        PropertySpec::new("listsnapshots", ON_OFF),
        PropertySpec::new("readonly", ON_OFF),
        PropertySpec::new("scrubinterval", Decoder::String),
        PropertySpec::new("size", Decoder::Bytes),
        PropertySpec::new("version", Decoder::String),
    ],
);
