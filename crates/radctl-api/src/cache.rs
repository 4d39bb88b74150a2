// On-disk session cache.
//
// One JSON file per endpoint holding a format-version tag, the transport
// state and the login reference id. Anything unexpected on read (missing
// file, stale mtime, bad version, unparseable content) is a cache miss.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::transport::TransportState;

/// Format tag written at the head of every cache file.
pub const CACHE_FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CacheFile {
    pub version: String,
    pub transport: TransportState,
    pub reference_id: Option<u64>,
}

impl CacheFile {
    pub fn new(transport: TransportState, reference_id: Option<u64>) -> Self {
        Self {
            version: CACHE_FORMAT_VERSION.to_owned(),
            transport,
            reference_id,
        }
    }
}

/// Read the cache at `path` if it is younger than `max_age`
/// (zero = never expires) and carries the current format version.
pub(crate) fn read(path: &Path, max_age: Duration) -> Option<CacheFile> {
    let meta = fs::metadata(path).ok().filter(fs::Metadata::is_file)?;

    let age = meta
        .modified()
        .ok()
        .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
        .unwrap_or_default();
    if !max_age.is_zero() && age >= max_age {
        debug!(path = %path.display(), age_secs = age.as_secs(), "session cache expired");
        return None;
    }

    let raw = fs::read(path).ok()?;
    let cache: CacheFile = match serde_json::from_slice(&raw) {
        Ok(cache) => cache,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "session cache unreadable");
            return None;
        }
    };
    if cache.version != CACHE_FORMAT_VERSION {
        debug!(
            found = %cache.version,
            expected = CACHE_FORMAT_VERSION,
            "session cache version mismatch"
        );
        return None;
    }

    debug!(path = %path.display(), age_secs = age.as_secs(), "loaded session cache");
    Some(cache)
}

/// Write the cache, creating its directory owner-only (0700) and the file 0600.
pub(crate) fn write(path: &Path, cache: &CacheFile) -> Result<(), Error> {
    let wrap = |source: io::Error| Error::Cache {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
        restrict(parent, 0o700).map_err(wrap)?;
    }

    let body = serde_json::to_vec_pretty(cache).map_err(|e| wrap(io::Error::other(e)))?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(wrap)?;
    file.write_all(&body).map_err(wrap)?;
    restrict(path, 0o600).map_err(wrap)?;

    debug!(path = %path.display(), "saved session cache");
    Ok(())
}

/// Remove the cache file. A missing file is not an error.
pub(crate) fn remove(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Cache {
            path: path.display().to_string(),
            source,
        }),
    }
}

#[cfg(unix)]
fn restrict(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn restrict(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
