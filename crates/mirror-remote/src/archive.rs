//! Extraction of the zipped markdown export.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use tracing::warn;
use zip::ZipArchive;

use crate::{Error, Result};

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 1 << 20;

/// Read every file entry of `bytes` into a map keyed by its archive path
/// (always `/`-separated).
///
/// Directory entries are skipped. Entries whose name would escape the
/// archive root are dropped with a warning.
pub fn extract(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut blobs = BTreeMap::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let Some(path) = entry.enclosed_name() else {
            warn!(name = entry.name(), "dropping archive entry outside the root");
            continue;
        };
        let key = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let mut content = Vec::with_capacity(initial_capacity(entry.size()));
        entry.read_to_end(&mut content).map_err(|source| Error::Entry {
            name: key.clone(),
            source,
        })?;
        blobs.insert(key, content);
    }
    Ok(blobs)
}

// The declared size comes from the archive header and is not trusted.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOC)).unwrap_or(0)
}
