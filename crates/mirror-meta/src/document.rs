//! The `_metadata.json` document written at the root of every space tree.

use std::path::Path;

use mirror_fs::io;

use crate::{Error, Result, SpaceMeta};

/// File name of the metadata document inside a space tree.
pub const METADATA_FILE: &str = "_metadata.json";

/// Read the metadata document from the root of a space tree.
pub fn load_metadata(root: &Path) -> Result<SpaceMeta> {
    let path = root.join(METADATA_FILE);
    if !path.is_file() {
        return Err(Error::NotFound { path });
    }
    let text = io::read_text(&path)?;
    serde_json::from_str(&text).map_err(|source| Error::Invalid { path, source })
}

/// Atomically write the metadata document to the root of a space tree.
pub fn save_metadata(root: &Path, meta: &SpaceMeta) -> Result<()> {
    let json = serde_json::to_vec_pretty(meta).map_err(Error::Serialize)?;
    io::write_atomic(&root.join(METADATA_FILE), &json)?;
    Ok(())
}
