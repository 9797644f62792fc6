//! Cross-process singleton lock
//!
//! An advisory `fs2` lock on a well-known file. The file holds the owning
//! process id for operators; the lock itself is what excludes other
//! instances, and the OS releases it if the process dies.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Held for the lifetime of the process; released and removed on drop.
#[derive(Debug)]
pub struct ProcessLock {
    path: PathBuf,
    file: File,
}

impl ProcessLock {
    /// Acquire the lock at `path` without blocking.
    ///
    /// Returns [`Error::LockHeld`] if another process holds it and
    /// [`Error::LockFailed`] if locking fails for any other reason.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;

        if let Err(e) = file.try_lock_exclusive() {
            return Err(lock_error(path, e));
        }

        file.set_len(0).map_err(|e| Error::io(&path, e))?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| Error::io(&path, e))?;
        write!(file, "{}", std::process::id()).map_err(|e| Error::io(&path, e))?;
        file.sync_all().map_err(|e| Error::io(&path, e))?;

        debug!(path = %path.display(), pid = std::process::id(), "acquired process lock");
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the process id recorded in a lock file, if any.
    pub fn holder(path: &Path) -> Option<u32> {
        let mut content = String::new();
        File::open(path).ok()?.read_to_string(&mut content).ok()?;
        content.trim().parse().ok()
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove lock file");
        }
        let _ = FileExt::unlock(&self.file);
    }
}

// Contention is reported as `LockHeld`; anything else is a real failure.
fn lock_error(path: PathBuf, source: io::Error) -> Error {
    if source.kind() == fs2::lock_contended_error().kind() {
        Error::LockHeld { path }
    } else {
        Error::LockFailed { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contention_maps_to_held() {
        let err = lock_error(PathBuf::from("a.lock"), fs2::lock_contended_error());
        assert!(matches!(err, Error::LockHeld { .. }), "got {err:?}");
    }

    #[test]
    fn other_errors_map_to_failed() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = lock_error(PathBuf::from("a.lock"), source);
        assert!(matches!(err, Error::LockFailed { .. }), "got {err:?}");
        assert!(err.to_string().contains("denied"));
    }
}
