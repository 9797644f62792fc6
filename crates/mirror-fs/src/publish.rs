//! Three-slot atomic publish.
//!
//! A space named `N` under an output root owns three sibling directories:
//! `N` (published), `N_temp` (being built) and `N_old` (held during a swap).
//! The only operation that changes what `N` resolves to is a directory
//! rename, so readers see either the complete previous tree or the complete
//! new one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{Error, Result};

const TEMP_SUFFIX: &str = "_temp";
const OLD_SUFFIX: &str = "_old";

/// Directory operations used by the swap.
///
/// Tests substitute an implementation that fails on chosen renames.
pub trait DirOps {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove_all(&self, path: &Path) -> io::Result<()>;
    fn create_all(&self, path: &Path) -> io::Result<()>;
}

/// [`DirOps`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDirOps;

impl DirOps for StdDirOps {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn create_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

/// Observed state of a slot on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing exists.
    Absent,
    /// Only the published tree exists.
    FinalOnly,
    /// A temp tree exists (with or without a published tree).
    TempBuilding,
    /// The previous tree was moved aside and nothing is published.
    SwapPending,
    /// The new tree is published and the previous one still awaits removal.
    Swapped,
}

/// The three sibling paths of one space's published output.
#[derive(Debug, Clone)]
pub struct PublishSlot {
    final_path: PathBuf,
    temp_path: PathBuf,
    old_path: PathBuf,
}

impl PublishSlot {
    pub fn new(output_root: &Path, name: &str) -> Self {
        Self {
            final_path: output_root.join(name),
            temp_path: output_root.join(format!("{name}{TEMP_SUFFIX}")),
            old_path: output_root.join(format!("{name}{OLD_SUFFIX}")),
        }
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn old_path(&self) -> &Path {
        &self.old_path
    }

    pub fn state(&self) -> SlotState {
        let temp = self.temp_path.exists();
        let old = self.old_path.exists();
        let published = self.final_path.exists();
        match (temp, old, published) {
            (true, _, _) => SlotState::TempBuilding,
            (false, true, false) => SlotState::SwapPending,
            (false, true, true) => SlotState::Swapped,
            (false, false, true) => SlotState::FinalOnly,
            (false, false, false) => SlotState::Absent,
        }
    }

    /// Start a build: restore an interrupted swap, discard any stale temp
    /// tree and create an empty one. Returns the temp path.
    pub fn prepare(&self) -> Result<&Path> {
        self.prepare_with(&StdDirOps)
    }

    pub fn prepare_with(&self, ops: &impl DirOps) -> Result<&Path> {
        if self.old_path.exists() && !self.final_path.exists() {
            warn!(slot = %self.final_path.display(), "restoring tree left aside by an interrupted swap");
            ops.rename(&self.old_path, &self.final_path)
                .map_err(|e| Error::io(&self.old_path, e))?;
        }
        if self.temp_path.exists() {
            warn!(path = %self.temp_path.display(), "removing stale temp tree");
            ops.remove_all(&self.temp_path)
                .map_err(|e| Error::io(&self.temp_path, e))?;
        }
        ops.create_all(&self.temp_path)
            .map_err(|e| Error::io(&self.temp_path, e))?;
        Ok(&self.temp_path)
    }

    /// Swap the temp tree into place.
    pub fn publish(&self) -> Result<()> {
        self.publish_with(&StdDirOps)
    }

    pub fn publish_with(&self, ops: &impl DirOps) -> Result<()> {
        if self.old_path.exists() {
            ops.remove_all(&self.old_path).map_err(|source| Error::Publish {
                slot: self.final_path.clone(),
                source,
            })?;
        }

        let had_final = self.final_path.exists();
        if had_final {
            ops.rename(&self.final_path, &self.old_path)
                .map_err(|source| Error::Publish {
                    slot: self.final_path.clone(),
                    source,
                })?;
        }

        if let Err(source) = ops.rename(&self.temp_path, &self.final_path) {
            if !had_final {
                return Err(Error::Publish {
                    slot: self.final_path.clone(),
                    source,
                });
            }
            return match ops.rename(&self.old_path, &self.final_path) {
                Ok(()) => {
                    warn!(slot = %self.final_path.display(), "publish failed, previous tree restored");
                    Err(Error::Publish {
                        slot: self.final_path.clone(),
                        source,
                    })
                }
                Err(rollback) => Err(Error::PublishRollback {
                    slot: self.final_path.clone(),
                    source,
                    rollback,
                }),
            };
        }

        if self.old_path.exists() {
            if let Err(e) = ops.remove_all(&self.old_path) {
                warn!(path = %self.old_path.display(), error = %e, "failed to remove previous tree after publish");
            }
        }

        info!(slot = %self.final_path.display(), "published");
        Ok(())
    }

    /// Remove the temp tree after a failed or cancelled build.
    pub fn discard(&self) {
        if self.temp_path.exists() {
            if let Err(e) = fs::remove_dir_all(&self.temp_path) {
                warn!(path = %self.temp_path.display(), error = %e, "failed to discard temp tree");
            }
        }
    }
}
