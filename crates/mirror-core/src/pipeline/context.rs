//! Shared bookkeeping for passes: every mutation goes through here so it is
//! logged and recorded, and every failure becomes a warning.

use std::fs;
use std::path::{Path, PathBuf};

use mirror_fs::tree;
use mirror_meta::{SpaceMeta, load_metadata};
use tracing::{debug, warn};

use super::{NormalizationAction, Pass, PassReport};

pub(crate) struct PassContext<'a> {
    pub root: &'a Path,
    pub report: PassReport,
}

impl<'a> PassContext<'a> {
    pub fn new(root: &'a Path, step: usize, pass: Pass) -> Self {
        Self {
            root,
            report: PassReport::new(step, pass),
        }
    }

    pub fn rel(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.root).unwrap_or(path).to_path_buf()
    }

    pub fn warn(&mut self, message: String) {
        warn!(pass = self.report.pass.name(), "{message}");
        self.report.warnings.push(message);
    }

    pub fn record(&mut self, action: NormalizationAction) {
        debug!(pass = self.report.pass.name(), "{action}");
        self.report.actions.push(action);
    }

    /// Walk results, or a warning and nothing.
    pub fn listing(&mut self, walk: mirror_fs::Result<Vec<PathBuf>>) -> Vec<PathBuf> {
        walk.unwrap_or_else(|e| {
            self.warn(format!("failed to walk tree: {e}"));
            Vec::new()
        })
    }

    pub fn metadata(&mut self) -> Option<SpaceMeta> {
        match load_metadata(self.root) {
            Ok(meta) => Some(meta),
            Err(e) => {
                self.warn(format!("skipping, metadata unavailable: {e}"));
                None
            }
        }
    }

    pub fn read_text(&mut self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                self.warn(format!("cannot read {}: {e}", self.rel(path).display()));
                None
            }
        }
    }

    pub fn rename(&mut self, from: &Path, to: &Path) -> bool {
        self.relocate(from, to, false)
    }

    pub fn move_into(&mut self, from: &Path, to: &Path) -> bool {
        self.relocate(from, to, true)
    }

    fn relocate(&mut self, from: &Path, to: &Path, moved: bool) -> bool {
        if let Some(parent) = to.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            self.warn(format!("cannot create {}: {e}", self.rel(parent).display()));
            return false;
        }
        match fs::rename(from, to) {
            Ok(()) => {
                let (from, to) = (self.rel(from), self.rel(to));
                self.record(if moved {
                    NormalizationAction::Moved { from, to }
                } else {
                    NormalizationAction::Renamed { from, to }
                });
                true
            }
            Err(e) => {
                self.warn(format!(
                    "cannot rename {} -> {}: {e}",
                    self.rel(from).display(),
                    self.rel(to).display()
                ));
                false
            }
        }
    }

    /// Merge directory `from` into `into` with the destination-wins policy.
    pub fn merge(&mut self, from: &Path, into: &Path) -> bool {
        match tree::merge_dir(from, into) {
            Ok(summary) => {
                for err in &summary.errors {
                    self.warn(format!("merge of {} incomplete: {err}", self.rel(from).display()));
                }
                if !summary.discarded.is_empty() {
                    warn!(
                        source = %self.rel(from).display(),
                        count = summary.discarded.len(),
                        "destination wins, conflicting source entries discarded"
                    );
                }
                let discarded = summary.discarded.iter().map(|p| self.rel(p)).collect();
                self.record(NormalizationAction::Merged {
                    from: self.rel(from),
                    into: self.rel(into),
                    discarded,
                });
                summary.errors.is_empty()
            }
            Err(e) => {
                self.warn(format!("cannot merge {}: {e}", self.rel(from).display()));
                false
            }
        }
    }

    /// Copy a `files/` attachment directory without overwriting anything.
    pub fn copy_attachments(&mut self, from: &Path, to: &Path) {
        match tree::copy_missing(from, to) {
            Ok(copied) if !copied.is_empty() => {
                self.record(NormalizationAction::Copied {
                    from: self.rel(from),
                    to: self.rel(to),
                });
            }
            Ok(_) => {}
            Err(e) => self.warn(format!("cannot copy {}: {e}", self.rel(from).display())),
        }
    }

    pub fn remove_file(&mut self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => {
                self.record(NormalizationAction::Deleted {
                    path: self.rel(path),
                });
                true
            }
            Err(e) => {
                self.warn(format!("cannot delete {}: {e}", self.rel(path).display()));
                false
            }
        }
    }

    pub fn deleted(&mut self, path: &Path) {
        self.record(NormalizationAction::Deleted {
            path: self.rel(path),
        });
    }

    pub fn write(&mut self, path: &Path, content: &str) -> bool {
        match mirror_fs::io::write_file(path, content.as_bytes()) {
            Ok(()) => true,
            Err(e) => {
                self.warn(format!("cannot write {}: {e}", self.rel(path).display()));
                false
            }
        }
    }

    pub fn rewrite(&mut self, path: &Path, content: &str) -> bool {
        let ok = self.write(path, content);
        if ok {
            self.record(NormalizationAction::Rewritten {
                path: self.rel(path),
            });
        }
        ok
    }

    pub fn finish(self) -> PassReport {
        self.report
    }
}

/// File name of `path` as UTF-8, if it has one.
pub(crate) fn name_of(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
