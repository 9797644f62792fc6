//! SyncEngine: one run over every space of a snapshot source.
//!
//! Per space: fetch the snapshot, build the temp slot from its blobs and
//! metadata, reconcile it, then publish. Any failure discards the temp slot
//! and leaves the published tree untouched. Spaces are independent and
//! processed one after another; cancellation is checked between spaces and
//! once more before publishing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mirror_fs::{PublishSlot, io};
use mirror_meta::{Snapshot, SpaceRef, safe_blob_path, save_metadata};
use mirror_translit::space_dir_name;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::pipeline::Pipeline;
use crate::source::SnapshotSource;
use crate::{Error, Result};

/// How one space ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceOutcome {
    Published,
    Failed(String),
    Cancelled,
}

/// Result of processing one space.
#[derive(Debug, Clone)]
pub struct SpaceReport {
    pub space: String,
    pub slot: String,
    pub outcome: SpaceOutcome,
    pub pages: usize,
    pub files: usize,
    pub actions: usize,
}

impl SpaceReport {
    fn new(space: &SpaceRef, slot: String) -> Self {
        Self {
            space: space.name.clone(),
            slot,
            outcome: SpaceOutcome::Cancelled,
            pages: 0,
            files: 0,
            actions: 0,
        }
    }
}

/// Result of one run over all spaces.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub spaces: Vec<SpaceReport>,
    /// Set when cancellation stopped the run before every space was seen.
    pub cancelled: bool,
}

impl RunReport {
    pub fn published(&self) -> usize {
        self.count(|o| *o == SpaceOutcome::Published)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SpaceOutcome::Failed(_)))
    }

    pub fn total_pages(&self) -> usize {
        self.spaces.iter().map(|s| s.pages).sum()
    }

    pub fn total_files(&self) -> usize {
        self.spaces.iter().map(|s| s.files).sum()
    }

    fn count(&self, f: impl Fn(&SpaceOutcome) -> bool) -> usize {
        self.spaces.iter().filter(|s| f(&s.outcome)).count()
    }

    /// Turn failed spaces into an error so callers can record the run as
    /// degraded.
    pub fn into_result(self) -> Result<Self> {
        let failed: Vec<String> = self
            .spaces
            .iter()
            .filter_map(|s| match &s.outcome {
                SpaceOutcome::Failed(reason) => Some(format!("{}: {reason}", s.space)),
                _ => None,
            })
            .collect();
        if failed.is_empty() {
            return Ok(self);
        }
        Err(Error::SpacesFailed {
            failed: failed.len(),
            total: self.spaces.len(),
            summary: failed.join("; "),
        })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} spaces, {} published, {} failed, {} pages, {} files",
            self.spaces.len(),
            self.published(),
            self.failed(),
            self.total_pages(),
            self.total_files()
        )
    }
}

/// What the blocking build produced.
struct Built {
    files: usize,
    actions: usize,
}

/// Drives fetch, build, reconcile and publish for every space.
pub struct SyncEngine {
    output_root: PathBuf,
    source: Arc<dyn SnapshotSource>,
    pipeline: Pipeline,
}

impl SyncEngine {
    pub fn new(output_root: impl Into<PathBuf>, source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            output_root: output_root.into(),
            source,
            pipeline: Pipeline::fixed(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Process every space once.
    ///
    /// Fails only when the space list cannot be retrieved; per-space
    /// failures are reported in the returned [`RunReport`].
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunReport> {
        let spaces = self.source.list_spaces().await?;
        info!(count = spaces.len(), "starting sync run");

        let mut report = RunReport::default();
        for space in &spaces {
            if cancel.is_cancelled() {
                info!("run cancelled, remaining spaces skipped");
                report.cancelled = true;
                break;
            }
            report.spaces.push(self.sync_space(space, cancel).await);
        }

        info!(
            spaces = report.spaces.len(),
            published = report.published(),
            failed = report.failed(),
            pages = report.total_pages(),
            files = report.total_files(),
            "sync run finished"
        );
        Ok(report)
    }

    async fn sync_space(&self, space: &SpaceRef, cancel: &CancellationToken) -> SpaceReport {
        let slot_name = slot_name(space);
        let mut report = SpaceReport::new(space, slot_name.clone());

        let snapshot = match self.source.fetch_snapshot(space).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(space = %space.name, error = %e, "failed to retrieve space");
                report.outcome = SpaceOutcome::Failed(e.to_string());
                return report;
            }
        };
        report.pages = snapshot.total_pages();

        let slot = PublishSlot::new(&self.output_root, &slot_name);
        match self.build(slot.clone(), snapshot).await {
            Ok(built) => {
                report.files = built.files;
                report.actions = built.actions;
            }
            Err(e) => {
                error!(space = %space.name, error = %e, "failed to build space");
                slot.discard();
                report.outcome = SpaceOutcome::Failed(e.to_string());
                return report;
            }
        }

        if cancel.is_cancelled() {
            info!(space = %space.name, "cancelled before publish");
            slot.discard();
            report.outcome = SpaceOutcome::Cancelled;
            return report;
        }

        let publish_slot = slot.clone();
        let published = tokio::task::spawn_blocking(move || publish_slot.publish())
            .await
            .map_err(Error::from)
            .and_then(|r| r.map_err(Error::from));
        match published {
            Ok(()) => {
                info!(
                    space = %space.name,
                    path = %slot.final_path().display(),
                    pages = report.pages,
                    files = report.files,
                    "space published"
                );
                report.outcome = SpaceOutcome::Published;
            }
            Err(e) => {
                error!(space = %space.name, error = %e, "failed to publish space");
                slot.discard();
                report.outcome = SpaceOutcome::Failed(e.to_string());
            }
        }
        report
    }

    async fn build(&self, slot: PublishSlot, snapshot: Snapshot) -> Result<Built> {
        let pipeline = self.pipeline;
        tokio::task::spawn_blocking(move || build_tree(&slot, &snapshot, pipeline)).await?
    }
}

fn build_tree(slot: &PublishSlot, snapshot: &Snapshot, pipeline: Pipeline) -> Result<Built> {
    let temp = slot.prepare()?;
    let files = populate(temp, snapshot);
    save_metadata(temp, &snapshot.meta)?;
    let report = pipeline.run(temp);
    for warning in report.warnings() {
        debug!(space = snapshot.space_name(), "{warning}");
    }
    Ok(Built {
        files,
        actions: report.action_count(),
    })
}

/// Write every blob under `root`. Unsafe keys and failed writes are logged
/// and skipped. Returns the number of files written.
fn populate(root: &Path, snapshot: &Snapshot) -> usize {
    let mut written = 0;
    for (key, bytes) in &snapshot.blobs {
        let Some(rel) = safe_blob_path(key) else {
            warn!(key = %key, "rejecting archive entry outside the tree");
            continue;
        };
        match io::write_file(&root.join(rel), bytes) {
            Ok(()) => written += 1,
            Err(e) => warn!(key = %key, error = %e, "failed to write archive entry"),
        }
    }
    written
}

/// Slot directory name for a space; falls back to the id when the name
/// sanitizes to nothing.
pub fn slot_name(space: &SpaceRef) -> String {
    let name = space_dir_name(&space.name);
    if name.is_empty() {
        space_dir_name(&space.id)
    } else {
        name
    }
}
