//! Shared fixtures for the end-to-end tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use mirror_core::{Error, SnapshotSource, SyncEngine, SyncJob};
use mirror_meta::{Snapshot, SpaceRef};
use mirror_test_utils::{SnapshotBuilder, page};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

/// In-memory snapshot source whose spaces can be swapped or failed between
/// runs.
#[derive(Default)]
pub struct MemorySource {
    spaces: Mutex<Vec<SpaceRef>>,
    snapshots: Mutex<HashMap<String, Result<Snapshot, String>>>,
}

impl MemorySource {
    pub fn put(&self, builder: SnapshotBuilder) {
        let space = builder.space_ref();
        let mut spaces = self.spaces.lock().unwrap();
        if !spaces.contains(&space) {
            spaces.push(space.clone());
        }
        self.snapshots
            .lock()
            .unwrap()
            .insert(space.id, Ok(builder.build()));
    }

    pub fn fail(&self, id: &str, reason: &str) {
        self.snapshots
            .lock()
            .unwrap()
            .insert(id.to_string(), Err(reason.to_string()));
    }
}

#[async_trait]
impl SnapshotSource for MemorySource {
    async fn list_spaces(&self) -> mirror_core::Result<Vec<SpaceRef>> {
        Ok(self.spaces.lock().unwrap().clone())
    }

    async fn fetch_snapshot(&self, space: &SpaceRef) -> mirror_core::Result<Snapshot> {
        match self.snapshots.lock().unwrap().get(&space.id) {
            Some(Ok(snapshot)) => Ok(snapshot.clone()),
            Some(Err(reason)) => Err(Error::retrieval(reason)),
            None => Err(Error::retrieval("unknown space")),
        }
    }
}

/// Scheduler job that fails the run when any space failed.
pub struct EngineRun(pub SyncEngine);

#[async_trait]
impl SyncJob for EngineRun {
    async fn run(&self, cancel: CancellationToken) -> mirror_core::Result<()> {
        self.0.run(&cancel).await?.into_result().map(|_| ())
    }
}

/// A space exercising every reconciliation pass.
pub fn team_docs() -> SnapshotBuilder {
    SnapshotBuilder::new("s1", "Team Docs")
        .page(
            page("p1", "가이드", 0).with_children(vec![
                page("p2", "설치", 0),
                page("p3", "Q&A", 1),
            ]),
        )
        .page(page("p4", "Setup/Install", 1))
        .page(page("p5", "untitled", 2))
        .page(page("p6", "OIDC ", 3))
        .blob("가이드.md", "# Guide\n\nUse {name} here\n")
        .blob("가이드/설치.md", "Install ![img](files/a.png)\n")
        .blob("가이드/files/a.png", vec![137u8, 80, 78, 71])
        .blob("가이드/Q&A.md", "<table>\n<tr><td>x</td></tr>\n</table>\n")
        .blob("Setup/Install.md", "steps\n")
        .blob("untitled.md", "# untitled")
        .blob("OIDC .md", "oidc\n")
        .blob("사진/x.png", "photo")
}

pub fn handbook() -> SnapshotBuilder {
    SnapshotBuilder::new("s2", "Hand/book")
        .page(page("h1", "Intro", 0))
        .blob("Intro.md", "hello\n")
}

/// Sorted relative listing of a tree; directories end in `/`.
pub fn listing(root: &Path) -> Vec<String> {
    let mut out: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| {
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            if entry.file_type().is_dir() {
                format!("{rel}/")
            } else {
                rel
            }
        })
        .collect();
    out.sort();
    out
}
