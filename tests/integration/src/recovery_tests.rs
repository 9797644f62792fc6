//! Recovery from interrupted publishes, process exclusion and shutdown.

mod support;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use mirror_core::{Scheduler, SyncEngine};
use mirror_fs::{Error as FsError, ProcessLock, PublishSlot, SlotState};
use pretty_assertions::assert_eq;
use support::{EngineRun, MemorySource, listing, team_docs};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn engine_for(out: &TempDir) -> SyncEngine {
    let source = Arc::new(MemorySource::default());
    source.put(team_docs());
    SyncEngine::new(out.path(), source)
}

fn write_tree(root: &std::path::Path, file: &str, content: &str) {
    fs::create_dir_all(root).unwrap();
    fs::write(root.join(file), content).unwrap();
}

fn leftovers(out: &TempDir) -> Vec<String> {
    listing(out.path())
        .into_iter()
        .filter(|p| {
            p.split('/')
                .next()
                .is_some_and(|top| top.ends_with("_temp") || top.ends_with("_old"))
        })
        .collect()
}

#[tokio::test]
async fn test_run_recovers_from_interrupted_swap() {
    let out = TempDir::new().unwrap();
    let slot = PublishSlot::new(out.path(), "Team Docs");
    write_tree(slot.old_path(), "previous.md", "old\n");
    write_tree(slot.temp_path(), "half-built.md", "partial\n");
    assert_eq!(slot.state(), SlotState::TempBuilding);

    let report = engine_for(&out).run(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.published(), 1);
    assert_eq!(slot.state(), SlotState::FinalOnly);
    assert!(slot.final_path().join("gaideu/gaideu.md").is_file());
    assert!(!slot.final_path().join("previous.md").exists());
    assert!(!slot.final_path().join("half-built.md").exists());
    assert_eq!(leftovers(&out), Vec::<String>::new());
}

#[tokio::test]
async fn test_run_clears_tree_left_after_completed_swap() {
    let out = TempDir::new().unwrap();
    let slot = PublishSlot::new(out.path(), "Team Docs");
    write_tree(slot.final_path(), "current.md", "current\n");
    write_tree(slot.old_path(), "previous.md", "old\n");
    assert_eq!(slot.state(), SlotState::Swapped);

    engine_for(&out).run(&CancellationToken::new()).await.unwrap();

    assert_eq!(slot.state(), SlotState::FinalOnly);
    assert!(!slot.final_path().join("current.md").exists());
    assert!(slot.final_path().join("Setup-Install.md").is_file());
}

#[tokio::test]
async fn test_unrelated_directories_survive_runs() {
    let out = TempDir::new().unwrap();
    write_tree(&out.path().join("Notes"), "keep.md", "mine\n");

    engine_for(&out).run(&CancellationToken::new()).await.unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("Notes/keep.md")).unwrap(),
        "mine\n"
    );
}

#[test]
fn test_second_process_lock_is_refused() {
    let out = TempDir::new().unwrap();
    let path = out.path().join("docmirror.lock");

    let held = ProcessLock::acquire(&path).unwrap();
    assert_eq!(ProcessLock::holder(&path), Some(std::process::id()));

    let second = ProcessLock::acquire(&path);
    assert!(matches!(second, Err(FsError::LockHeld { .. })));

    drop(held);
    assert!(!path.exists());
    let again = ProcessLock::acquire(&path).unwrap();
    assert_eq!(again.path(), path.as_path());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_after_periodic_run_leaves_published_tree() {
    let out = TempDir::new().unwrap();
    let scheduler = Arc::new(Scheduler::new(
        Arc::new(EngineRun(engine_for(&out))),
        Some(Duration::from_secs(3600)),
    ));

    let handle = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.start().await }
    });
    tokio::time::timeout(Duration::from_secs(30), async {
        while scheduler.stats().run_count == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("first run did not finish");

    assert!(scheduler.shutdown().await);
    handle.await.unwrap();

    let stats = scheduler.stats();
    assert_eq!(stats.run_count, 1);
    assert_eq!(stats.last_error, None);
    assert!(out.path().join("Team Docs/gaideu/seolchi.md").is_file());
    assert_eq!(leftovers(&out), Vec::<String>::new());
}
