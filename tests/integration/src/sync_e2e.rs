//! End-to-end sync runs: scheduler, engine, reconciliation and publish
//! against an in-memory source.

mod support;

use std::fs;
use std::sync::Arc;

use mirror_core::{RunOutcome, Scheduler, SyncEngine};
use mirror_meta::load_metadata;
use mirror_test_utils::tree_checksum;
use pretty_assertions::assert_eq;
use support::{EngineRun, MemorySource, handbook, listing, team_docs};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn setup() -> (TempDir, Arc<MemorySource>, SyncEngine) {
    let out = TempDir::new().unwrap();
    let source = Arc::new(MemorySource::default());
    source.put(team_docs());
    source.put(handbook());
    let engine = SyncEngine::new(out.path(), source.clone());
    (out, source, engine)
}

fn expected_team_docs() -> Vec<&'static str> {
    vec![
        "OIDC.md",
        "Setup-Install.md",
        "_metadata.json",
        "gaideu/",
        "gaideu/Q-and-A.md",
        "gaideu/files/",
        "gaideu/files/a.png",
        "gaideu/gaideu.md",
        "gaideu/seolchi.md",
        "sajin/",
        "sajin/x.png",
    ]
}

#[tokio::test]
async fn test_one_shot_sync_publishes_normalized_spaces() {
    let (out, _source, engine) = setup();
    let scheduler = Scheduler::new(Arc::new(EngineRun(engine)), None);

    scheduler.start().await;

    let stats = scheduler.stats();
    assert_eq!(stats.run_count, 1);
    assert_eq!(stats.last_error, None);

    let mut expected: Vec<String> = ["Hand-book/", "Hand-book/Intro.md", "Hand-book/_metadata.json", "Team Docs/"]
        .iter()
        .map(|p| p.to_string())
        .collect();
    expected.extend(expected_team_docs().iter().map(|p| format!("Team Docs/{p}")));
    assert_eq!(listing(out.path()), expected);

    let docs = out.path().join("Team Docs");
    let guide = fs::read_to_string(docs.join("gaideu/gaideu.md")).unwrap();
    assert!(guide.contains("sidebar_position: 1\n"), "{guide}");
    assert!(guide.ends_with("# Guide\n\nUse `{name}` here\n"), "{guide}");

    let seolchi = fs::read_to_string(docs.join("gaideu/seolchi.md")).unwrap();
    assert!(seolchi.ends_with("Install ![img](files/a.png)\n"));
    assert_eq!(fs::read(docs.join("gaideu/files/a.png")).unwrap(), vec![137u8, 80, 78, 71]);

    let oidc = fs::read_to_string(docs.join("OIDC.md")).unwrap();
    assert!(oidc.contains("sidebar_position: 4\n"), "{oidc}");

    let meta = load_metadata(&docs).unwrap();
    assert_eq!(meta.total_pages, 6);
    assert_eq!(meta.name, "Team Docs");
}

#[tokio::test]
async fn test_repeated_runs_publish_identical_trees() {
    let (out, _source, engine) = setup();
    let cancel = CancellationToken::new();

    let first = engine.run(&cancel).await.unwrap();
    let after_first = tree_checksum(out.path());
    let second = engine.run(&cancel).await.unwrap();

    assert_eq!(first.published(), 2);
    assert_eq!(second.published(), 2);
    assert_eq!(tree_checksum(out.path()), after_first);
    assert_eq!(listing(&out.path().join("Team Docs")), expected_team_docs());
}

#[tokio::test]
async fn test_published_tree_reconciles_to_itself() {
    let (out, _source, engine) = setup();
    engine.run(&CancellationToken::new()).await.unwrap();
    let docs = out.path().join("Team Docs");
    let before = tree_checksum(&docs);

    let report = mirror_core::reconcile(&docs);

    assert_eq!(report.action_count(), 0);
    assert_eq!(tree_checksum(&docs), before);
}

#[tokio::test]
async fn test_failed_space_degrades_run_and_keeps_last_tree() {
    let (out, source, engine) = setup();
    let scheduler = Scheduler::new(Arc::new(EngineRun(engine)), None);
    assert_eq!(scheduler.run_safely().await, RunOutcome::Succeeded);
    let before = tree_checksum(&out.path().join("Team Docs"));

    source.fail("s1", "export timed out");
    let outcome = scheduler.run_safely().await;

    match outcome {
        RunOutcome::Failed(message) => {
            assert!(message.contains("1 of 2 spaces failed"), "{message}");
            assert!(message.contains("Team Docs"), "{message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(tree_checksum(&out.path().join("Team Docs")), before);
    assert!(out.path().join("Hand-book/Intro.md").is_file());

    source.put(team_docs());
    assert_eq!(scheduler.run_safely().await, RunOutcome::Succeeded);
    assert_eq!(scheduler.stats().last_error, None);
}

#[tokio::test]
async fn test_changed_export_replaces_space_wholesale() {
    let (out, source, engine) = setup();
    engine.run(&CancellationToken::new()).await.unwrap();

    source.put(
        mirror_test_utils::SnapshotBuilder::new("s1", "Team Docs")
            .page(mirror_test_utils::page("n1", "News", 0))
            .blob("News.md", "fresh\n"),
    );
    engine.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(
        listing(&out.path().join("Team Docs")),
        vec!["News.md", "_metadata.json"]
    );
}
