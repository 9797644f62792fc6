//! Scheduler behavior: one-shot, periodic, skip-if-busy and shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mirror_core::{Error, RunOutcome, Scheduler, SyncJob};
use pretty_assertions::assert_eq;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct CountingJob {
    runs: AtomicU64,
    fail: AtomicBool,
}

#[async_trait]
impl SyncJob for CountingJob {
    async fn run(&self, _cancel: CancellationToken) -> mirror_core::Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::retrieval("remote unavailable"));
        }
        Ok(())
    }
}

/// Signals `started`, then waits for `release` or, when cooperative, for
/// cancellation.
#[derive(Default)]
struct GatedJob {
    started: Notify,
    release: Notify,
    cooperative: bool,
}

#[async_trait]
impl SyncJob for GatedJob {
    async fn run(&self, cancel: CancellationToken) -> mirror_core::Result<()> {
        self.started.notify_one();
        if self.cooperative {
            cancel.cancelled().await;
        } else {
            self.release.notified().await;
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_one_shot_runs_once() {
    let job = Arc::new(CountingJob::default());
    let scheduler = Scheduler::new(job.clone(), None);

    scheduler.start().await;

    assert_eq!(job.runs.load(Ordering::SeqCst), 1);
    let stats = scheduler.stats();
    assert_eq!(stats.run_count, 1);
    assert!(stats.last_run.is_some());
    assert!(!stats.running);
}

#[test]
fn test_zero_interval_means_one_shot() {
    let job = Arc::new(CountingJob::default());
    assert_eq!(Scheduler::new(job.clone(), Some(Duration::ZERO)).interval(), None);
    assert_eq!(
        Scheduler::new(job, Some(Duration::from_secs(60))).interval(),
        Some(Duration::from_secs(60))
    );
}

#[tokio::test]
async fn test_records_and_clears_last_error() {
    let job = Arc::new(CountingJob::default());
    job.fail.store(true, Ordering::SeqCst);
    let scheduler = Scheduler::new(job.clone(), None);

    let outcome = scheduler.run_safely().await;
    assert_eq!(
        outcome,
        RunOutcome::Failed("Retrieval failed: remote unavailable".into())
    );
    assert!(scheduler.stats().last_error.is_some());

    job.fail.store(false, Ordering::SeqCst);
    assert_eq!(scheduler.run_safely().await, RunOutcome::Succeeded);
    let stats = scheduler.stats();
    assert_eq!(stats.last_error, None);
    assert_eq!(stats.run_count, 2);
}

#[tokio::test]
async fn test_skips_run_while_busy() {
    let job = Arc::new(GatedJob::default());
    let scheduler = Arc::new(Scheduler::new(job.clone(), None));

    let first = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.run_safely().await }
    });
    job.started.notified().await;
    assert!(scheduler.stats().running);

    assert_eq!(scheduler.run_safely().await, RunOutcome::Skipped);
    assert_eq!(scheduler.stats().skipped_count, 1);

    job.release.notify_one();
    assert_eq!(first.await.unwrap(), RunOutcome::Succeeded);
    let stats = scheduler.stats();
    assert_eq!(stats.run_count, 1);
    assert!(!stats.running);
}

#[tokio::test(start_paused = true)]
async fn test_periodic_runs_on_interval() {
    let job = Arc::new(CountingJob::default());
    let scheduler = Arc::new(Scheduler::new(job.clone(), Some(Duration::from_secs(10))));

    let handle = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.start().await }
    });
    tokio::time::sleep(Duration::from_secs(35)).await;

    assert!(job.runs.load(Ordering::SeqCst) >= 3);
    assert!(scheduler.shutdown().await);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_start_after_cancel_does_nothing() {
    let job = Arc::new(CountingJob::default());
    let scheduler = Scheduler::new(job.clone(), Some(Duration::from_secs(1)));
    scheduler.cancel_token().cancel();

    scheduler.start().await;

    assert_eq!(job.runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_shutdown_waits_for_cooperative_run() {
    let job = Arc::new(GatedJob {
        cooperative: true,
        ..GatedJob::default()
    });
    let scheduler = Arc::new(Scheduler::new(job.clone(), None));

    let run = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.run_safely().await }
    });
    job.started.notified().await;

    assert!(scheduler.shutdown().await);
    assert_eq!(run.await.unwrap(), RunOutcome::Succeeded);
    assert!(!scheduler.stats().running);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_gives_up_after_timeout() {
    let job = Arc::new(GatedJob::default());
    let scheduler = Arc::new(
        Scheduler::new(job.clone(), None).with_shutdown_timeout(Duration::from_secs(1)),
    );

    let run = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.run_safely().await }
    });
    job.started.notified().await;

    assert!(!scheduler.shutdown().await);

    job.release.notify_one();
    assert_eq!(run.await.unwrap(), RunOutcome::Succeeded);
}

#[tokio::test]
async fn test_shutdown_when_idle_returns_immediately() {
    let scheduler = Scheduler::new(Arc::new(CountingJob::default()), None);
    assert!(scheduler.shutdown().await);
    assert!(scheduler.cancel_token().is_cancelled());
}
