//! Sync scheduler
//!
//! Runs a [`SyncJob`] once immediately and then on a fixed interval until
//! cancelled. At most one run is in flight: a run requested while another
//! is running is skipped, not queued. Shutdown cancels cooperatively and
//! waits a bounded time for the in-flight run.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::Result;

/// Grace period [`Scheduler::shutdown`] waits for an in-flight run.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// The work the scheduler drives. Implementations should check `cancel`
/// at safe points and return early once it fires.
#[async_trait]
pub trait SyncJob: Send + Sync {
    async fn run(&self, cancel: CancellationToken) -> Result<()>;
}

/// Counters exposed to health reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStats {
    pub started_at: DateTime<Utc>,
    pub last_run: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub run_count: u64,
    pub skipped_count: u64,
    pub running: bool,
}

/// What [`Scheduler::run_safely`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Failed(String),
    /// Another run was in flight.
    Skipped,
}

pub struct Scheduler {
    job: Arc<dyn SyncJob>,
    interval: Option<Duration>,
    shutdown_timeout: Duration,
    running: Mutex<bool>,
    stats: Mutex<SyncStats>,
    cancel: CancellationToken,
    busy: watch::Sender<bool>,
}

impl Scheduler {
    /// A zero interval means one-shot.
    pub fn new(job: Arc<dyn SyncJob>, interval: Option<Duration>) -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            job,
            interval: interval.filter(|d| !d.is_zero()),
            shutdown_timeout: SHUTDOWN_TIMEOUT,
            running: Mutex::new(false),
            stats: Mutex::new(SyncStats {
                started_at: Utc::now(),
                last_run: None,
                last_error: None,
                run_count: 0,
                skipped_count: 0,
                running: false,
            }),
            cancel: CancellationToken::new(),
            busy,
        }
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn stats(&self) -> SyncStats {
        lock(&self.stats).clone()
    }

    /// Run once, then on every interval tick until cancelled.
    ///
    /// Returns after the first run when no interval is configured.
    pub async fn start(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.run_safely().await;

        let Some(interval) = self.interval else {
            info!("one-shot run complete");
            return;
        };
        info!(interval_secs = interval.as_secs(), "scheduling periodic runs");

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("scheduler stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.run_safely().await;
                }
            }
        }
    }

    /// Run the job unless a run is already in flight.
    pub async fn run_safely(&self) -> RunOutcome {
        let Some(_guard) = self.try_begin() else {
            warn!("sync already running, skipping this run");
            lock(&self.stats).skipped_count += 1;
            return RunOutcome::Skipped;
        };

        let result = self.job.run(self.cancel.clone()).await;
        if let Err(e) = &result {
            error!(error = %e, "sync run failed");
        }

        let mut stats = lock(&self.stats);
        stats.last_run = Some(Utc::now());
        stats.run_count += 1;
        stats.last_error = result.as_ref().err().map(ToString::to_string);
        match &stats.last_error {
            None => RunOutcome::Succeeded,
            Some(message) => RunOutcome::Failed(message.clone()),
        }
    }

    /// Cancel and wait up to the shutdown timeout for the in-flight run.
    ///
    /// Returns false if the run was still going when the timeout expired.
    pub async fn shutdown(&self) -> bool {
        info!("shutting down scheduler");
        self.cancel.cancel();

        let mut busy = self.busy.subscribe();
        match tokio::time::timeout(self.shutdown_timeout, busy.wait_for(|running| !running)).await
        {
            Ok(_) => true,
            Err(_) => {
                warn!(
                    timeout_secs = self.shutdown_timeout.as_secs(),
                    "in-flight sync did not finish before shutdown timeout"
                );
                false
            }
        }
    }

    fn try_begin(&self) -> Option<RunGuard<'_>> {
        let mut running = lock(&self.running);
        if *running {
            return None;
        }
        *running = true;
        lock(&self.stats).running = true;
        self.busy.send_replace(true);
        Some(RunGuard { scheduler: self })
    }
}

/// Clears the running flag when a run ends, even if the job panics.
struct RunGuard<'a> {
    scheduler: &'a Scheduler,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *lock(&self.scheduler.running) = false;
        lock(&self.scheduler.stats).running = false;
        self.scheduler.busy.send_replace(false);
    }
}

// Counters stay usable after a job panic.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
