//! Health endpoint
//!
//! `GET /health`, `/healthz` and `/ready` report the outcome of the last
//! sync run as JSON. The state is fed by the sync job before and after each
//! run.

use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub sync_count: u64,
    pub is_running: bool,
    pub uptime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_sync: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_interval: Option<String>,
}

#[derive(Debug, Default)]
struct Runs {
    last_sync: Option<DateTime<Utc>>,
    last_error: Option<String>,
    sync_count: u64,
    running: bool,
}

#[derive(Debug)]
pub struct HealthState {
    started_at: DateTime<Utc>,
    interval: Option<Duration>,
    runs: RwLock<Runs>,
}

impl HealthState {
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            started_at: Utc::now(),
            interval: interval.filter(|d| !d.is_zero()),
            runs: RwLock::new(Runs::default()),
        }
    }

    /// A run is starting.
    pub fn begin(&self) {
        self.write().running = true;
    }

    /// A run ended, with its error if it failed.
    pub fn finish(&self, error: Option<String>) {
        self.finish_at(Utc::now(), error);
    }

    fn finish_at(&self, now: DateTime<Utc>, error: Option<String>) {
        let mut runs = self.write();
        runs.running = false;
        runs.last_sync = Some(now);
        runs.last_error = error;
        runs.sync_count += 1;
    }

    pub fn report(&self) -> HealthReport {
        self.report_at(Utc::now())
    }

    pub fn report_at(&self, now: DateTime<Utc>) -> HealthReport {
        let runs = self.runs.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let since = |t: DateTime<Utc>| (now - t).to_std().unwrap_or_default();

        let mut status = if runs.last_error.is_some() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
        let mut next_sync = None;
        if let (Some(last), Some(interval)) = (runs.last_sync, self.interval) {
            let elapsed = since(last);
            if elapsed > interval * 2 {
                status = HealthStatus::Unhealthy;
            }
            if elapsed < interval {
                next_sync = Some(format_duration(interval - elapsed));
            }
        }

        HealthReport {
            status,
            last_sync: runs.last_sync,
            last_error: runs.last_error.clone(),
            sync_count: runs.sync_count,
            is_running: runs.running,
            uptime: format_duration(since(self.started_at)),
            next_sync,
            sync_interval: self.interval.map(format_duration),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Runs> {
        self.runs.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `1h2m3s` style, whole seconds, zero components omitted.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    let mut out = String::new();
    if h > 0 {
        out.push_str(&format!("{h}h"));
    }
    if m > 0 {
        out.push_str(&format!("{m}m"));
    }
    if s > 0 || out.is_empty() {
        out.push_str(&format!("{s}s"));
    }
    out
}

pub fn router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(health))
        .with_state(state)
}

async fn health(State(state): State<Arc<HealthState>>) -> (StatusCode, Json<HealthReport>) {
    let report = state.report();
    let code = match report.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (code, Json(report))
}

/// Serve the health routes on `addr` until `shutdown` fires.
pub async fn serve(
    addr: SocketAddr,
    state: Arc<HealthState>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "health endpoint listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
