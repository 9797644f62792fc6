//! The sync service: lock, remote source, scheduler, health endpoint and
//! signal handling.

use std::sync::Arc;

use async_trait::async_trait;
use mirror_core::pipeline::DEFAULT_MAX_ROUNDS;
use mirror_core::{Pipeline, RunReport, Scheduler, SyncEngine, SyncJob};
use mirror_fs::ProcessLock;
use mirror_remote::{RemoteClient, RemoteConfig, RemoteSource};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::ServiceArgs;
use crate::error::{CliError, Result};
use crate::health::{self, HealthState};

/// One scheduled run: the engine over every space, reported to health.
pub struct EngineJob {
    engine: SyncEngine,
    health: Arc<HealthState>,
}

impl EngineJob {
    pub fn new(engine: SyncEngine, health: Arc<HealthState>) -> Self {
        Self { engine, health }
    }
}

#[async_trait]
impl SyncJob for EngineJob {
    async fn run(&self, cancel: CancellationToken) -> mirror_core::Result<()> {
        self.health.begin();
        let result = self
            .engine
            .run(&cancel)
            .await
            .and_then(RunReport::into_result);
        if let Ok(report) = &result {
            info!(%report, "sync run succeeded");
        }
        self.health
            .finish(result.as_ref().err().map(ToString::to_string));
        result.map(|_| ())
    }
}

pub async fn run_service(args: &ServiceArgs) -> Result<()> {
    let lock_path = args.lock_path();
    let _lock = ProcessLock::acquire(&lock_path).map_err(|e| match e {
        mirror_fs::Error::LockHeld { path } => CliError::user(match ProcessLock::holder(&path) {
            Some(pid) => format!("another docmirror (pid {pid}) holds {}", path.display()),
            None => format!("another docmirror holds {}", path.display()),
        }),
        other => other.into(),
    })?;

    let (Some(email), Some(password)) = (args.email.as_deref(), args.password.as_deref()) else {
        return Err(CliError::user(
            "credentials are required: set --email/DOCMIRROR_EMAIL and --password/DOCMIRROR_PASSWORD",
        ));
    };
    std::fs::create_dir_all(&args.output)?;

    let client = RemoteClient::new(RemoteConfig::new(&args.base_url, email, password))?;
    let pipeline = if args.converge {
        Pipeline::converge(DEFAULT_MAX_ROUNDS)
    } else {
        Pipeline::fixed()
    };
    let engine = SyncEngine::new(&args.output, Arc::new(RemoteSource::new(client)))
        .with_pipeline(pipeline);

    let interval = args.effective_interval();
    let health = Arc::new(HealthState::new(interval));
    let scheduler = Arc::new(Scheduler::new(
        Arc::new(EngineJob::new(engine, health.clone())),
        interval,
    ));

    info!(
        base_url = %args.base_url,
        output = %args.output.display(),
        interval = ?interval,
        "starting docmirror"
    );

    let server = interval.map(|_| {
        let addr = args.http_addr;
        let shutdown = scheduler.cancel_token();
        tokio::spawn(async move {
            if let Err(e) = health::serve(addr, health, shutdown).await {
                error!(addr = %addr, error = %e, "health endpoint failed");
            }
        })
    });

    let mut run = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.start().await }
    });

    tokio::select! {
        joined = &mut run => {
            if let Err(e) = joined {
                error!(error = %e, "scheduler task failed");
            }
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received");
            if scheduler.shutdown().await {
                let _ = run.await;
            } else {
                warn!("exiting with a sync still in flight");
                run.abort();
            }
        }
    }

    scheduler.cancel_token().cancel();
    if let Some(server) = server {
        let _ = server.await;
    }

    match scheduler.stats().last_error {
        Some(message) if interval.is_none() => Err(CliError::user(format!("sync failed: {message}"))),
        _ => Ok(()),
    }
}

/// Resolves on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
