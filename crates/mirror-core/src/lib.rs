//! Core orchestration layer for docmirror
//!
//! - **Pipeline**: ordered, idempotent reconciliation passes over a working
//!   tree ([`pipeline`])
//! - **SyncEngine**: fetch, build, reconcile and publish each space
//! - **Scheduler**: one-shot or periodic runs with skip-if-busy and a
//!   bounded shutdown
//!
//! ```text
//!                  mirror-cli
//!                      |
//!        mirror-remote |
//!               \      |
//!               mirror-core
//!                      |
//!     +-----------+----+--------+---------------+
//!     |           |             |               |
//! mirror-fs  mirror-meta  mirror-content  mirror-translit
//! ```

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod scheduler;
pub mod source;

pub use engine::{RunReport, SpaceOutcome, SpaceReport, SyncEngine};
pub use error::{Error, Result};
pub use pipeline::{
    NormalizationAction, Pass, PassReport, Pipeline, PipelineMode, PipelineReport, SlashForm,
    reconcile,
};
pub use scheduler::{RunOutcome, Scheduler, SyncJob, SyncStats};
pub use source::SnapshotSource;
