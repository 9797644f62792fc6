//! Action records produced by the reconciliation passes.
//!
//! These exist for logging only and are never persisted.

use std::fmt;
use std::path::PathBuf;

use super::Pass;

/// One mutation performed by a pass. Paths are relative to the tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationAction {
    Renamed { from: PathBuf, to: PathBuf },
    Moved { from: PathBuf, to: PathBuf },
    Merged {
        from: PathBuf,
        into: PathBuf,
        discarded: Vec<PathBuf>,
    },
    Copied { from: PathBuf, to: PathBuf },
    Deleted { path: PathBuf },
    Rewritten { path: PathBuf },
}

impl fmt::Display for NormalizationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renamed { from, to } => write!(f, "renamed {} -> {}", from.display(), to.display()),
            Self::Moved { from, to } => write!(f, "moved {} -> {}", from.display(), to.display()),
            Self::Merged {
                from,
                into,
                discarded,
            } if discarded.is_empty() => {
                write!(f, "merged {} into {}", from.display(), into.display())
            }
            Self::Merged {
                from,
                into,
                discarded,
            } => write!(
                f,
                "merged {} into {} (discarded {} conflicting entries)",
                from.display(),
                into.display(),
                discarded.len()
            ),
            Self::Copied { from, to } => write!(f, "copied {} -> {}", from.display(), to.display()),
            Self::Deleted { path } => write!(f, "deleted {}", path.display()),
            Self::Rewritten { path } => write!(f, "rewrote {}", path.display()),
        }
    }
}

/// Outcome of one pass.
#[derive(Debug, Clone)]
pub struct PassReport {
    /// Position in the sequence (0-based).
    pub step: usize,
    pub pass: Pass,
    pub actions: Vec<NormalizationAction>,
    /// Recovered errors; the affected item was skipped.
    pub warnings: Vec<String>,
}

impl PassReport {
    pub fn new(step: usize, pass: Pass) -> Self {
        Self {
            step,
            pass,
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Outcome of a whole pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub passes: Vec<PassReport>,
    /// Number of full sequences executed.
    pub rounds: usize,
    /// False only when a bounded fixpoint run hit its cap while still changing.
    pub converged: bool,
}

impl PipelineReport {
    pub fn action_count(&self) -> usize {
        self.passes.iter().map(|p| p.actions.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.passes.iter().map(|p| p.warnings.len()).sum()
    }

    pub fn actions(&self) -> impl Iterator<Item = &NormalizationAction> {
        self.passes.iter().flat_map(|p| p.actions.iter())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.passes
            .iter()
            .flat_map(|p| p.warnings.iter().map(String::as_str))
    }
}
