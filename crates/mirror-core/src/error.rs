//! Error types for mirror-core

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote source could not produce spaces or a snapshot
    #[error("Retrieval failed: {message}")]
    Retrieval { message: String },

    /// One or more spaces failed during a run
    #[error("{failed} of {total} spaces failed: {summary}")]
    SpacesFailed {
        failed: usize,
        total: usize,
        summary: String,
    },

    /// A blocking filesystem task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),

    /// Metadata error from mirror-meta
    #[error(transparent)]
    Meta(#[from] mirror_meta::Error),

    /// Content error from mirror-content
    #[error(transparent)]
    Content(#[from] mirror_content::Error),
}

impl Error {
    pub fn retrieval(message: impl std::fmt::Display) -> Self {
        Self::Retrieval {
            message: message.to_string(),
        }
    }
}
