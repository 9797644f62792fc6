//! Error types for mirror-remote

use reqwest::StatusCode;

/// Result type for mirror-remote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the remote service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure, timeout or unreadable body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Login was rejected
    #[error("Login failed with status {status}: {body}")]
    Auth { status: StatusCode, body: String },

    /// Any other endpoint answered with an unexpected status
    #[error("{endpoint} failed with status {status}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    /// The response body did not match the expected envelope
    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The export is not a readable zip archive
    #[error("Invalid export archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// An archive entry could not be read
    #[error("Failed to read archive entry {name}: {source}")]
    Entry {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<Error> for mirror_core::Error {
    fn from(e: Error) -> Self {
        mirror_core::Error::retrieval(e)
    }
}
