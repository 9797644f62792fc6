//! Error types for mirror-content

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to render document header: {0}")]
    Header(#[from] serde_yaml::Error),
}
