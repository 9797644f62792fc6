//! Remote workspace client for docmirror
//!
//! Talks to the workspace service over its JSON API with a cookie session:
//!
//! - [`RemoteClient`]: login, space listing, the sidebar page tree and the
//!   zipped markdown export
//! - [`archive`]: extraction of the export into a blob map
//! - [`RemoteSource`]: the [`mirror_core::SnapshotSource`] the engine runs on

pub mod api;
pub mod archive;
pub mod client;
pub mod error;
pub mod source;

pub use client::{RemoteClient, RemoteConfig};
pub use error::{Error, Result};
pub use source::RemoteSource;
