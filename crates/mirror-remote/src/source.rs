//! The engine's view of the remote service.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mirror_core::SnapshotSource;
use mirror_meta::page::{count_pages, resolve_file_paths};
use mirror_meta::{Snapshot, SpaceMeta, SpaceRef};
use tracing::{debug, info};

use crate::api::RemoteSpace;
use crate::archive;
use crate::client::RemoteClient;

/// Snapshot source backed by a [`RemoteClient`].
///
/// Each run logs in afresh when listing spaces, so an expired session from
/// a previous run is never reused.
pub struct RemoteSource {
    client: RemoteClient,
    spaces: Mutex<HashMap<String, RemoteSpace>>,
}

impl RemoteSource {
    pub fn new(client: RemoteClient) -> Self {
        Self {
            client,
            spaces: Mutex::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    fn details(&self, space: &SpaceRef) -> RemoteSpace {
        let spaces = self
            .spaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        spaces.get(&space.id).cloned().unwrap_or_else(|| RemoteSpace {
            id: space.id.clone(),
            name: space.name.clone(),
            slug: space.slug.clone(),
            ..RemoteSpace::default()
        })
    }
}

#[async_trait]
impl SnapshotSource for RemoteSource {
    async fn list_spaces(&self) -> mirror_core::Result<Vec<SpaceRef>> {
        self.client.login().await?;
        let spaces = self.client.list_spaces().await?;
        info!(count = spaces.len(), "listed remote spaces");

        let refs = spaces.iter().map(RemoteSpace::space_ref).collect();
        let mut cache = self
            .spaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cache = spaces.into_iter().map(|s| (s.id.clone(), s)).collect();
        Ok(refs)
    }

    async fn fetch_snapshot(&self, space: &SpaceRef) -> mirror_core::Result<Snapshot> {
        let bytes = self.client.export(&space.id).await?;
        let blobs = archive::extract(&bytes)?;
        debug!(space = %space.name, entries = blobs.len(), "export extracted");

        let mut pages = self.client.page_tree(&space.id).await?;
        resolve_file_paths(&mut pages, &blobs);

        let details = self.details(space);
        let meta = SpaceMeta {
            id: details.id,
            name: details.name,
            slug: details.slug,
            description: details.description.unwrap_or_default(),
            created_at: details.created_at,
            updated_at: details.updated_at,
            total_pages: count_pages(&pages),
            pages,
        };
        info!(
            space = %space.name,
            pages = meta.total_pages,
            files = blobs.len(),
            "space snapshot retrieved"
        );
        Ok(Snapshot { meta, blobs })
    }
}
