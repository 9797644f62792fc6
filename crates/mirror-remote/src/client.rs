//! HTTP client for the remote workspace service.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mirror_meta::PageMeta;
use mirror_meta::page::{assemble_tree, sort_by_position};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::api::{
    Envelope, ExportRequest, ListData, LoginRequest, RemotePage, RemoteSpace, SPACE_PAGE_LIMIT,
    SidebarRequest, SpaceListRequest,
};
use crate::{Error, Result};

/// Default request timeout; exports of large spaces are slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const LOGIN: &str = "/api/auth/login";
const SPACES: &str = "/api/spaces/";
const SIDEBAR: &str = "/api/pages/sidebar-pages";
const EXPORT: &str = "/api/spaces/export";

/// Connection settings for [`RemoteClient`].
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub email: String,
    pub password: String,
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: &str, email: &str, password: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
            password: password.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Cookie-session client. The session cookie set by [`login`](Self::login)
/// authenticates every later request.
pub struct RemoteClient {
    config: RemoteConfig,
    http: reqwest::Client,
    logged_in: AtomicBool,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            http,
            logged_in: AtomicBool::new(false),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Authenticate and keep the session cookie. 200 and 201 both count as
    /// success.
    pub async fn login(&self) -> Result<()> {
        let request = LoginRequest {
            email: &self.config.email,
            password: &self.config.password,
        };
        let response = self.http.post(self.url(LOGIN)).json(&request).send().await?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            self.logged_in.store(false, Ordering::SeqCst);
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth { status, body });
        }

        self.logged_in.store(true, Ordering::SeqCst);
        info!(base_url = %self.config.base_url, "logged in to remote service");
        Ok(())
    }

    /// Every space visible to the account, up to [`SPACE_PAGE_LIMIT`].
    pub async fn list_spaces(&self) -> Result<Vec<RemoteSpace>> {
        let request = SpaceListRequest {
            limit: SPACE_PAGE_LIMIT,
            offset: 0,
        };
        let data: ListData<RemoteSpace> = self.post_json(SPACES, &request).await?;
        if data.meta.has_next_page {
            warn!(
                limit = SPACE_PAGE_LIMIT,
                "more spaces than one listing page holds, the rest are ignored"
            );
        }
        Ok(data.items)
    }

    /// One level of the sidebar: root pages of a space or children of a page.
    pub async fn sidebar_pages(&self, request: SidebarRequest<'_>) -> Result<Vec<RemotePage>> {
        let data: ListData<RemotePage> = self.post_json(SIDEBAR, &request).await?;
        Ok(data.items)
    }

    /// The full page tree of a space, siblings ordered by position.
    ///
    /// Children are fetched breadth-first. A page whose children cannot be
    /// fetched is kept as a leaf; failing to fetch the roots is an error.
    pub async fn page_tree(&self, space_id: &str) -> Result<Vec<PageMeta>> {
        let roots: Vec<PageMeta> = self
            .sidebar_pages(SidebarRequest::Space(space_id))
            .await?
            .into_iter()
            .map(PageMeta::from)
            .collect();

        let mut queue: VecDeque<String> = roots
            .iter()
            .filter(|p| p.has_children)
            .map(|p| p.id.clone())
            .collect();
        let mut seen: HashSet<String> = roots.iter().map(|p| p.id.clone()).collect();
        let mut children: HashMap<String, Vec<PageMeta>> = HashMap::new();

        while let Some(parent_id) = queue.pop_front() {
            let kids = match self.sidebar_pages(SidebarRequest::Page(&parent_id)).await {
                Ok(kids) => kids,
                Err(e) => {
                    warn!(page = %parent_id, error = %e, "failed to fetch child pages, keeping page as leaf");
                    continue;
                }
            };
            let mut level = Vec::with_capacity(kids.len());
            for kid in kids {
                if !seen.insert(kid.id.clone()) {
                    debug!(page = %kid.id, "page listed twice, ignoring repeat");
                    continue;
                }
                let mut page = PageMeta::from(kid);
                page.parent_page_id.get_or_insert_with(|| parent_id.clone());
                if page.has_children {
                    queue.push_back(page.id.clone());
                }
                level.push(page);
            }
            children.insert(parent_id, level);
        }

        let mut tree = assemble_tree(roots, &mut children);
        sort_by_position(&mut tree);
        Ok(tree)
    }

    /// The zipped markdown export of a space, attachments included.
    pub async fn export(&self, space_id: &str) -> Result<Vec<u8>> {
        let request = ExportRequest {
            space_id,
            format: "markdown",
            include_attachments: true,
        };
        let response = self.post(EXPORT, &request).await?;
        let bytes = response.bytes().await?;
        debug!(space = space_id, bytes = bytes.len(), "export downloaded");
        Ok(bytes.to_vec())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.config.base_url)
    }

    async fn ensure_login(&self) -> Result<()> {
        if self.logged_in.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.login().await
    }

    /// Authenticated POST; any status other than 200 is an error.
    async fn post(&self, endpoint: &str, body: &impl Serialize) -> Result<Response> {
        self.ensure_login().await?;
        let response = self.http.post(self.url(endpoint)).json(body).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            if status == StatusCode::UNAUTHORIZED {
                self.logged_in.store(false, Ordering::SeqCst);
            }
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }
        Ok(response)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let response = self.post(endpoint, body).await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> =
            serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Ok(envelope.data)
    }
}
