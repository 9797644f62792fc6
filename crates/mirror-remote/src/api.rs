//! Wire types of the remote JSON API.
//!
//! Every JSON response is wrapped in an [`Envelope`]; list endpoints carry
//! a [`ListData`] inside it.

use chrono::{DateTime, Utc};
use mirror_meta::{PageMeta, SpaceRef};
use serde::{Deserialize, Serialize};

/// Page size requested from the space listing. Larger accounts are
/// truncated to this many spaces.
pub const SPACE_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListData<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub meta: ListMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSpace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteSpace {
    pub fn space_ref(&self) -> SpaceRef {
        SpaceRef {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePage {
    pub id: String,
    #[serde(default)]
    pub slug_id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub parent_page_id: Option<String>,
    #[serde(default)]
    pub space_id: String,
    #[serde(default)]
    pub has_children: bool,
}

impl From<RemotePage> for PageMeta {
    fn from(page: RemotePage) -> Self {
        PageMeta {
            id: page.id,
            slug_id: page.slug_id,
            title: page.title.unwrap_or_default(),
            icon: page.icon,
            position: page.position,
            parent_page_id: page.parent_page_id,
            has_children: page.has_children,
            children: Vec::new(),
            file_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SpaceListRequest {
    pub limit: u32,
    pub offset: u32,
}

/// Body of the sidebar endpoint: root pages of a space, or the children of
/// one page.
#[derive(Debug, Serialize)]
pub enum SidebarRequest<'a> {
    #[serde(rename = "spaceId")]
    Space(&'a str),
    #[serde(rename = "pageId")]
    Page(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest<'a> {
    pub space_id: &'a str,
    pub format: &'a str,
    pub include_attachments: bool,
}
