use crate::{AlbumId, AssetId, ItemId, MediaKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A positioned reference to a media asset inside one album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumItem {
    pub id: ItemId,
    pub album_id: AlbumId,
    /// Non-owning reference to the uploaded asset.
    pub asset_id: AssetId,
    pub title: String,
    pub caption: String,
    pub tags: BTreeSet<String>,
    pub position: u32,
    pub visible: bool,
    /// Content type of the referenced asset, joined in by the server.
    pub content_type: Option<String>,
}

impl AlbumItem {
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.content_type
            .as_deref()
            .map_or(MediaKind::Other, MediaKind::from_content_type)
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.kind() == MediaKind::Image
    }

    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(untitled)"
        } else {
            &self.title
        }
    }
}

/// One page of album items in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumItemsPage {
    pub items: Vec<AlbumItem>,
    pub total_pages: u32,
}

/// Body of the create and update item endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumItemRequest {
    pub album_id: AlbumId,
    #[serde(rename = "uploadId")]
    pub asset_id: AssetId,
    pub title: String,
    pub caption: String,
    /// Comma separated, see [`join_tags`].
    pub tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    pub visible: bool,
}

/// Splits the comma separated wire form into a normalised tag set.
#[must_use]
pub fn parse_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

#[must_use]
pub fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}
