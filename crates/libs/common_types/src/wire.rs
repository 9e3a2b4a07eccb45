//! JSON shapes of the console API and their normalisation into the model.
//!
//! The server sends loosely shaped objects: every field may be missing and
//! tags travel as a comma separated string. Everything is checked here so the
//! rest of the workspace can rely on required fields being present.

use crate::{AlbumId, AlbumItem, AlbumItemsPage, AssetId, ItemId, MediaAsset, parse_tags};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{field}' must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },
}

/// An entry of `GET /uploads`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDto {
    pub id: Option<i64>,
    pub original_filename: Option<String>,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
}

impl TryFrom<UploadDto> for MediaAsset {
    type Error = BoundaryError;

    fn try_from(dto: UploadDto) -> Result<Self, Self::Error> {
        let id = dto.id.ok_or(BoundaryError::MissingField("id"))?;
        let size_bytes = match dto.size_bytes {
            None => 0,
            Some(value) => u64::try_from(value).map_err(|_| BoundaryError::Negative {
                field: "sizeBytes",
                value,
            })?,
        };
        Ok(Self {
            id: AssetId(id),
            original_filename: dto.original_filename.unwrap_or_default(),
            content_type: dto.content_type.unwrap_or_default(),
            size_bytes,
        })
    }
}

/// An entry of `GET /gallery/albums/{album}/items`. The album id is not part
/// of the payload, it comes from the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumItemDto {
    pub id: Option<i64>,
    pub upload_id: Option<i64>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub tags: Option<String>,
    pub position: Option<i64>,
    pub visible: Option<bool>,
    pub content_type: Option<String>,
}

impl AlbumItemDto {
    pub fn into_album_item(self, album_id: AlbumId) -> Result<AlbumItem, BoundaryError> {
        let id = self.id.ok_or(BoundaryError::MissingField("id"))?;
        let asset_id = self.upload_id.ok_or(BoundaryError::MissingField("uploadId"))?;
        let position = match self.position {
            None => 0,
            Some(value) => u32::try_from(value).map_err(|_| BoundaryError::Negative {
                field: "position",
                value,
            })?,
        };
        Ok(AlbumItem {
            id: ItemId(id),
            album_id,
            asset_id: AssetId(asset_id),
            title: self.title.unwrap_or_default(),
            caption: self.caption.unwrap_or_default(),
            tags: self.tags.as_deref().map(parse_tags).unwrap_or_default(),
            position,
            visible: self.visible.unwrap_or(true),
            content_type: self.content_type.filter(|ct| !ct.is_empty()),
        })
    }
}

/// The subset of a Spring `Page` the client reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl PageDto<AlbumItemDto> {
    /// Rejects the whole page if any item is malformed, a partial page would
    /// break the contiguous position order.
    pub fn into_items_page(self, album_id: AlbumId) -> Result<AlbumItemsPage, BoundaryError> {
        let items = self
            .content
            .into_iter()
            .map(|dto| dto.into_album_item(album_id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AlbumItemsPage {
            items,
            // An empty album reports zero pages, the UI still shows one.
            total_pages: self.total_pages.unwrap_or(1).max(1),
        })
    }
}
