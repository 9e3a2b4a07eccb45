use crate::{AlbumId, AlbumItem, AlbumItemRequest, MediaAsset, join_tags};
use bon::Builder;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Please select an upload first")]
    MissingAsset,

    #[error("Nothing to update")]
    EmptyPatch,
}

/// The "add item" form: an asset chosen in the picker plus display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct AlbumItemDraft {
    pub asset: Option<MediaAsset>,
    #[builder(into, default)]
    pub title: String,
    #[builder(into, default)]
    pub caption: String,
    #[builder(default)]
    pub tags: BTreeSet<String>,
    /// Left empty the server appends at position 0.
    pub position: Option<u32>,
    #[builder(default = true)]
    pub visible: bool,
}

impl Default for AlbumItemDraft {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AlbumItemDraft {
    /// Checks the draft locally, before anything goes over the wire.
    pub fn to_request(&self, album_id: AlbumId) -> Result<AlbumItemRequest, DraftError> {
        let asset = self.asset.as_ref().ok_or(DraftError::MissingAsset)?;
        Ok(AlbumItemRequest {
            album_id,
            asset_id: asset.id,
            title: self.title.trim().to_owned(),
            caption: self.caption.trim().to_owned(),
            tags: join_tags(&self.tags),
            position: Some(self.position.unwrap_or(0)),
            visible: self.visible,
        })
    }
}

/// Edit dialog changes. Fields left `None` keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Builder)]
pub struct AlbumItemPatch {
    #[builder(into)]
    pub title: Option<String>,
    #[builder(into)]
    pub caption: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub visible: Option<bool>,
    pub position: Option<u32>,
}

impl AlbumItemPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.caption.is_none()
            && self.tags.is_none()
            && self.visible.is_none()
            && self.position.is_none()
    }

    /// The update endpoint overwrites title, caption and tags wholesale, so the
    /// patch is merged onto the current item to produce a complete request.
    pub fn merge_onto(&self, item: &AlbumItem) -> Result<AlbumItemRequest, DraftError> {
        if self.is_empty() {
            return Err(DraftError::EmptyPatch);
        }
        Ok(AlbumItemRequest {
            album_id: item.album_id,
            asset_id: item.asset_id,
            title: self
                .title
                .as_deref()
                .map_or_else(|| item.title.clone(), |title| title.trim().to_owned()),
            caption: self
                .caption
                .as_deref()
                .map_or_else(|| item.caption.clone(), |caption| caption.trim().to_owned()),
            tags: join_tags(self.tags.as_ref().unwrap_or(&item.tags)),
            position: self.position,
            visible: self.visible.unwrap_or(item.visible),
        })
    }
}
