//! Operations the curation core consumes from the console backend.
//!
//! The controllers only see these traits; [`crate::gallery_client::GalleryClient`]
//! is the HTTP implementation and the tests use an in-memory fake.

use async_trait::async_trait;
use common_types::{AlbumId, AlbumItem, AlbumItemRequest, AlbumItemsPage, ItemId, MediaAsset};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transport error, unexpected status or an unreadable response.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The server rejected a change because it was based on outdated state.
    #[error("Stale state conflict: {0}")]
    StaleStateConflict(String),
}

#[async_trait]
pub trait MediaLibrarySource: Send + Sync {
    async fn fetch_media_library(&self) -> Result<Vec<MediaAsset>, GatewayError>;
}

#[async_trait]
pub trait AlbumItemRepository: Send + Sync {
    async fn fetch_album_items_page(
        &self,
        album_id: AlbumId,
        page: u32,
        page_size: u32,
        only_visible: bool,
    ) -> Result<AlbumItemsPage, GatewayError>;

    /// Stores `ordered_ids` as the new order, position `i` for the id at index `i`.
    async fn persist_reorder(
        &self,
        album_id: AlbumId,
        ordered_ids: &[ItemId],
    ) -> Result<(), GatewayError>;

    async fn create_item(&self, request: &AlbumItemRequest) -> Result<AlbumItem, GatewayError>;

    async fn update_item(
        &self,
        item_id: ItemId,
        request: &AlbumItemRequest,
    ) -> Result<AlbumItem, GatewayError>;

    async fn delete_item(&self, item_id: ItemId) -> Result<(), GatewayError>;
}
