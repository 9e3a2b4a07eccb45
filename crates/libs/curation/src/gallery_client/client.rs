use super::error::GalleryClientError;
use crate::gateway::{AlbumItemRepository, GatewayError, MediaLibrarySource};
use async_trait::async_trait;
use common_types::wire::{AlbumItemDto, PageDto, UploadDto};
use common_types::{AlbumId, AlbumItem, AlbumItemRequest, AlbumItemsPage, ItemId, MediaAsset};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

/// HTTP access to the console API (`{base}/uploads`, `{base}/gallery/...`).
#[derive(Clone, Debug)]
pub struct GalleryClient {
    http_client: Client,
    base: String,
    token: Option<String>,
}

impl GalleryClient {
    pub fn new(http_client: Client, base_url: &Url, token: Option<String>) -> Self {
        Self {
            http_client,
            base: base_url.as_str().trim_end_matches('/').to_owned(),
            token,
        }
    }

    /// Base URL without trailing slash, as used for asset URLs.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, GalleryClientError> {
        Ok(Url::parse(&format!("{}{path}", self.base))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http_client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Lists the media library. Entries without an id are skipped.
    pub async fn list_uploads(&self) -> Result<Vec<MediaAsset>, GalleryClientError> {
        let url = self.endpoint("/uploads")?;
        let response = self.request(Method::GET, url.clone()).send().await?;
        let uploads: Vec<UploadDto> = check_status(response, &url).await?.json().await?;

        let total = uploads.len();
        let assets: Vec<MediaAsset> = uploads
            .into_iter()
            .filter_map(|dto| match MediaAsset::try_from(dto) {
                Ok(asset) => Some(asset),
                Err(err) => {
                    warn!("Skipping library entry: {err}");
                    None
                }
            })
            .collect();
        debug!("Library has {} usable of {total} entries", assets.len());
        Ok(assets)
    }

    pub async fn list_album_items(
        &self,
        album_id: AlbumId,
        page: u32,
        page_size: u32,
        only_visible: bool,
    ) -> Result<AlbumItemsPage, GalleryClientError> {
        let mut url = self.endpoint(&format!("/gallery/albums/{album_id}/items"))?;
        url.query_pairs_mut()
            .append_pair("onlyVisible", &only_visible.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("size", &page_size.to_string());

        let response = self.request(Method::GET, url.clone()).send().await?;
        let page: PageDto<AlbumItemDto> = check_status(response, &url).await?.json().await?;
        Ok(page.into_items_page(album_id)?)
    }

    pub async fn reorder_items(
        &self,
        album_id: AlbumId,
        ordered_ids: &[ItemId],
    ) -> Result<(), GalleryClientError> {
        let url = self.endpoint(&format!("/gallery/admin/albums/{album_id}/reorder"))?;
        let response = self
            .request(Method::POST, url.clone())
            .json(ordered_ids)
            .send()
            .await?;
        check_status(response, &url).await?;
        Ok(())
    }

    pub async fn create_album_item(
        &self,
        request: &AlbumItemRequest,
    ) -> Result<AlbumItem, GalleryClientError> {
        let url = self.endpoint("/gallery/admin/items")?;
        let response = self
            .request(Method::POST, url.clone())
            .json(request)
            .send()
            .await?;
        let dto: AlbumItemDto = check_status(response, &url).await?.json().await?;
        Ok(dto.into_album_item(request.album_id)?)
    }

    pub async fn update_album_item(
        &self,
        item_id: ItemId,
        request: &AlbumItemRequest,
    ) -> Result<AlbumItem, GalleryClientError> {
        let url = self.endpoint(&format!("/gallery/admin/items/{item_id}"))?;
        let response = self
            .request(Method::PUT, url.clone())
            .json(request)
            .send()
            .await?;
        let dto: AlbumItemDto = check_status(response, &url).await?.json().await?;
        Ok(dto.into_album_item(request.album_id)?)
    }

    pub async fn delete_album_item(&self, item_id: ItemId) -> Result<(), GalleryClientError> {
        let url = self.endpoint(&format!("/gallery/admin/items/{item_id}"))?;
        let response = self.request(Method::DELETE, url.clone()).send().await?;
        check_status(response, &url).await?;
        Ok(())
    }
}

async fn check_status(response: Response, url: &Url) -> Result<Response, GalleryClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(status_error(status, url, &error_text))
}

/// 409 and 412 mean the request was based on outdated state.
fn status_error(status: StatusCode, url: &Url, error_text: &str) -> GalleryClientError {
    let message = format!("{url} returned {status}: {error_text}");
    match status {
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
            GalleryClientError::Conflict(message)
        }
        _ => GalleryClientError::RemoteServerError(message),
    }
}

#[async_trait]
impl MediaLibrarySource for GalleryClient {
    async fn fetch_media_library(&self) -> Result<Vec<MediaAsset>, GatewayError> {
        Ok(self.list_uploads().await?)
    }
}

#[async_trait]
impl AlbumItemRepository for GalleryClient {
    async fn fetch_album_items_page(
        &self,
        album_id: AlbumId,
        page: u32,
        page_size: u32,
        only_visible: bool,
    ) -> Result<AlbumItemsPage, GatewayError> {
        Ok(self
            .list_album_items(album_id, page, page_size, only_visible)
            .await?)
    }

    async fn persist_reorder(
        &self,
        album_id: AlbumId,
        ordered_ids: &[ItemId],
    ) -> Result<(), GatewayError> {
        Ok(self.reorder_items(album_id, ordered_ids).await?)
    }

    async fn create_item(&self, request: &AlbumItemRequest) -> Result<AlbumItem, GatewayError> {
        Ok(self.create_album_item(request).await?)
    }

    async fn update_item(
        &self,
        item_id: ItemId,
        request: &AlbumItemRequest,
    ) -> Result<AlbumItem, GatewayError> {
        Ok(self.update_album_item(item_id, request).await?)
    }

    async fn delete_item(&self, item_id: ItemId) -> Result<(), GatewayError> {
        Ok(self.delete_album_item(item_id).await?)
    }
}
