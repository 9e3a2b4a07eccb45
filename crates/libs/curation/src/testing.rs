//! In-memory stand-in for the console backend.

use crate::gateway::{AlbumItemRepository, GatewayError, MediaLibrarySource};
use async_trait::async_trait;
use common_types::{
    AlbumId, AlbumItem, AlbumItemRequest, AlbumItemsPage, AssetId, ItemId, MediaAsset, parse_tags,
};
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const ALBUM: AlbumId = AlbumId(1);

pub fn item(id: i64, position: u32, content_type: &str) -> AlbumItem {
    AlbumItem {
        id: ItemId(id),
        album_id: ALBUM,
        asset_id: AssetId(id * 10),
        title: format!("item {id}"),
        caption: String::new(),
        tags: BTreeSet::new(),
        position,
        visible: true,
        content_type: Some(content_type.to_string()),
    }
}

pub fn images(ids: &[i64]) -> Vec<AlbumItem> {
    ids.iter()
        .enumerate()
        .map(|(position, id)| item(*id, position as u32, "image/png"))
        .collect()
}

pub fn asset(id: i64, filename: &str, content_type: &str) -> MediaAsset {
    MediaAsset {
        id: AssetId(id),
        original_filename: filename.to_string(),
        content_type: content_type.to_string(),
        size_bytes: 1024,
    }
}

type LibraryResponse = (Duration, Result<Vec<MediaAsset>, GatewayError>);

#[derive(Default)]
pub struct FakeGallery {
    items: Mutex<Vec<AlbumItem>>,
    library: Mutex<Vec<MediaAsset>>,
    scripted_library: Mutex<VecDeque<LibraryResponse>>,
    reorder_error: Mutex<Option<GatewayError>>,
    reorder_calls: Mutex<Vec<Vec<ItemId>>>,
    persist_gate: Option<Arc<Notify>>,
    failing_fetches: AtomicUsize,
    fetches: AtomicUsize,
    library_fetches: AtomicUsize,
}

impl FakeGallery {
    pub fn with_items(items: Vec<AlbumItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn with_library(library: Vec<MediaAsset>) -> Self {
        Self {
            library: Mutex::new(library),
            ..Self::default()
        }
    }

    /// Every persist call waits for one `notify_one` on the returned handle.
    pub fn gate_persists(&mut self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.persist_gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn fail_next_reorder(&self, error: GatewayError) {
        *self.reorder_error.lock().expect("lock") = Some(error);
    }

    pub fn fail_next_fetches(&self, count: usize) {
        self.failing_fetches.store(count, Ordering::SeqCst);
    }

    pub fn script_library(&self, delay: Duration, response: Result<Vec<MediaAsset>, GatewayError>) {
        self.scripted_library
            .lock()
            .expect("lock")
            .push_back((delay, response));
    }

    /// Simulates another session changing the album.
    pub fn replace_items(&self, items: Vec<AlbumItem>) {
        *self.items.lock().expect("lock") = items;
    }

    pub fn server_order(&self) -> Vec<ItemId> {
        self.server_items().iter().map(|i| i.id).collect()
    }

    /// Items by position, ties broken by id.
    pub fn server_items(&self) -> Vec<AlbumItem> {
        let mut items = self.items.lock().expect("lock").clone();
        Self::sort(&mut items);
        items
    }

    pub fn reorder_calls(&self) -> Vec<Vec<ItemId>> {
        self.reorder_calls.lock().expect("lock").clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn library_fetch_count(&self) -> usize {
        self.library_fetches.load(Ordering::SeqCst)
    }

    fn sort(items: &mut [AlbumItem]) {
        items.sort_by_key(|item| (item.position, item.id.0));
    }

    fn renumber(items: &mut [AlbumItem]) {
        for (position, item) in items.iter_mut().enumerate() {
            item.position = position as u32;
        }
    }
}

#[async_trait]
impl MediaLibrarySource for FakeGallery {
    async fn fetch_media_library(&self) -> Result<Vec<MediaAsset>, GatewayError> {
        self.library_fetches.fetch_add(1, Ordering::SeqCst);
        let scripted = self.scripted_library.lock().expect("lock").pop_front();
        match scripted {
            Some((delay, response)) => {
                tokio::time::sleep(delay).await;
                response
            }
            None => Ok(self.library.lock().expect("lock").clone()),
        }
    }
}

#[async_trait]
impl AlbumItemRepository for FakeGallery {
    async fn fetch_album_items_page(
        &self,
        _album_id: AlbumId,
        page: u32,
        page_size: u32,
        only_visible: bool,
    ) -> Result<AlbumItemsPage, GatewayError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing_fetches.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_fetches.store(failing - 1, Ordering::SeqCst);
            return Err(GatewayError::NetworkFailure("connection refused".to_string()));
        }
        let items: Vec<AlbumItem> = self
            .server_items()
            .into_iter()
            .filter(|item| !only_visible || item.visible)
            .collect();
        let size = page_size.max(1) as usize;
        let total_pages = items.len().div_ceil(size).max(1) as u32;
        let items = items
            .into_iter()
            .skip(page as usize * size)
            .take(size)
            .collect();
        Ok(AlbumItemsPage { items, total_pages })
    }

    async fn persist_reorder(
        &self,
        _album_id: AlbumId,
        ordered_ids: &[ItemId],
    ) -> Result<(), GatewayError> {
        self.reorder_calls
            .lock()
            .expect("lock")
            .push(ordered_ids.to_vec());
        if let Some(gate) = &self.persist_gate {
            gate.notified().await;
        }
        if let Some(error) = self.reorder_error.lock().expect("lock").take() {
            return Err(error);
        }
        // Listed ids take their index as position, the others keep theirs.
        let mut items = self.items.lock().expect("lock");
        for item in items.iter_mut() {
            if let Some(index) = ordered_ids.iter().position(|id| *id == item.id) {
                item.position = index as u32;
            }
        }
        Ok(())
    }

    async fn create_item(&self, request: &AlbumItemRequest) -> Result<AlbumItem, GatewayError> {
        let mut items = self.items.lock().expect("lock");
        Self::sort(&mut items);
        let id = items.iter().map(|i| i.id.0).max().unwrap_or(0) + 1;
        let created = AlbumItem {
            id: ItemId(id),
            album_id: request.album_id,
            asset_id: request.asset_id,
            title: request.title.clone(),
            caption: request.caption.clone(),
            tags: parse_tags(&request.tags),
            position: 0,
            visible: request.visible,
            content_type: Some("image/png".to_string()),
        };
        let at = (request.position.unwrap_or(0) as usize).min(items.len());
        items.insert(at, created);
        Self::renumber(&mut items);
        Ok(items[at].clone())
    }

    async fn update_item(
        &self,
        item_id: ItemId,
        request: &AlbumItemRequest,
    ) -> Result<AlbumItem, GatewayError> {
        let mut items = self.items.lock().expect("lock");
        Self::sort(&mut items);
        let index = items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| GatewayError::StaleStateConflict(format!("item {item_id} is gone")))?;
        let mut updated = items.remove(index);
        updated.title = request.title.clone();
        updated.caption = request.caption.clone();
        updated.tags = parse_tags(&request.tags);
        updated.visible = request.visible;
        let at = request
            .position
            .map_or(index, |p| (p as usize).min(items.len()));
        items.insert(at, updated);
        Self::renumber(&mut items);
        Ok(items[at].clone())
    }

    async fn delete_item(&self, item_id: ItemId) -> Result<(), GatewayError> {
        let mut items = self.items.lock().expect("lock");
        Self::sort(&mut items);
        let before = items.len();
        items.retain(|i| i.id != item_id);
        if items.len() == before {
            return Err(GatewayError::StaleStateConflict(format!(
                "item {item_id} is gone"
            )));
        }
        Self::renumber(&mut items);
        Ok(())
    }
}
