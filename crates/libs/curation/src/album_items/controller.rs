use super::{CollectionError, CollectionSnapshot, Visibility, log_error, move_item};
use crate::gateway::AlbumItemRepository;
use common_types::{AlbumId, AlbumItem, AlbumItemDraft, AlbumItemPatch, DraftError, ItemId};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, instrument, warn};

/// Owns the ordered item list of one open album view.
///
/// Every operation that talks to the repository runs under a FIFO mutex, so a
/// reorder issued while another one is persisting waits for it. The current
/// state, including optimistic orders, is published on a watch channel.
pub struct OrderedCollectionController<R: ?Sized> {
    repository: Arc<R>,
    album_id: AlbumId,
    visibility: Visibility,
    mutations: Mutex<()>,
    state: watch::Sender<CollectionSnapshot>,
}

impl<R: AlbumItemRepository + ?Sized> OrderedCollectionController<R> {
    pub fn new(
        repository: Arc<R>,
        album_id: AlbumId,
        visibility: Visibility,
        page_size: u32,
    ) -> Self {
        let (state, _) = watch::channel(CollectionSnapshot::empty(album_id, page_size.max(1)));
        Self {
            repository,
            album_id,
            visibility,
            mutations: Mutex::new(()),
            state,
        }
    }

    #[must_use]
    pub const fn album_id(&self) -> AlbumId {
        self.album_id
    }

    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CollectionSnapshot {
        self.state.borrow().clone()
    }

    pub fn order(&self) -> Vec<ItemId> {
        self.state.borrow().order()
    }

    /// Replaces the held list with one page from the server. On failure the
    /// previous list stays and only `last_error` changes.
    #[instrument(skip(self))]
    pub async fn load(&self, page: u32, page_size: u32) -> Result<CollectionSnapshot, CollectionError> {
        let _guard = self.mutations.lock().await;
        self.load_locked(page, page_size.max(1)).await
    }

    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<CollectionSnapshot, CollectionError> {
        let _guard = self.mutations.lock().await;
        let (page, page_size) = self.current_page();
        self.load_locked(page, page_size).await
    }

    /// Loads the following page, or returns the current snapshot on the last one.
    #[instrument(skip(self))]
    pub async fn next_page(&self) -> Result<CollectionSnapshot, CollectionError> {
        let _guard = self.mutations.lock().await;
        let snapshot = self.snapshot();
        if !snapshot.has_next_page() {
            return Ok(snapshot);
        }
        self.load_locked(snapshot.page + 1, snapshot.page_size).await
    }

    #[instrument(skip(self))]
    pub async fn previous_page(&self) -> Result<CollectionSnapshot, CollectionError> {
        let _guard = self.mutations.lock().await;
        let snapshot = self.snapshot();
        if !snapshot.has_previous_page() {
            return Ok(snapshot);
        }
        self.load_locked(snapshot.page - 1, snapshot.page_size).await
    }

    /// Moves `dragged` to the slot `target` occupied and persists the new order.
    ///
    /// The moved order is published before the persist call returns. Once the
    /// persist settles the list is always reloaded from the server. A failed
    /// persist is returned even when the reload that follows it succeeds.
    ///
    /// The server numbers the ids it receives from zero, so the whole album is
    /// sent. When the view is one of several pages, or hides items, the other
    /// items are fetched first and the moved page is spliced into their slots.
    #[instrument(skip(self))]
    pub async fn reorder(
        &self,
        dragged: ItemId,
        target: ItemId,
    ) -> Result<Vec<ItemId>, CollectionError> {
        let _guard = self.mutations.lock().await;
        let previous = self.snapshot();
        let current = previous.order();
        let reordered = move_item(&current, dragged, target);
        if reordered == current {
            debug!("Reorder of {dragged} onto {target} changes nothing");
            return Ok(reordered);
        }

        self.state.send_modify(|snapshot| {
            snapshot.apply_order(&reordered);
            snapshot.persist_pending = true;
            snapshot.last_error = None;
        });
        debug!("Optimistic order published: {reordered:?}");

        match self.persist_page_order(&previous, &reordered).await {
            Ok(()) => {
                self.reconcile().await;
                Ok(reordered)
            }
            Err(err) => {
                log_error("Persisting album order", &err);
                let message = err.to_string();
                if self
                    .load_locked(previous.page, previous.page_size)
                    .await
                    .is_ok()
                {
                    self.state
                        .send_modify(|snapshot| snapshot.last_error = Some(message));
                } else {
                    warn!("Reload after failed reorder failed, restoring the previous order");
                    self.state.send_replace(CollectionSnapshot {
                        persist_pending: false,
                        needs_resync: true,
                        last_error: Some(message),
                        ..previous
                    });
                }
                Err(err)
            }
        }
    }

    /// Adds the item described by `draft`. The draft is checked before the
    /// request is queued.
    #[instrument(skip(self))]
    pub async fn create(&self, draft: &AlbumItemDraft) -> Result<AlbumItem, CollectionError> {
        let request = draft
            .to_request(self.album_id)
            .map_err(|err| self.fail("Creating album item", err.into()))?;

        let _guard = self.mutations.lock().await;
        match self.repository.create_item(&request).await {
            Ok(created) => {
                debug!("Created album item {}", created.id);
                self.reconcile().await;
                Ok(created)
            }
            Err(err) => Err(self.fail_and_reconcile("Creating album item", err.into()).await),
        }
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        item_id: ItemId,
        patch: &AlbumItemPatch,
    ) -> Result<AlbumItem, CollectionError> {
        if patch.is_empty() {
            return Err(self.fail("Updating album item", DraftError::EmptyPatch.into()));
        }

        let _guard = self.mutations.lock().await;
        let item = self.known_item(item_id).map_err(|err| self.fail("Updating album item", err))?;
        let request = patch
            .merge_onto(&item)
            .map_err(|err| self.fail("Updating album item", err.into()))?;
        match self.repository.update_item(item_id, &request).await {
            Ok(updated) => {
                self.reconcile().await;
                Ok(updated)
            }
            Err(err) => Err(self.fail_and_reconcile("Updating album item", err.into()).await),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, item_id: ItemId) -> Result<(), CollectionError> {
        let _guard = self.mutations.lock().await;
        self.known_item(item_id)
            .map_err(|err| self.fail("Deleting album item", err))?;
        match self.repository.delete_item(item_id).await {
            Ok(()) => {
                debug!("Deleted album item {item_id}");
                self.reconcile().await;
                Ok(())
            }
            Err(err) => Err(self.fail_and_reconcile("Deleting album item", err.into()).await),
        }
    }

    async fn persist_page_order(
        &self,
        previous: &CollectionSnapshot,
        reordered: &[ItemId],
    ) -> Result<(), CollectionError> {
        let album_order = if self.visibility == Visibility::All && previous.total_pages <= 1 {
            reordered.to_vec()
        } else {
            let full = self.fetch_album_order(previous.page_size).await?;
            splice_page_order(&full, &previous.order(), reordered)?
        };
        debug!("Persisting album order: {album_order:?}");
        Ok(self
            .repository
            .persist_reorder(self.album_id, &album_order)
            .await?)
    }

    /// Every item id of the album in server order, hidden ones included.
    async fn fetch_album_order(&self, page_size: u32) -> Result<Vec<ItemId>, CollectionError> {
        let mut order = Vec::new();
        let mut page = 0;
        loop {
            let fetched = self
                .repository
                .fetch_album_items_page(self.album_id, page, page_size, false)
                .await?;
            let exhausted = fetched.items.is_empty();
            order.extend(fetched.items.iter().map(|item| item.id));
            page += 1;
            if exhausted || page >= fetched.total_pages {
                return Ok(order);
            }
        }
    }

    fn current_page(&self) -> (u32, u32) {
        let snapshot = self.state.borrow();
        (snapshot.page, snapshot.page_size)
    }

    fn known_item(&self, item_id: ItemId) -> Result<AlbumItem, CollectionError> {
        self.state.borrow().item(item_id).cloned().ok_or_else(|| {
            CollectionError::ValidationFailure(format!("Unknown album item {item_id}"))
        })
    }

    async fn load_locked(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<CollectionSnapshot, CollectionError> {
        let fetched = self
            .repository
            .fetch_album_items_page(self.album_id, page, page_size, self.visibility.only_visible())
            .await
            .map_err(|err| self.fail("Loading album items", err.into()))?;

        let snapshot = CollectionSnapshot {
            album_id: self.album_id,
            items: fetched.items,
            page,
            page_size,
            total_pages: fetched.total_pages.max(1),
            loaded: true,
            persist_pending: false,
            needs_resync: false,
            last_error: None,
        };
        // Hidden items leave gaps in the public view.
        if self.visibility == Visibility::All && !snapshot.has_contiguous_positions() {
            warn!("Album {} page {page} has non contiguous positions", self.album_id);
        }
        debug!(
            "Loaded {} items of album {} (page {}/{})",
            snapshot.items.len(),
            self.album_id,
            page + 1,
            snapshot.total_pages
        );
        self.state.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Reloads the current page after a mutation. A failure keeps the list
    /// and flags it as possibly out of date.
    async fn reconcile(&self) {
        let (page, page_size) = self.current_page();
        if self.load_locked(page, page_size).await.is_err() {
            self.state.send_modify(|snapshot| {
                snapshot.persist_pending = false;
                snapshot.needs_resync = true;
            });
        }
    }

    async fn fail_and_reconcile(&self, context: &str, err: CollectionError) -> CollectionError {
        log_error(context, &err);
        if err.requires_reload() {
            self.reconcile().await;
        }
        let message = err.to_string();
        self.state
            .send_modify(|snapshot| snapshot.last_error = Some(message));
        err
    }

    fn fail(&self, context: &str, err: CollectionError) -> CollectionError {
        log_error(context, &err);
        let message = err.to_string();
        self.state
            .send_modify(|snapshot| snapshot.last_error = Some(message));
        err
    }
}

/// Puts `reordered` into the slots the page's items hold in `album`.
fn splice_page_order(
    album: &[ItemId],
    page: &[ItemId],
    reordered: &[ItemId],
) -> Result<Vec<ItemId>, CollectionError> {
    let mut moved = reordered.iter();
    let spliced: Vec<ItemId> = album
        .iter()
        .map(|id| {
            if page.contains(id) {
                moved.next().copied().unwrap_or(*id)
            } else {
                *id
            }
        })
        .collect();
    if moved.next().is_some() {
        return Err(CollectionError::StaleStateConflict(
            "Album items changed since the page was loaded".to_string(),
        ));
    }
    Ok(spliced)
}
