use common_types::{AlbumId, AlbumItem, ItemId};

/// Whether a view lists every item (album manager) or only visible ones (public gallery).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    All,
    OnlyVisible,
}

impl Visibility {
    #[must_use]
    pub const fn only_visible(self) -> bool {
        matches!(self, Self::OnlyVisible)
    }
}

/// What the album view currently shows, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSnapshot {
    pub album_id: AlbumId,
    pub items: Vec<AlbumItem>,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    /// At least one load succeeded.
    pub loaded: bool,
    /// An optimistic order is shown while its persist call is in flight.
    pub persist_pending: bool,
    /// The last reconcile failed, the list may differ from the server.
    pub needs_resync: bool,
    pub last_error: Option<String>,
}

impl CollectionSnapshot {
    #[must_use]
    pub const fn empty(album_id: AlbumId, page_size: u32) -> Self {
        Self {
            album_id,
            items: Vec::new(),
            page: 0,
            page_size,
            total_pages: 1,
            loaded: false,
            persist_pending: false,
            needs_resync: false,
            last_error: None,
        }
    }

    /// The ordered id list of this page.
    #[must_use]
    pub fn order(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    #[must_use]
    pub fn item(&self, item_id: ItemId) -> Option<&AlbumItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// The image-typed subsequence, in display order.
    pub fn images(&self) -> impl Iterator<Item = &AlbumItem> {
        self.items.iter().filter(|item| item.is_image())
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images().count()
    }

    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.page > 0
    }

    /// Positions increase by exactly one along the display order.
    #[must_use]
    pub fn has_contiguous_positions(&self) -> bool {
        self.items
            .windows(2)
            .all(|pair| pair[0].position.checked_add(1) == Some(pair[1].position))
    }

    /// Rearranges the items to follow `order`. Positions are left untouched,
    /// they only become canonical again after the next load.
    pub(crate) fn apply_order(&mut self, order: &[ItemId]) {
        self.items.sort_by_key(|item| {
            order
                .iter()
                .position(|id| *id == item.id)
                .unwrap_or(usize::MAX)
        });
    }
}
