use super::MediaAssetFilterIndex;
use crate::gateway::MediaLibrarySource;
use crate::timers::Debouncer;
use common_types::{FilterCriteria, MediaAsset, MediaTypeFilter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Identifies one open..close cycle of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickerState {
    pub session: Option<SessionId>,
    pub is_open: bool,
    pub status: FetchStatus,
    /// Criteria the results were computed with.
    pub criteria: FilterCriteria,
    /// What the search box shows, ahead of the debounced `criteria.query`.
    pub pending_query: String,
    pub results: Vec<MediaAsset>,
    pub selection: Option<MediaAsset>,
    /// Bumped on every recompute of `results`.
    pub revision: u64,
    library: Vec<MediaAsset>,
}

impl PickerState {
    /// Size of the last library snapshot that was fetched successfully.
    #[must_use]
    pub fn library_len(&self) -> usize {
        self.library.len()
    }

    fn recompute(&mut self) {
        self.results = if self.status == FetchStatus::Ready {
            MediaAssetFilterIndex::filter(&self.library, &self.criteria)
        } else {
            Vec::new()
        };
        self.revision += 1;
    }
}

/// Returned by [`MediaPicker::open`], cancels that session's fetch.
#[derive(Debug, Clone)]
pub struct FetchHandle {
    session: SessionId,
    token: CancellationToken,
}

impl FetchHandle {
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Selected(MediaAsset),
    Dismissed,
}

/// Lets the user pick one asset out of the media library.
///
/// Each `open` fetches the library exactly once. Opening again supersedes the
/// previous session: its fetch is cancelled and a late response is dropped.
pub struct MediaPicker<S: ?Sized> {
    source: Arc<S>,
    state: Arc<watch::Sender<PickerState>>,
    active: Option<FetchHandle>,
    search: Debouncer<(SessionId, String)>,
    default_media_type: MediaTypeFilter,
    next_session: u64,
}

impl<S: MediaLibrarySource + ?Sized + 'static> MediaPicker<S> {
    pub fn new(source: Arc<S>, search_debounce: Duration, default_media_type: MediaTypeFilter) -> Self {
        let (state, _) = watch::channel(PickerState::default());
        let state = Arc::new(state);
        let search = {
            let state = Arc::clone(&state);
            Debouncer::new(search_debounce, move |(session, query): (SessionId, String)| {
                state.send_if_modified(|picker| {
                    if picker.session != Some(session) {
                        return false;
                    }
                    debug!("Applying search query {query:?}");
                    picker.criteria.query = query;
                    picker.recompute();
                    true
                });
            })
        };
        Self {
            source,
            state,
            active: None,
            search,
            default_media_type,
            next_session: 0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PickerState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PickerState {
        self.state.borrow().clone()
    }

    /// Starts a new session and its single library fetch.
    pub fn open(&mut self) -> FetchHandle {
        self.cancel_active();
        self.search.cancel();

        self.next_session += 1;
        let session = SessionId(self.next_session);
        let handle = FetchHandle {
            session,
            token: CancellationToken::new(),
        };
        let media_type = self.default_media_type;
        self.state.send_modify(|picker| {
            picker.session = Some(session);
            picker.is_open = true;
            picker.status = FetchStatus::Loading;
            picker.criteria = FilterCriteria::new("", media_type);
            picker.pending_query.clear();
            picker.selection = None;
            picker.recompute();
        });
        debug!("Opened picker session {session:?}");

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let token = handle.token.clone();
        tokio::spawn(async move {
            let fetched = tokio::select! {
                () = token.cancelled() => {
                    debug!("Library fetch of {session:?} cancelled");
                    return;
                }
                fetched = source.fetch_media_library() => fetched,
            };
            state.send_if_modified(|picker| {
                if token.is_cancelled() || picker.session != Some(session) {
                    debug!("Dropping library response of superseded {session:?}");
                    return false;
                }
                match fetched {
                    Ok(library) => {
                        debug!("Fetched {} library assets", library.len());
                        picker.library = library;
                        picker.status = FetchStatus::Ready;
                    }
                    Err(err) => {
                        warn!("Fetching the media library failed: {err}");
                        picker.status = FetchStatus::Failed(err.to_string());
                    }
                }
                picker.recompute();
                true
            });
        });

        self.active = Some(handle.clone());
        handle
    }

    /// Cancels the fetch behind `handle`. The session stays open without results.
    pub fn cancel(&mut self, handle: &FetchHandle) {
        handle.token.cancel();
        self.state.send_if_modified(|picker| {
            if picker.session != Some(handle.session) || picker.status != FetchStatus::Loading {
                return false;
            }
            picker.status = FetchStatus::Idle;
            picker.recompute();
            true
        });
    }

    /// Echoes `query` right away, the results follow once typing pauses.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        let Some(session) = self.state.borrow().session else {
            return;
        };
        self.state.send_modify(|picker| picker.pending_query.clone_from(&query));
        self.search.push((session, query));
    }

    pub fn set_media_type(&mut self, media_type: MediaTypeFilter) {
        self.state.send_if_modified(|picker| {
            if !picker.is_open {
                return false;
            }
            picker.criteria.media_type = media_type;
            picker.recompute();
            true
        });
    }

    /// Picks `asset` and ends the session, there is no confirm step.
    pub fn select(&mut self, asset: MediaAsset) -> PickerOutcome {
        self.end_session(Some(asset.clone()));
        PickerOutcome::Selected(asset)
    }

    pub fn close(&mut self) -> PickerOutcome {
        self.end_session(None);
        PickerOutcome::Dismissed
    }

    fn end_session(&mut self, selection: Option<MediaAsset>) {
        self.cancel_active();
        self.search.cancel();
        self.state.send_modify(|picker| {
            picker.session = None;
            picker.is_open = false;
            if picker.status == FetchStatus::Loading {
                picker.status = FetchStatus::Idle;
            }
            if selection.is_some() {
                picker.selection = selection;
            }
        });
    }

    fn cancel_active(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.token.cancel();
        }
    }
}

impl<S: ?Sized> Drop for MediaPicker<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::testing::{FakeGallery, asset};
    use tokio::time::sleep;

    fn library() -> Vec<MediaAsset> {
        vec![
            asset(1, "IMG_001.PNG", "image/png"),
            asset(2, "stage.jpg", "image/jpeg"),
            asset(3, "opening.mp4", "video/mp4"),
            asset(4, "minutes.pdf", "application/pdf"),
        ]
    }

    fn picker(gallery: FakeGallery) -> (Arc<FakeGallery>, MediaPicker<FakeGallery>) {
        let gallery = Arc::new(gallery);
        let picker = MediaPicker::new(
            Arc::clone(&gallery),
            Duration::from_millis(250),
            MediaTypeFilter::Image,
        );
        (gallery, picker)
    }

    fn result_ids(state: &PickerState) -> Vec<i64> {
        state.results.iter().map(|asset| asset.id.0).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn open_fetches_once_and_starts_on_images() {
        let (gallery, mut picker) = picker(FakeGallery::with_library(library()));

        picker.open();
        assert_eq!(picker.state().status, FetchStatus::Loading);
        sleep(Duration::from_millis(1)).await;

        let state = picker.state();
        assert_eq!(state.status, FetchStatus::Ready);
        assert_eq!(state.criteria.media_type, MediaTypeFilter::Image);
        assert_eq!(result_ids(&state), vec![1, 2]);
        assert_eq!(gallery.library_fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reopening_drops_the_superseded_response() {
        let (gallery, mut picker) = picker(FakeGallery::default());
        gallery.script_library(Duration::from_millis(500), Ok(vec![asset(1, "old.png", "image/png")]));
        gallery.script_library(Duration::from_millis(100), Ok(vec![asset(2, "new.png", "image/png")]));

        let first = picker.open();
        sleep(Duration::from_millis(10)).await;
        let second = picker.open();
        sleep(Duration::from_secs(1)).await;

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        let state = picker.state();
        assert_eq!(state.session, Some(second.session()));
        assert_eq!(result_ids(&state), vec![2]);
        assert_eq!(gallery.library_fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_after_close_is_ignored() {
        let (gallery, mut picker) = picker(FakeGallery::default());
        gallery.script_library(Duration::from_millis(200), Ok(library()));

        picker.open();
        assert_eq!(picker.close(), PickerOutcome::Dismissed);
        sleep(Duration::from_secs(1)).await;

        let state = picker.state();
        assert!(!state.is_open);
        assert_eq!(state.status, FetchStatus::Idle);
        assert!(state.results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_cancel_leaves_the_session_without_results() {
        let (gallery, mut picker) = picker(FakeGallery::default());
        gallery.script_library(Duration::from_millis(200), Ok(library()));

        let handle = picker.open();
        picker.cancel(&handle);
        sleep(Duration::from_secs(1)).await;

        let state = picker.state();
        assert!(state.is_open);
        assert_eq!(state.status, FetchStatus::Idle);
        assert!(state.results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_recomputes_once_with_the_last_query() {
        let (_, mut picker) = picker(FakeGallery::with_library(library()));
        picker.open();
        sleep(Duration::from_millis(1)).await;
        let revision = picker.state().revision;

        picker.set_query("s");
        sleep(Duration::from_millis(50)).await;
        picker.set_query("st");
        sleep(Duration::from_millis(50)).await;
        picker.set_query("sta");

        let typing = picker.state();
        assert_eq!(typing.pending_query, "sta");
        assert_eq!(typing.criteria.query, "");
        assert_eq!(typing.revision, revision);

        sleep(Duration::from_millis(300)).await;
        let settled = picker.state();
        assert_eq!(settled.criteria.query, "sta");
        assert_eq!(settled.revision, revision + 1);
        assert_eq!(result_ids(&settled), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn media_type_applies_immediately() {
        let (_, mut picker) = picker(FakeGallery::with_library(library()));
        picker.open();
        sleep(Duration::from_millis(1)).await;
        let revision = picker.state().revision;

        picker.set_media_type(MediaTypeFilter::All);

        let state = picker.state();
        assert_eq!(state.revision, revision + 1);
        assert_eq!(result_ids(&state), vec![1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_shows_no_results() {
        let (gallery, mut picker) = picker(FakeGallery::with_library(library()));
        picker.open();
        sleep(Duration::from_millis(1)).await;
        gallery.script_library(
            Duration::ZERO,
            Err(GatewayError::NetworkFailure("connection reset".to_string())),
        );

        picker.open();
        sleep(Duration::from_millis(1)).await;

        let state = picker.state();
        assert!(matches!(state.status, FetchStatus::Failed(_)));
        assert!(state.results.is_empty());
        assert_eq!(state.library_len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_closes_and_drops_the_pending_query() {
        let (_, mut picker) = picker(FakeGallery::with_library(library()));
        picker.open();
        sleep(Duration::from_millis(1)).await;

        picker.set_query("minutes");
        let chosen = asset(2, "stage.jpg", "image/jpeg");
        let outcome = picker.select(chosen.clone());
        sleep(Duration::from_secs(1)).await;

        assert_eq!(outcome, PickerOutcome::Selected(chosen.clone()));
        let state = picker.state();
        assert!(!state.is_open);
        assert_eq!(state.selection, Some(chosen));
        assert_eq!(state.criteria.query, "");
    }
}
