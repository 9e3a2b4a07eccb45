use super::SlideshowState;
use crate::album_items::CollectionSnapshot;
use crate::timers::IntervalTimer;
use common_types::AlbumItem;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideshowKey {
    Left,
    Right,
    Escape,
}

/// Modal viewer over the images of an album view.
///
/// Reads the items straight from the collection controller's channel and
/// follows it when images disappear, without waiting for further input.
pub struct SlideshowController {
    source: watch::Receiver<CollectionSnapshot>,
    state: Arc<watch::Sender<SlideshowState>>,
    autoplay: Option<IntervalTimer>,
    interval: Duration,
    watcher: JoinHandle<()>,
}

impl SlideshowController {
    /// Must be called within a tokio runtime.
    pub fn new(source: watch::Receiver<CollectionSnapshot>, interval: Duration) -> Self {
        let state = Arc::new(watch::channel(SlideshowState::default()).0);
        let watcher = tokio::spawn(follow_source(source.clone(), Arc::clone(&state)));
        Self {
            source,
            state,
            autoplay: None,
            interval,
            watcher,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SlideshowState> {
        self.state.subscribe()
    }

    /// The current state, checked against the images the source holds now.
    pub fn state(&self) -> SlideshowState {
        reconcile_with(&self.state, self.image_count());
        *self.state.borrow()
    }

    pub fn is_autoplaying(&self) -> bool {
        let state = self.state();
        state.is_open
            && state.autoplay_enabled
            && self.autoplay.as_ref().is_some_and(IntervalTimer::is_running)
    }

    /// The image shown at the current index.
    pub fn current_item(&self) -> Option<AlbumItem> {
        let state = self.state();
        if !state.is_open {
            return None;
        }
        self.source.borrow().images().nth(state.index).cloned()
    }

    pub fn open(&mut self, start: usize) {
        let len = self.image_count();
        self.state.send_modify(|state| state.open(len, start));
        if len == 0 {
            debug!("No images to show, slideshow stays closed");
        }
        self.sync_autoplay();
    }

    pub fn next(&mut self) {
        let len = self.image_count();
        self.state.send_modify(|state| state.next(len));
        self.sync_autoplay();
    }

    pub fn prev(&mut self) {
        let len = self.image_count();
        self.state.send_modify(|state| state.prev(len));
        self.sync_autoplay();
    }

    /// Closes the viewer and stops autoplay. Closing twice is harmless.
    pub fn close(&mut self) {
        self.autoplay = None;
        self.state.send_if_modified(|state| {
            let was_open = state.is_open || state.autoplay_enabled;
            state.close();
            was_open
        });
    }

    /// Starts or stops advancing every `interval`. Ignored while closed.
    pub fn toggle_autoplay(&mut self, enabled: bool) {
        self.reconcile();
        if !enabled {
            self.autoplay = None;
            self.state
                .send_if_modified(|state| std::mem::replace(&mut state.autoplay_enabled, false));
            return;
        }
        if !self.state.borrow().is_open {
            debug!("Autoplay requested while the slideshow is closed");
            return;
        }
        if self.is_autoplaying() {
            return;
        }

        self.state.send_modify(|state| state.autoplay_enabled = true);
        let source = self.source.clone();
        let state = Arc::clone(&self.state);
        self.autoplay = Some(IntervalTimer::start(self.interval, move || {
            let len = source.borrow().image_count();
            let mut still_open = false;
            state.send_modify(|state| {
                state.next(len);
                still_open = state.is_open;
            });
            if still_open {
                ControlFlow::Continue(())
            } else {
                debug!("Slideshow emptied, autoplay stopped");
                ControlFlow::Break(())
            }
        }));
    }

    /// Arrow keys navigate and escape closes. Returns whether the key was used.
    pub fn handle_key(&mut self, key: SlideshowKey) -> bool {
        self.reconcile();
        if !self.state.borrow().is_open {
            return false;
        }
        match key {
            SlideshowKey::Left => self.prev(),
            SlideshowKey::Right => self.next(),
            SlideshowKey::Escape => self.close(),
        }
        true
    }

    fn image_count(&self) -> usize {
        self.source.borrow().image_count()
    }

    fn reconcile(&mut self) {
        reconcile_with(&self.state, self.image_count());
        self.sync_autoplay();
    }

    fn sync_autoplay(&mut self) {
        let state = self.state();
        if !(state.is_open && state.autoplay_enabled) {
            self.autoplay = None;
        }
    }
}

impl Drop for SlideshowController {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

/// Publishes only when the state actually moved.
fn reconcile_with(state: &watch::Sender<SlideshowState>, len: usize) -> bool {
    state.send_if_modified(|state| {
        let before = *state;
        state.reconcile(len);
        *state != before
    })
}

async fn follow_source(
    mut source: watch::Receiver<CollectionSnapshot>,
    state: Arc<watch::Sender<SlideshowState>>,
) {
    while source.changed().await.is_ok() {
        let len = source.borrow_and_update().image_count();
        if reconcile_with(&state, len) && len == 0 {
            debug!("Album has no images left, slideshow closed");
        }
    }
}
