/// Position of the viewer within the image subsequence of an album.
///
/// Pure transitions; the caller passes the current number of images each time.
/// Invariant: when `is_open`, `index < len` of the sequence it was last given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideshowState {
    pub is_open: bool,
    pub index: usize,
    pub autoplay_enabled: bool,
}

impl SlideshowState {
    /// Opens at `start`, clamped to the last image. Stays closed when there is nothing to show.
    pub fn open(&mut self, len: usize, start: usize) {
        if len == 0 {
            self.close();
            return;
        }
        self.is_open = true;
        self.index = start.min(len - 1);
    }

    pub fn next(&mut self, len: usize) {
        self.reconcile(len);
        if self.is_open {
            self.index = (self.index + 1) % len;
        }
    }

    pub fn prev(&mut self, len: usize) {
        self.reconcile(len);
        if self.is_open {
            self.index = (self.index + len - 1) % len;
        }
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Follows the sequence shrinking underneath an open viewer.
    pub fn reconcile(&mut self, len: usize) {
        if !self.is_open {
            return;
        }
        if len == 0 {
            self.close();
        } else if self.index >= len {
            self.index = len - 1;
        }
    }
}
