use std::time::{Duration, Instant};

/// Collapses bursts of resize events into one, delivered once the burst has been quiet for
/// `window`.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T: Copy> ResizeDebouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Records a resize; the latest value wins and the quiet period restarts.
    pub fn observe(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, due)| due)
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((value, due)) if now >= due => {
                self.pending = None;
                Some(value)
            }
            _ => None,
        }
    }
}
