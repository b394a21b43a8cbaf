use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Collapses a burst of inputs into the last one. Each `settle` call
/// supersedes the previous; only the call that is still newest when the
/// quiet window runs out returns its value.
///
/// This is the search-as-you-type throttle: keystrokes call `settle`
/// with the current query, and at most one query per burst reaches the
/// network.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait out the quiet window. Returns `Some(value)` only if no newer
    /// call arrived while waiting.
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.window).await;
        if self.generation.load(Ordering::SeqCst) == generation {
            Some(value)
        } else {
            None
        }
    }

    /// Drop whatever is currently waiting without submitting a
    /// replacement, for when the input is cleared outright.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
