use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hands out tickets for detail requests and remembers which one is
/// current. Starting a new request retires every ticket issued before
/// it, so a slow response can never overwrite a fast one that the user
/// asked for later.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generation: Arc<AtomicU64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, retiring all earlier tickets.
    pub fn begin(&self) -> RequestTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            current: Arc::clone(&self.generation),
            generation,
        }
    }

    /// Retire the current ticket without starting a new request. This is
    /// the close path: whatever is still in flight must not render.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// A claim on "the detail view shows this request's result", checked
/// after every await in the aggregation.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    current: Arc<AtomicU64>,
    generation: u64,
}

impl RequestTicket {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ticket_is_current() {
        let tracker = RequestTracker::new();
        let ticket = tracker.begin();
        assert!(ticket.is_current());
    }

    #[test]
    fn newer_request_retires_older_tickets() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn invalidate_retires_without_replacement() {
        let tracker = RequestTracker::new();
        let ticket = tracker.begin();
        tracker.invalidate();
        assert!(!ticket.is_current());
    }

    #[test]
    fn clones_share_the_generation() {
        let tracker = RequestTracker::new();
        let ticket = tracker.begin();
        let other_handle = tracker.clone();
        other_handle.begin();
        assert!(!ticket.is_current());
    }
}
