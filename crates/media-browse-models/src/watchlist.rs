use crate::media::MediaKind;
use serde::{Deserialize, Serialize};

/// One saved watchlist item. The store keeps the bare `(id, kind)` pair;
/// titles and posters are looked up at display time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WatchlistEntry {
    pub id: u64,
    pub kind: MediaKind,
}

impl WatchlistEntry {
    pub fn new(id: u64, kind: MediaKind) -> Self {
        Self { id, kind }
    }
}
