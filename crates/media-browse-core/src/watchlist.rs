use anyhow::Result;
use media_browse_config::StateStore;
use media_browse_models::{MediaKind, WatchlistEntry};
use tracing::warn;

/// The saved watchlist: an ordered set of `(id, kind)` pairs, persisted
/// as one JSON document under a fixed key in the state store. Every
/// mutation re-serializes the whole list and writes it through.
pub struct Watchlist {
    store: StateStore,
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    /// Wrap a loaded state store. A missing document starts the list
    /// empty; a corrupt one does too, with a warning rather than an
    /// error, since refusing to start over a bad cache of ids helps
    /// nobody.
    pub fn load(store: StateStore) -> Self {
        let entries = match store.watchlist_json() {
            Some(json) => parse_entries(json),
            None => Vec::new(),
        };
        Self { store, entries }
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    /// The backing store. The theme is co-persisted in the same file, so
    /// a session mutating both must write through one handle or lose
    /// updates.
    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u64, kind: MediaKind) -> bool {
        self.entries.contains(&WatchlistEntry::new(id, kind))
    }

    /// Add a title if absent. Returns whether the list changed; the
    /// store is only written when it did.
    pub fn add(&mut self, id: u64, kind: MediaKind) -> Result<bool> {
        let entry = WatchlistEntry::new(id, kind);
        if self.entries.contains(&entry) {
            return Ok(false);
        }
        self.entries.push(entry);
        self.save()?;
        Ok(true)
    }

    /// Remove a title if present. Returns whether the list changed.
    pub fn remove(&mut self, id: u64, kind: MediaKind) -> Result<bool> {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !(entry.id == id && entry.kind == kind));
        if self.entries.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Flip membership for a title. Returns whether it is present
    /// afterwards.
    pub fn toggle(&mut self, id: u64, kind: MediaKind) -> Result<bool> {
        if self.contains(id, kind) {
            self.remove(id, kind)?;
            Ok(false)
        } else {
            self.add(id, kind)?;
            Ok(true)
        }
    }

    fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.store.set_watchlist_json(json);
        self.store.save()
    }
}

fn parse_entries(json: &str) -> Vec<WatchlistEntry> {
    match serde_json::from_str(json) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Saved watchlist did not parse, starting empty: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(path: std::path::PathBuf) -> StateStore {
        let mut store = StateStore::new(path);
        store.load().unwrap();
        store
    }

    #[test]
    fn add_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut watchlist = Watchlist::load(store_at(dir.path().join("state.toml")));

        assert!(watchlist.add(603, MediaKind::Movie).unwrap());
        assert!(!watchlist.add(603, MediaKind::Movie).unwrap());
        assert_eq!(watchlist.len(), 1);
    }

    #[test]
    fn same_id_different_kind_are_distinct() {
        let dir = tempdir().unwrap();
        let mut watchlist = Watchlist::load(store_at(dir.path().join("state.toml")));

        assert!(watchlist.add(100, MediaKind::Movie).unwrap());
        assert!(watchlist.add(100, MediaKind::Tv).unwrap());
        assert_eq!(watchlist.len(), 2);
    }

    #[test]
    fn entries_survive_a_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");

        let mut watchlist = Watchlist::load(store_at(path.clone()));
        watchlist.add(603, MediaKind::Movie).unwrap();
        watchlist.add(1396, MediaKind::Tv).unwrap();
        drop(watchlist);

        let reloaded = Watchlist::load(store_at(path));
        assert_eq!(
            reloaded.entries(),
            &[
                WatchlistEntry::new(603, MediaKind::Movie),
                WatchlistEntry::new(1396, MediaKind::Tv),
            ]
        );
    }

    #[test]
    fn removing_an_absent_entry_changes_nothing() {
        let dir = tempdir().unwrap();
        let mut watchlist = Watchlist::load(store_at(dir.path().join("state.toml")));

        watchlist.add(603, MediaKind::Movie).unwrap();
        assert!(!watchlist.remove(604, MediaKind::Movie).unwrap());
        assert!(!watchlist.remove(603, MediaKind::Tv).unwrap());
        assert_eq!(watchlist.len(), 1);
        assert!(watchlist.remove(603, MediaKind::Movie).unwrap());
        assert!(watchlist.is_empty());
    }

    #[test]
    fn toggle_reports_membership_after_the_flip() {
        let dir = tempdir().unwrap();
        let mut watchlist = Watchlist::load(store_at(dir.path().join("state.toml")));

        assert!(watchlist.toggle(603, MediaKind::Movie).unwrap());
        assert!(watchlist.contains(603, MediaKind::Movie));
        assert!(!watchlist.toggle(603, MediaKind::Movie).unwrap());
        assert!(watchlist.is_empty());
    }

    #[test]
    fn corrupt_document_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");

        let mut store = store_at(path.clone());
        store.set_watchlist_json("not json at all".to_string());
        store.save().unwrap();

        let mut watchlist = Watchlist::load(store_at(path.clone()));
        assert!(watchlist.is_empty());

        // The next mutation writes a clean document over the bad one.
        watchlist.add(603, MediaKind::Movie).unwrap();
        let reloaded = Watchlist::load(store_at(path));
        assert_eq!(reloaded.len(), 1);
    }
}
