use anyhow::Result;
use media_browse_models::Theme;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use toml;

/// Fixed keys of the persisted state file. There is no schema versioning;
/// unknown keys are carried through untouched.
const THEME_KEY: &str = "theme";
const WATCHLIST_KEY: &str = "watchlist";

#[derive(Debug, Serialize, Deserialize, Default)]
struct StateData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Flat string key/value store backed by a single TOML file, holding the
/// small bits of state that outlive a session (theme, watchlist). Values
/// are opaque strings; callers own the encoding.
pub struct StateStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            values: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let state: StateData = toml::from_str(&content)?;
            self.values = state.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let state = StateData {
            data: self.values.clone(),
        };
        let content = toml::to_string_pretty(&state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    // Typed accessors for the fixed keys

    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY)
            .map(|value| Theme::from_stored(value))
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.set(THEME_KEY.to_string(), theme.as_str().to_string());
    }

    pub fn watchlist_json(&self) -> Option<&String> {
        self.get(WATCHLIST_KEY)
    }

    pub fn set_watchlist_json(&mut self, json: String) {
        self.set(WATCHLIST_KEY.to_string(), json);
    }

    pub fn reset_theme(&mut self) {
        self.remove(THEME_KEY);
    }

    pub fn clear_watchlist(&mut self) {
        self.remove(WATCHLIST_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_state_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = StateStore::new(path.clone());
        store.set_theme(Theme::Dark);
        store.set_watchlist_json("[{\"id\":603,\"kind\":\"movie\"}]".to_string());
        store.save().unwrap();

        let mut loaded = StateStore::new(path);
        loaded.load().unwrap();
        assert_eq!(loaded.theme(), Theme::Dark);
        assert_eq!(
            loaded.watchlist_json(),
            Some(&"[{\"id\":603,\"kind\":\"movie\"}]".to_string())
        );
    }

    #[test]
    fn test_theme_defaults_to_light() {
        let store = StateStore::new(PathBuf::from("/tmp/does-not-exist"));
        assert_eq!(store.theme(), Theme::Light);

        let mut store = StateStore::new(PathBuf::from("/tmp/does-not-exist"));
        store.set(THEME_KEY.to_string(), "something-else".to_string());
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = StateStore::new(path.clone());
        store.set("future_key".to_string(), "kept".to_string());
        store.set_theme(Theme::Dark);
        store.save().unwrap();

        let mut loaded = StateStore::new(path);
        loaded.load().unwrap();
        assert_eq!(loaded.get("future_key"), Some(&"kept".to_string()));
    }

    #[test]
    fn test_clearing_fixed_keys_leaves_others() {
        let mut store = StateStore::new(PathBuf::from("/tmp/unused"));
        store.set_theme(Theme::Dark);
        store.set_watchlist_json("[]".to_string());
        store.set("other".to_string(), "kept".to_string());

        store.reset_theme();
        store.clear_watchlist();

        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(store.watchlist_json(), None);
        assert_eq!(store.get("other"), Some(&"kept".to_string()));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = StateStore::new(dir.path().join("state.toml"));
        store.load().unwrap();
        assert_eq!(store.watchlist_json(), None);
        assert_eq!(store.theme(), Theme::Light);
    }
}
