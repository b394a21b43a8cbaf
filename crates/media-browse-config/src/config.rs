use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder values shipped in the sample config; a key equal to one of
/// these counts as "not configured", exactly like an empty string.
pub const TMDB_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";
pub const OMDB_KEY_PLACEHOLDER: &str = "YOUR_OMDB_API_KEY_HERE";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub omdb: Option<OmdbConfig>,
    #[serde(default)]
    pub browse: BrowseConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TmdbConfig {
    pub api_key: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OmdbConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Quiet window for search-as-you-type, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Rows shown per listing page in the terminal.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_page_size() -> usize {
    20
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_size: default_page_size(),
        }
    }
}

fn key_is_set(key: &str, placeholder: &str) -> bool {
    !key.is_empty() && key != placeholder
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// A starting config with placeholder keys, written by `config init`.
    pub fn sample() -> Self {
        Self {
            tmdb: TmdbConfig {
                api_key: TMDB_KEY_PLACEHOLDER.to_string(),
                language: default_language(),
            },
            omdb: Some(OmdbConfig {
                api_key: OMDB_KEY_PLACEHOLDER.to_string(),
            }),
            browse: BrowseConfig::default(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_tmdb_configured() {
            return Err(anyhow::anyhow!(
                "TMDB API key is not configured. Set [tmdb] api_key in the config file."
            ));
        }
        if self.browse.debounce_ms == 0 {
            return Err(anyhow::anyhow!("browse.debounce_ms must be greater than zero"));
        }
        if self.browse.page_size == 0 {
            return Err(anyhow::anyhow!("browse.page_size must be greater than zero"));
        }
        Ok(())
    }

    pub fn is_tmdb_configured(&self) -> bool {
        key_is_set(&self.tmdb.api_key, TMDB_KEY_PLACEHOLDER)
    }

    /// The ratings source is strictly optional: a missing section, an empty
    /// key, or the shipped placeholder all mean "skip it".
    pub fn is_omdb_configured(&self) -> bool {
        self.omdb
            .as_ref()
            .map(|omdb| key_is_set(&omdb.api_key, OMDB_KEY_PLACEHOLDER))
            .unwrap_or(false)
    }

    pub fn omdb_api_key(&self) -> Option<&str> {
        if self.is_omdb_configured() {
            self.omdb.as_ref().map(|omdb| omdb.api_key.as_str())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn config_with_keys(tmdb_key: &str, omdb_key: Option<&str>) -> Config {
        Config {
            tmdb: TmdbConfig {
                api_key: tmdb_key.to_string(),
                language: default_language(),
            },
            omdb: omdb_key.map(|key| OmdbConfig {
                api_key: key.to_string(),
            }),
            browse: BrowseConfig::default(),
        }
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let config = config_with_keys("real_tmdb_key", Some("real_omdb_key"));
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.tmdb.api_key, "real_tmdb_key");
        assert_eq!(loaded.tmdb.language, "en-US");
        assert_eq!(loaded.omdb.as_ref().unwrap().api_key, "real_omdb_key");
        assert_eq!(loaded.browse.debounce_ms, 500);
    }

    #[test]
    fn test_validate_rejects_placeholder_key() {
        let config = config_with_keys(TMDB_KEY_PLACEHOLDER, None);
        assert!(config.validate().is_err());
        assert!(!config.is_tmdb_configured());

        let config = config_with_keys("", None);
        assert!(config.validate().is_err());

        let config = config_with_keys("real_key", None);
        assert!(config.validate().is_ok());
        assert!(config.is_tmdb_configured());
    }

    #[test]
    fn test_omdb_is_optional() {
        let config = config_with_keys("real_key", None);
        assert!(config.validate().is_ok());
        assert!(!config.is_omdb_configured());
        assert_eq!(config.omdb_api_key(), None);

        let config = config_with_keys("real_key", Some(OMDB_KEY_PLACEHOLDER));
        assert!(config.validate().is_ok());
        assert!(!config.is_omdb_configured());

        let config = config_with_keys("real_key", Some("omdb_key"));
        assert!(config.is_omdb_configured());
        assert_eq!(config.omdb_api_key(), Some("omdb_key"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let parsed: Config = toml::from_str("[tmdb]\napi_key = \"k\"\n").unwrap();
        assert_eq!(parsed.tmdb.language, "en-US");
        assert!(parsed.omdb.is_none());
        assert_eq!(parsed.browse.page_size, 20);
    }
}
