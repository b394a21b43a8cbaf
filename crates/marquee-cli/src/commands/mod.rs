pub mod browse;
pub mod clear;
pub mod config;
pub mod details;
pub mod discover;
pub mod genres;
pub mod listing;
pub mod prompts;
pub mod theme;
pub mod watchlist;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_browse_config::{Config, PathManager, StateStore};
use media_browse_core::DetailAggregator;
use media_browse_sources::{MetadataSource, OmdbClient, RatingsSource, TmdbClient};
use std::sync::Arc;

/// Load the config file, pointing at `config init` when it is missing.
pub fn load_config() -> Result<Config> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    if !config_file.exists() {
        return Err(eyre!(
            "Configuration file not found at: {}. Run 'marquee config init' to create one.",
            config_file.display()
        ));
    }
    let config = Config::load_from_file(&config_file).map_err(|e| {
        eyre!(
            "Failed to load config from {}: {}",
            config_file.display(),
            e
        )
    })?;
    Ok(config)
}

/// The metadata client every network command starts from. Fails up front
/// when no usable API key is configured.
pub fn metadata_source(config: &Config) -> Result<TmdbClient> {
    Ok(TmdbClient::from_config(config)?)
}

/// The optional ratings client; `None` whenever no usable OMDB key is
/// configured.
pub fn ratings_source(config: &Config) -> Option<Arc<dyn RatingsSource>> {
    config
        .omdb_api_key()
        .map(|key| Arc::new(OmdbClient::new(key.to_string())) as Arc<dyn RatingsSource>)
}

pub fn build_aggregator(config: &Config) -> Result<DetailAggregator> {
    let metadata = metadata_source(config)?;
    Ok(DetailAggregator::new(
        Arc::new(metadata) as Arc<dyn MetadataSource>,
        ratings_source(config),
    ))
}

/// Open the persisted state file (theme and watchlist). A missing file
/// is an empty store; nothing is created on disk until a save.
pub fn open_state() -> Result<StateStore> {
    let path_manager = PathManager::default();
    let state_file = path_manager.state_file();
    let mut store = StateStore::new(state_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load state from {}: {}", state_file.display(), e))?;
    Ok(store)
}
