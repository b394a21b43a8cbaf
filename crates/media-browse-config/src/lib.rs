pub mod config;
pub mod paths;
pub mod state;

pub use config::{BrowseConfig, Config, OmdbConfig, TmdbConfig, OMDB_KEY_PLACEHOLDER, TMDB_KEY_PLACEHOLDER};
pub use paths::{container_base_path, PathManager};
pub use state::StateStore;
