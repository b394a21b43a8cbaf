use crate::omdb::api;
use crate::traits::RatingsSource;
use async_trait::async_trait;
use media_browse_models::ExternalRatings;
use reqwest::Client;
use std::sync::Arc;

/// Client for the OMDB API, the secondary ratings source.
#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    api_key: String,
}

impl OmdbClient {
    /// The caller decides whether a usable key exists; an unconfigured
    /// OMDB source is represented by not constructing a client at all.
    pub fn new(api_key: String) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
        }
    }
}

#[async_trait]
impl RatingsSource for OmdbClient {
    async fn ratings(&self, imdb_id: &str) -> Option<ExternalRatings> {
        api::fetch_ratings(&self.client, &self.api_key, imdb_id).await
    }
}
