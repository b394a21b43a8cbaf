use crate::error::SourceError;
use crate::tmdb::api;
use crate::traits::MetadataSource;
use crate::types::{PrimaryDetail, VideoEntry};
use async_trait::async_trait;
use media_browse_config::{Config, TMDB_KEY_PLACEHOLDER};
use media_browse_models::{CastMember, Genre, MediaKind, MediaSummary};
use reqwest::Client;
use std::sync::Arc;

/// Client for the TMDB v3 API.
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    language: String,
}

impl TmdbClient {
    /// Build a client. An empty or placeholder key is rejected here so
    /// the failure surfaces before any request goes out.
    pub fn new(api_key: String, language: String) -> Result<Self, SourceError> {
        if api_key.trim().is_empty() || api_key == TMDB_KEY_PLACEHOLDER {
            return Err(SourceError::MissingApiKey);
        }
        Ok(Self {
            client: Arc::new(api::create_client()),
            api_key,
            language,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Self::new(config.tmdb.api_key.clone(), config.tmdb.language.clone())
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    async fn popular(&self, kind: MediaKind, page: u32) -> Result<Vec<MediaSummary>, SourceError> {
        api::fetch_popular(&self.client, &self.api_key, &self.language, kind, page).await
    }

    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
    ) -> Result<Vec<MediaSummary>, SourceError> {
        api::search_titles(&self.client, &self.api_key, &self.language, kind, query, page).await
    }

    async fn search_multi(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MediaSummary>, SourceError> {
        api::search_all(&self.client, &self.api_key, &self.language, query, page).await
    }

    async fn discover(
        &self,
        kind: MediaKind,
        genre_id: u64,
        page: u32,
    ) -> Result<Vec<MediaSummary>, SourceError> {
        api::discover_by_genre(&self.client, &self.api_key, &self.language, kind, genre_id, page)
            .await
    }

    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, SourceError> {
        api::fetch_genres(&self.client, &self.api_key, &self.language, kind).await
    }

    async fn detail(&self, kind: MediaKind, id: u64) -> Result<PrimaryDetail, SourceError> {
        api::fetch_detail(&self.client, &self.api_key, &self.language, kind, id).await
    }

    async fn credits(&self, kind: MediaKind, id: u64) -> Result<Vec<CastMember>, SourceError> {
        api::fetch_credits(&self.client, &self.api_key, &self.language, kind, id).await
    }

    async fn videos(&self, kind: MediaKind, id: u64) -> Result<Vec<VideoEntry>, SourceError> {
        api::fetch_videos(&self.client, &self.api_key, &self.language, kind, id).await
    }

    async fn similar(&self, kind: MediaKind, id: u64) -> Result<Vec<MediaSummary>, SourceError> {
        api::fetch_similar(&self.client, &self.api_key, &self.language, kind, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_key_is_rejected_before_any_request() {
        let err = TmdbClient::new(TMDB_KEY_PLACEHOLDER.to_string(), "en-US".to_string())
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::MissingApiKey));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = TmdbClient::new("  ".to_string(), "en-US".to_string())
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::MissingApiKey));
    }

    #[test]
    fn real_looking_key_is_accepted() {
        assert!(TmdbClient::new("abcdef0123456789".to_string(), "en-US".to_string()).is_ok());
    }
}
