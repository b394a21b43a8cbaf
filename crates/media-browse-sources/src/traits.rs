use async_trait::async_trait;
use media_browse_models::{CastMember, ExternalRatings, Genre, MediaKind, MediaSummary};

use crate::error::SourceError;
use crate::types::{PrimaryDetail, VideoEntry};

/// The primary metadata provider: listings, search, and per-title
/// lookups.
///
/// Implemented by [`crate::tmdb::TmdbClient`]. The browse layer only
/// talks to this trait, so tests can substitute a canned source.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Popular titles of one kind, most popular first.
    async fn popular(&self, kind: MediaKind, page: u32) -> Result<Vec<MediaSummary>, SourceError>;

    /// Title search within one kind.
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
    ) -> Result<Vec<MediaSummary>, SourceError>;

    /// Search across movies and TV in a single call. Results that are
    /// neither (people, collections) are dropped.
    async fn search_multi(&self, query: &str, page: u32)
        -> Result<Vec<MediaSummary>, SourceError>;

    /// Titles of one kind tagged with the given genre.
    async fn discover(
        &self,
        kind: MediaKind,
        genre_id: u64,
        page: u32,
    ) -> Result<Vec<MediaSummary>, SourceError>;

    /// The genre list for one kind.
    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, SourceError>;

    /// Full detail record for one title.
    async fn detail(&self, kind: MediaKind, id: u64) -> Result<PrimaryDetail, SourceError>;

    /// Billed cast in billing order.
    async fn credits(&self, kind: MediaKind, id: u64) -> Result<Vec<CastMember>, SourceError>;

    /// Published videos for one title, in the source's own order.
    async fn videos(&self, kind: MediaKind, id: u64) -> Result<Vec<VideoEntry>, SourceError>;

    /// Titles similar to the given one.
    async fn similar(&self, kind: MediaKind, id: u64) -> Result<Vec<MediaSummary>, SourceError>;
}

/// Best-effort provider of third-party ratings, keyed by IMDb id.
#[async_trait]
pub trait RatingsSource: Send + Sync {
    /// Ratings for one title, or `None` when the lookup fails for any
    /// reason. This source never raises an error; a missing block is a
    /// normal outcome for the detail view.
    async fn ratings(&self, imdb_id: &str) -> Option<ExternalRatings>;
}
