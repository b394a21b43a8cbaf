use chrono::NaiveDate;
use media_browse_models::{CastMember, Genre, MediaKind, MediaSummary};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::types::{PrimaryDetail, VideoEntry};

// TMDB v3 API base URL
const API_BASE: &str = "https://api.themoviedb.org/3";

/// Create a reqwest Client carrying this crate's user agent.
pub fn create_client() -> Client {
    Client::builder()
        .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Deserialize)]
struct PagedResults {
    #[serde(default)]
    results: Vec<ListedTitle>,
}

/// One row of a listing response. Movies carry `title`/`release_date`,
/// TV carries `name`/`first_air_date`; multi-search rows also carry
/// `media_type`.
#[derive(Debug, Deserialize)]
struct ListedTitle {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    media_type: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    overview: String,
}

impl ListedTitle {
    fn into_summary(self, kind: MediaKind) -> MediaSummary {
        let date = self.release_date.as_deref().or(self.first_air_date.as_deref());
        MediaSummary {
            id: self.id,
            kind,
            year: year_of(date),
            title: self.title.or(self.name).unwrap_or_default(),
            poster_path: self.poster_path,
            vote_average: rated(self.vote_average),
            overview: self.overview,
        }
    }

    /// Kind declared by the multi-search endpoint, if it names a
    /// browsable one. People and collections return `None`.
    fn declared_kind(&self) -> Option<MediaKind> {
        match self.media_type.as_deref() {
            Some("movie") => Some(MediaKind::Movie),
            Some("tv") => Some(MediaKind::Tv),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct TitleDetail {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    #[serde(default)]
    overview: String,
    vote_average: Option<f64>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    #[serde(default)]
    genres: Vec<Genre>,
    poster_path: Option<String>,
    // Movies only; TV detail bodies never carry one, which in turn means
    // no external ratings lookup for TV.
    imdb_id: Option<String>,
}

impl TitleDetail {
    fn into_detail(self, kind: MediaKind) -> PrimaryDetail {
        let runtime_minutes = match kind {
            MediaKind::Movie => self.runtime,
            MediaKind::Tv => self.episode_run_time.first().copied(),
        };
        let date = self.release_date.as_deref().or(self.first_air_date.as_deref());
        PrimaryDetail {
            id: self.id,
            kind,
            release_date: date_of(date),
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview,
            vote_average: rated(self.vote_average),
            runtime_minutes: runtime_minutes.filter(|m| *m > 0),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            poster_path: self.poster_path,
            imdb_id: self.imdb_id.filter(|id| !id.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    cast: Vec<CastEntry>,
}

#[derive(Debug, Deserialize)]
struct CastEntry {
    name: String,
    character: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<VideoRecord>,
}

#[derive(Debug, Deserialize)]
struct VideoRecord {
    key: String,
    name: String,
    site: String,
    #[serde(rename = "type")]
    kind: String,
}

/// The API reports unrated titles as 0.0.
fn rated(vote_average: Option<f64>) -> Option<f64> {
    vote_average.filter(|v| *v > 0.0)
}

fn year_of(date: Option<&str>) -> Option<u32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

fn date_of(date: Option<&str>) -> Option<NaiveDate> {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    path: &str,
    params: &[(&str, &str)],
) -> Result<T, SourceError> {
    let url = format!("{}{}", API_BASE, path);
    let response = client.get(&url).query(params).send().await?;
    let status = response.status();
    if !status.is_success() {
        debug!("TMDB request failed: {} {}", status, path);
        return Err(SourceError::from_status(status));
    }
    Ok(response.json::<T>().await?)
}

pub async fn fetch_popular(
    client: &Client,
    api_key: &str,
    language: &str,
    kind: MediaKind,
    page: u32,
) -> Result<Vec<MediaSummary>, SourceError> {
    debug!("Fetching popular {} titles (page {})", kind, page);
    let page = page.to_string();
    let path = format!("/{}/popular", kind.path_segment());
    let body: PagedResults = get_json(
        client,
        &path,
        &[
            ("api_key", api_key),
            ("language", language),
            ("page", page.as_str()),
        ],
    )
    .await?;
    Ok(body
        .results
        .into_iter()
        .map(|title| title.into_summary(kind))
        .collect())
}

pub async fn search_titles(
    client: &Client,
    api_key: &str,
    language: &str,
    kind: MediaKind,
    query: &str,
    page: u32,
) -> Result<Vec<MediaSummary>, SourceError> {
    debug!("Searching {} titles for {:?} (page {})", kind, query, page);
    let page = page.to_string();
    let path = format!("/search/{}", kind.path_segment());
    let body: PagedResults = get_json(
        client,
        &path,
        &[
            ("api_key", api_key),
            ("language", language),
            ("query", query),
            ("page", page.as_str()),
        ],
    )
    .await?;
    Ok(body
        .results
        .into_iter()
        .map(|title| title.into_summary(kind))
        .collect())
}

pub async fn search_all(
    client: &Client,
    api_key: &str,
    language: &str,
    query: &str,
    page: u32,
) -> Result<Vec<MediaSummary>, SourceError> {
    debug!("Searching all titles for {:?} (page {})", query, page);
    let page = page.to_string();
    let body: PagedResults = get_json(
        client,
        "/search/multi",
        &[
            ("api_key", api_key),
            ("language", language),
            ("query", query),
            ("page", page.as_str()),
        ],
    )
    .await?;
    Ok(body
        .results
        .into_iter()
        .filter_map(|title| {
            let kind = title.declared_kind()?;
            Some(title.into_summary(kind))
        })
        .collect())
}

pub async fn discover_by_genre(
    client: &Client,
    api_key: &str,
    language: &str,
    kind: MediaKind,
    genre_id: u64,
    page: u32,
) -> Result<Vec<MediaSummary>, SourceError> {
    debug!("Discovering {} titles in genre {} (page {})", kind, genre_id, page);
    let page = page.to_string();
    let genre = genre_id.to_string();
    let path = format!("/discover/{}", kind.path_segment());
    let body: PagedResults = get_json(
        client,
        &path,
        &[
            ("api_key", api_key),
            ("language", language),
            ("with_genres", genre.as_str()),
            ("page", page.as_str()),
        ],
    )
    .await?;
    Ok(body
        .results
        .into_iter()
        .map(|title| title.into_summary(kind))
        .collect())
}

pub async fn fetch_genres(
    client: &Client,
    api_key: &str,
    language: &str,
    kind: MediaKind,
) -> Result<Vec<Genre>, SourceError> {
    debug!("Fetching {} genre list", kind);
    let path = format!("/genre/{}/list", kind.path_segment());
    let body: GenreList = get_json(
        client,
        &path,
        &[("api_key", api_key), ("language", language)],
    )
    .await?;
    Ok(body.genres)
}

pub async fn fetch_detail(
    client: &Client,
    api_key: &str,
    language: &str,
    kind: MediaKind,
    id: u64,
) -> Result<PrimaryDetail, SourceError> {
    debug!("Fetching {} detail for id {}", kind, id);
    let path = format!("/{}/{}", kind.path_segment(), id);
    let body: TitleDetail = get_json(
        client,
        &path,
        &[("api_key", api_key), ("language", language)],
    )
    .await?;
    Ok(body.into_detail(kind))
}

pub async fn fetch_credits(
    client: &Client,
    api_key: &str,
    language: &str,
    kind: MediaKind,
    id: u64,
) -> Result<Vec<CastMember>, SourceError> {
    debug!("Fetching {} credits for id {}", kind, id);
    let path = format!("/{}/{}/credits", kind.path_segment(), id);
    let body: CreditsResponse = get_json(
        client,
        &path,
        &[("api_key", api_key), ("language", language)],
    )
    .await?;
    Ok(body
        .cast
        .into_iter()
        .map(|entry| CastMember {
            name: entry.name,
            character: entry.character.filter(|c| !c.is_empty()),
        })
        .collect())
}

pub async fn fetch_videos(
    client: &Client,
    api_key: &str,
    language: &str,
    kind: MediaKind,
    id: u64,
) -> Result<Vec<VideoEntry>, SourceError> {
    debug!("Fetching {} videos for id {}", kind, id);
    let path = format!("/{}/{}/videos", kind.path_segment(), id);
    let body: VideoList = get_json(
        client,
        &path,
        &[("api_key", api_key), ("language", language)],
    )
    .await?;
    Ok(body
        .results
        .into_iter()
        .map(|video| VideoEntry {
            key: video.key,
            name: video.name,
            site: video.site,
            kind: video.kind,
        })
        .collect())
}

pub async fn fetch_similar(
    client: &Client,
    api_key: &str,
    language: &str,
    kind: MediaKind,
    id: u64,
) -> Result<Vec<MediaSummary>, SourceError> {
    debug!("Fetching titles similar to {} id {}", kind, id);
    let path = format!("/{}/{}/similar", kind.path_segment(), id);
    let body: PagedResults = get_json(
        client,
        &path,
        &[("api_key", api_key), ("language", language)],
    )
    .await?;
    Ok(body
        .results
        .into_iter()
        .map(|title| title.into_summary(kind))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_row_normalizes_title_and_year() {
        let json = r#"{
            "results": [{
                "id": 603,
                "title": "The Matrix",
                "poster_path": "/abc.jpg",
                "vote_average": 8.2,
                "release_date": "1999-03-30",
                "overview": "A hacker learns the truth."
            }]
        }"#;
        let body: PagedResults = serde_json::from_str(json).unwrap();
        let summary = body.results.into_iter().next().unwrap().into_summary(MediaKind::Movie);
        assert_eq!(summary.id, 603);
        assert_eq!(summary.title, "The Matrix");
        assert_eq!(summary.year, Some(1999));
        assert_eq!(summary.vote_average, Some(8.2));
        assert_eq!(summary.kind, MediaKind::Movie);
    }

    #[test]
    fn tv_row_uses_name_and_first_air_date() {
        let json = r#"{
            "results": [{
                "id": 1396,
                "name": "Breaking Bad",
                "first_air_date": "2008-01-20",
                "vote_average": 8.9,
                "overview": ""
            }]
        }"#;
        let body: PagedResults = serde_json::from_str(json).unwrap();
        let summary = body.results.into_iter().next().unwrap().into_summary(MediaKind::Tv);
        assert_eq!(summary.title, "Breaking Bad");
        assert_eq!(summary.year, Some(2008));
    }

    #[test]
    fn zero_vote_average_reads_as_unrated() {
        let json = r#"{"results": [{"id": 1, "title": "Obscure", "vote_average": 0.0}]}"#;
        let body: PagedResults = serde_json::from_str(json).unwrap();
        let summary = body.results.into_iter().next().unwrap().into_summary(MediaKind::Movie);
        assert_eq!(summary.vote_average, None);
        assert_eq!(summary.year, None);
    }

    #[test]
    fn multi_search_drops_people() {
        let json = r#"{
            "results": [
                {"id": 603, "title": "The Matrix", "media_type": "movie", "release_date": "1999-03-30"},
                {"id": 1396, "name": "Breaking Bad", "media_type": "tv", "first_air_date": "2008-01-20"},
                {"id": 6384, "name": "Keanu Reeves", "media_type": "person"}
            ]
        }"#;
        let body: PagedResults = serde_json::from_str(json).unwrap();
        let summaries: Vec<_> = body
            .results
            .into_iter()
            .filter_map(|title| {
                let kind = title.declared_kind()?;
                Some(title.into_summary(kind))
            })
            .collect();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].kind, MediaKind::Movie);
        assert_eq!(summaries[1].kind, MediaKind::Tv);
    }

    #[test]
    fn movie_detail_keeps_imdb_id_and_runtime() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "overview": "A hacker learns the truth.",
            "vote_average": 8.2,
            "release_date": "1999-03-30",
            "runtime": 136,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "poster_path": "/abc.jpg",
            "imdb_id": "tt0133093"
        }"#;
        let body: TitleDetail = serde_json::from_str(json).unwrap();
        let detail = body.into_detail(MediaKind::Movie);
        assert_eq!(detail.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(detail.runtime_minutes, Some(136));
        assert_eq!(detail.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(
            detail.release_date,
            NaiveDate::from_ymd_opt(1999, 3, 30)
        );
    }

    #[test]
    fn tv_detail_has_no_imdb_id_and_uses_episode_runtime() {
        let json = r#"{
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "episode_run_time": [45, 47],
            "genres": [{"id": 18, "name": "Drama"}]
        }"#;
        let body: TitleDetail = serde_json::from_str(json).unwrap();
        let detail = body.into_detail(MediaKind::Tv);
        assert_eq!(detail.title, "Breaking Bad");
        assert_eq!(detail.imdb_id, None);
        assert_eq!(detail.runtime_minutes, Some(45));
    }

    #[test]
    fn video_type_field_is_renamed() {
        let json = r#"{
            "results": [
                {"key": "vKQi3bBA1y8", "name": "Official Trailer", "site": "YouTube", "type": "Trailer"}
            ]
        }"#;
        let body: VideoList = serde_json::from_str(json).unwrap();
        assert_eq!(body.results[0].kind, "Trailer");
        assert_eq!(body.results[0].site, "YouTube");
    }

    #[test]
    fn empty_character_reads_as_absent() {
        let json = r#"{"cast": [{"name": "Keanu Reeves", "character": ""}]}"#;
        let body: CreditsResponse = serde_json::from_str(json).unwrap();
        let cast: Vec<CastMember> = body
            .cast
            .into_iter()
            .map(|entry| CastMember {
                name: entry.name,
                character: entry.character.filter(|c| !c.is_empty()),
            })
            .collect();
        assert_eq!(cast[0].character, None);
    }
}
