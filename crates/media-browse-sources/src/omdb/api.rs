use media_browse_models::{ExternalRating, ExternalRatings};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

// OMDB API base URL
const API_BASE: &str = "https://www.omdbapi.com/";

#[derive(Debug, Deserialize)]
struct OmdbTitle {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Ratings", default)]
    ratings: Vec<OmdbRating>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Awards")]
    awards: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbRating {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Value")]
    value: String,
}

/// Fetch ratings for one title by IMDb id.
///
/// This lookup is strictly best-effort: transport errors, bad statuses,
/// unparseable bodies, and "not found" replies all degrade to `None` so
/// the detail view renders without the block.
pub async fn fetch_ratings(client: &Client, api_key: &str, imdb_id: &str) -> Option<ExternalRatings> {
    debug!("Fetching OMDB ratings for {}", imdb_id);
    let response = match client
        .get(API_BASE)
        .query(&[("i", imdb_id), ("apikey", api_key)])
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("OMDB request for {} failed: {}", imdb_id, e);
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!("OMDB request for {} returned {}", imdb_id, status);
        return None;
    }

    let body: OmdbTitle = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            warn!("OMDB response for {} did not parse: {}", imdb_id, e);
            return None;
        }
    };

    normalize(imdb_id, body)
}

/// A 200 from OMDB can still be a miss: the body then carries
/// `Response: "False"` and an error message.
fn normalize(imdb_id: &str, body: OmdbTitle) -> Option<ExternalRatings> {
    if body.response != "True" {
        warn!(
            "OMDB has no data for {}: {}",
            imdb_id,
            body.error.as_deref().unwrap_or("no reason given")
        );
        return None;
    }
    Some(ExternalRatings {
        ratings: body
            .ratings
            .into_iter()
            .map(|rating| ExternalRating {
                source: rating.source,
                value: rating.value,
            })
            .collect(),
        director: text_field(body.director),
        awards: text_field(body.awards),
    })
}

/// OMDB writes the literal string "N/A" into fields it has no data for.
fn text_field(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_response_normalizes() {
        let json = r#"{
            "Title": "The Matrix",
            "Director": "Lana Wachowski, Lilly Wachowski",
            "Awards": "Won 4 Oscars. 42 wins & 52 nominations total",
            "Ratings": [
                {"Source": "Internet Movie Database", "Value": "8.7/10"},
                {"Source": "Rotten Tomatoes", "Value": "83%"},
                {"Source": "Metacritic", "Value": "73/100"}
            ],
            "Response": "True"
        }"#;
        let body: OmdbTitle = serde_json::from_str(json).unwrap();
        let ratings = normalize("tt0133093", body).unwrap();
        assert_eq!(ratings.ratings.len(), 3);
        assert_eq!(ratings.ratings[1].source, "Rotten Tomatoes");
        assert_eq!(ratings.ratings[1].value, "83%");
        assert!(ratings.director.as_deref().unwrap().starts_with("Lana"));
    }

    #[test]
    fn false_response_is_a_miss() {
        let json = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        let body: OmdbTitle = serde_json::from_str(json).unwrap();
        assert_eq!(normalize("tt0000000", body), None);
    }

    #[test]
    fn not_available_fields_read_as_absent() {
        let json = r#"{
            "Director": "N/A",
            "Awards": "N/A",
            "Ratings": [],
            "Response": "True"
        }"#;
        let body: OmdbTitle = serde_json::from_str(json).unwrap();
        let ratings = normalize("tt0000001", body).unwrap();
        assert_eq!(ratings.director, None);
        assert_eq!(ratings.awards, None);
        assert!(ratings.ratings.is_empty());
    }
}
