use thiserror::Error;

/// Errors raised by the metadata source.
///
/// The ratings source never surfaces these: it degrades to "no ratings"
/// on any failure. See [`crate::traits::RatingsSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The configured key is empty or still the shipped placeholder.
    /// Detected before any request is issued.
    #[error("TMDB API key is not configured. Please add your API key.")]
    MissingApiKey,

    /// The server rejected the key (HTTP 401).
    #[error("API key is invalid or expired. Please check your TMDB API key.")]
    InvalidApiKey,

    /// Any other non-success HTTP status.
    #[error("API error: {status}")]
    Api { status: u16 },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl SourceError {
    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            SourceError::InvalidApiKey
        } else {
            SourceError::Api {
                status: status.as_u16(),
            }
        }
    }
}
