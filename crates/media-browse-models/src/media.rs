use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// URL path segment used by the metadata API ("movie" or "tv").
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Tv => "TV",
        }
    }

    pub fn toggled(&self) -> MediaKind {
        match self {
            MediaKind::Movie => MediaKind::Tv,
            MediaKind::Tv => MediaKind::Movie,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One cell of the poster grid: the fields every listing endpoint
/// (popular, search, discover, similar) can fill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaSummary {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub year: Option<u32>,
    pub poster_path: Option<String>,
    /// Community vote average on a 0-10 scale; `None` when the item has no
    /// votes yet (the API reports those as 0.0).
    pub vote_average: Option<f64>,
    pub overview: String,
}
