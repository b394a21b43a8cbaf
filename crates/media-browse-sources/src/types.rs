use chrono::NaiveDate;
use media_browse_models::MediaKind;

/// Detail record for a single title as the metadata source returns it,
/// before cast, trailer, similar titles, and external ratings are merged
/// in.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryDetail {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub vote_average: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    /// Cross-source key for the external ratings lookup. Not every title
    /// has one.
    pub imdb_id: Option<String>,
}

/// One entry from a title's published video list.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoEntry {
    pub key: String,
    pub name: String,
    pub site: String,
    pub kind: String,
}

impl VideoEntry {
    /// True for entries the detail view can embed: hosted on YouTube and
    /// typed as a trailer upstream.
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.kind == "Trailer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(site: &str, kind: &str) -> VideoEntry {
        VideoEntry {
            key: "abc123".to_string(),
            name: "Official Trailer".to_string(),
            site: site.to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn youtube_trailer_is_playable() {
        assert!(entry("YouTube", "Trailer").is_youtube_trailer());
    }

    #[test]
    fn other_sites_and_kinds_are_not() {
        assert!(!entry("Vimeo", "Trailer").is_youtube_trailer());
        assert!(!entry("YouTube", "Featurette").is_youtube_trailer());
        assert!(!entry("YouTube", "Teaser").is_youtube_trailer());
    }
}
