use crate::media::{MediaKind, MediaSummary};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
}

/// The single trailer selected for an item (YouTube-hosted).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trailer {
    pub key: String,
    pub name: String,
}

impl Trailer {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalRating {
    pub source: String,
    pub value: String,
}

/// The block contributed by the secondary ratings API. Entirely optional:
/// when the lookup key is absent or the fetch fails the whole block is
/// absent, never partially filled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalRatings {
    pub ratings: Vec<ExternalRating>,
    pub director: Option<String>,
    pub awards: Option<String>,
}

/// Merged view model for one item's detail view. Constructed fresh per
/// aggregation and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaDetail {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub vote_average: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub cast: Vec<CastMember>,
    pub trailer: Option<Trailer>,
    pub similar: Vec<MediaSummary>,
    pub external: Option<ExternalRatings>,
}

impl MediaDetail {
    pub fn year(&self) -> Option<u32> {
        self.release_date.map(|d| d.year() as u32)
    }
}
