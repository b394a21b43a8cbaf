use crate::token::{RequestTicket, RequestTracker};
use media_browse_models::{
    CastMember, ExternalRatings, MediaDetail, MediaKind, MediaSummary, Trailer,
};
use media_browse_sources::{MetadataSource, PrimaryDetail, RatingsSource, SourceError, VideoEntry};
use std::sync::Arc;
use tracing::debug;

/// How many cast members the detail view bills.
const TOP_BILLED: usize = 5;

/// Outcome of one detail aggregation.
#[derive(Debug)]
pub enum DetailOutcome {
    /// The aggregation finished while its ticket was still current.
    Ready(MediaDetail),
    /// A newer request or a close retired this one mid-flight. Nothing
    /// should render; the partial work is discarded.
    Superseded,
}

/// Builds the merged detail view for one title.
///
/// One aggregation is four lookups: the primary detail record, then cast,
/// videos, and similar titles fanned out concurrently, with the optional
/// external ratings joined alongside when the primary record carries an
/// IMDb id. The ticket is re-checked after every await so a stale
/// response can never clobber a newer one, no matter how the network
/// interleaves.
#[derive(Clone)]
pub struct DetailAggregator {
    metadata: Arc<dyn MetadataSource>,
    ratings: Option<Arc<dyn RatingsSource>>,
    tracker: RequestTracker,
}

impl DetailAggregator {
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        ratings: Option<Arc<dyn RatingsSource>>,
    ) -> Self {
        Self {
            metadata,
            ratings,
            tracker: RequestTracker::new(),
        }
    }

    /// Open the detail view for one title. Any aggregation still in
    /// flight is retired by this call.
    pub async fn open(&self, kind: MediaKind, id: u64) -> Result<DetailOutcome, SourceError> {
        let ticket = self.tracker.begin();
        self.aggregate(kind, id, &ticket).await
    }

    /// Close the detail view: whatever is still in flight must not
    /// render.
    pub fn close(&self) {
        self.tracker.invalidate();
    }

    async fn aggregate(
        &self,
        kind: MediaKind,
        id: u64,
        ticket: &RequestTicket,
    ) -> Result<DetailOutcome, SourceError> {
        let primary = self.metadata.detail(kind, id).await;
        // Staleness beats errors: a retired request reports nothing,
        // not even a failure.
        if !ticket.is_current() {
            debug!("Detail request for {} {} superseded after primary fetch", kind, id);
            return Ok(DetailOutcome::Superseded);
        }
        let primary = primary?;

        let (secondary, external) = tokio::join!(
            async {
                tokio::try_join!(
                    self.metadata.credits(kind, id),
                    self.metadata.videos(kind, id),
                    self.metadata.similar(kind, id),
                )
            },
            async {
                match (self.ratings.as_deref(), primary.imdb_id.as_deref()) {
                    (Some(ratings), Some(imdb_id)) => ratings.ratings(imdb_id).await,
                    _ => None,
                }
            },
        );
        if !ticket.is_current() {
            debug!("Detail request for {} {} superseded after fan-out", kind, id);
            return Ok(DetailOutcome::Superseded);
        }
        let (cast, videos, similar) = secondary?;

        Ok(DetailOutcome::Ready(merge(
            primary, cast, videos, similar, external,
        )))
    }
}

fn merge(
    primary: PrimaryDetail,
    mut cast: Vec<CastMember>,
    videos: Vec<VideoEntry>,
    similar: Vec<MediaSummary>,
    external: Option<ExternalRatings>,
) -> MediaDetail {
    cast.truncate(TOP_BILLED);
    let trailer = select_trailer(&videos);
    MediaDetail {
        id: primary.id,
        kind: primary.kind,
        title: primary.title,
        overview: primary.overview,
        vote_average: primary.vote_average,
        release_date: primary.release_date,
        runtime_minutes: primary.runtime_minutes,
        genres: primary.genres,
        poster_path: primary.poster_path,
        cast,
        trailer,
        similar,
        external,
    }
}

/// The first YouTube-hosted entry typed `Trailer`, in the order the
/// source returned them. Absence is a normal outcome.
fn select_trailer(videos: &[VideoEntry]) -> Option<Trailer> {
    videos
        .iter()
        .find(|video| video.is_youtube_trailer())
        .map(|video| Trailer {
            key: video.key.clone(),
            name: video.name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use media_browse_models::{ExternalRating, Genre};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn video(key: &str, site: &str, kind: &str) -> VideoEntry {
        VideoEntry {
            key: key.to_string(),
            name: format!("{} ({})", kind, site),
            site: site.to_string(),
            kind: kind.to_string(),
        }
    }

    #[derive(Default)]
    struct FakeMetadata {
        detail_delay_ms: u64,
        credits_delay_ms: u64,
        imdb_id: Option<String>,
        videos: Vec<VideoEntry>,
        cast_size: usize,
        fail_credits: bool,
    }

    #[async_trait]
    impl MetadataSource for FakeMetadata {
        async fn popular(
            &self,
            _kind: MediaKind,
            _page: u32,
        ) -> Result<Vec<MediaSummary>, SourceError> {
            unimplemented!()
        }

        async fn search(
            &self,
            _kind: MediaKind,
            _query: &str,
            _page: u32,
        ) -> Result<Vec<MediaSummary>, SourceError> {
            unimplemented!()
        }

        async fn search_multi(
            &self,
            _query: &str,
            _page: u32,
        ) -> Result<Vec<MediaSummary>, SourceError> {
            unimplemented!()
        }

        async fn discover(
            &self,
            _kind: MediaKind,
            _genre_id: u64,
            _page: u32,
        ) -> Result<Vec<MediaSummary>, SourceError> {
            unimplemented!()
        }

        async fn genres(&self, _kind: MediaKind) -> Result<Vec<Genre>, SourceError> {
            unimplemented!()
        }

        async fn detail(&self, kind: MediaKind, id: u64) -> Result<PrimaryDetail, SourceError> {
            if self.detail_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.detail_delay_ms)).await;
            }
            Ok(PrimaryDetail {
                id,
                kind,
                title: format!("Title {}", id),
                overview: String::new(),
                vote_average: Some(7.5),
                release_date: None,
                runtime_minutes: Some(120),
                genres: vec!["Action".to_string()],
                poster_path: None,
                imdb_id: self.imdb_id.clone(),
            })
        }

        async fn credits(&self, _kind: MediaKind, _id: u64) -> Result<Vec<CastMember>, SourceError> {
            if self.credits_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.credits_delay_ms)).await;
            }
            if self.fail_credits {
                return Err(SourceError::Api { status: 500 });
            }
            Ok((0..self.cast_size)
                .map(|i| CastMember {
                    name: format!("Actor {}", i),
                    character: None,
                })
                .collect())
        }

        async fn videos(&self, _kind: MediaKind, _id: u64) -> Result<Vec<VideoEntry>, SourceError> {
            Ok(self.videos.clone())
        }

        async fn similar(
            &self,
            _kind: MediaKind,
            _id: u64,
        ) -> Result<Vec<MediaSummary>, SourceError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct CountingRatings {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RatingsSource for CountingRatings {
        async fn ratings(&self, _imdb_id: &str) -> Option<ExternalRatings> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(ExternalRatings {
                ratings: vec![ExternalRating {
                    source: "Internet Movie Database".to_string(),
                    value: "8.7/10".to_string(),
                }],
                director: Some("Jane Doe".to_string()),
                awards: None,
            })
        }
    }

    fn ready(outcome: DetailOutcome) -> MediaDetail {
        match outcome {
            DetailOutcome::Ready(detail) => detail,
            DetailOutcome::Superseded => panic!("expected a ready detail"),
        }
    }

    #[tokio::test]
    async fn latest_request_wins_the_race() {
        let aggregator = Arc::new(DetailAggregator::new(
            Arc::new(FakeMetadata {
                detail_delay_ms: 40,
                ..Default::default()
            }),
            None,
        ));

        let slow = {
            let aggregator = Arc::clone(&aggregator);
            tokio::spawn(async move { aggregator.open(MediaKind::Movie, 1).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let fast = aggregator.open(MediaKind::Movie, 2).await.unwrap();

        let slow = slow.await.unwrap().unwrap();
        assert!(matches!(slow, DetailOutcome::Superseded));
        assert_eq!(ready(fast).id, 2);
    }

    #[tokio::test]
    async fn close_discards_the_inflight_request() {
        let aggregator = Arc::new(DetailAggregator::new(
            Arc::new(FakeMetadata {
                detail_delay_ms: 40,
                ..Default::default()
            }),
            None,
        ));

        let inflight = {
            let aggregator = Arc::clone(&aggregator);
            tokio::spawn(async move { aggregator.open(MediaKind::Movie, 1).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        aggregator.close();

        let outcome = inflight.await.unwrap().unwrap();
        assert!(matches!(outcome, DetailOutcome::Superseded));
    }

    #[tokio::test]
    async fn a_retired_request_swallows_even_failures() {
        let aggregator = Arc::new(DetailAggregator::new(
            Arc::new(FakeMetadata {
                credits_delay_ms: 40,
                fail_credits: true,
                ..Default::default()
            }),
            None,
        ));

        let inflight = {
            let aggregator = Arc::clone(&aggregator);
            tokio::spawn(async move { aggregator.open(MediaKind::Movie, 1).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        aggregator.close();

        let outcome = inflight.await.unwrap().unwrap();
        assert!(matches!(outcome, DetailOutcome::Superseded));
    }

    #[tokio::test]
    async fn missing_trailer_is_not_an_error() {
        let aggregator = DetailAggregator::new(
            Arc::new(FakeMetadata {
                videos: vec![
                    video("aaa", "YouTube", "Featurette"),
                    video("bbb", "Vimeo", "Trailer"),
                ],
                ..Default::default()
            }),
            None,
        );

        let detail = ready(aggregator.open(MediaKind::Movie, 1).await.unwrap());
        assert_eq!(detail.trailer, None);
    }

    #[tokio::test]
    async fn first_matching_trailer_wins() {
        let aggregator = DetailAggregator::new(
            Arc::new(FakeMetadata {
                videos: vec![
                    video("aaa", "YouTube", "Teaser"),
                    video("bbb", "Vimeo", "Trailer"),
                    video("ccc", "YouTube", "Trailer"),
                    video("ddd", "YouTube", "Trailer"),
                ],
                ..Default::default()
            }),
            None,
        );

        let detail = ready(aggregator.open(MediaKind::Movie, 1).await.unwrap());
        assert_eq!(detail.trailer.unwrap().key, "ccc");
    }

    #[tokio::test]
    async fn no_imdb_id_means_no_ratings_lookup() {
        let ratings = Arc::new(CountingRatings::default());
        let calls = Arc::clone(&ratings.calls);
        let aggregator = DetailAggregator::new(
            Arc::new(FakeMetadata::default()),
            Some(ratings),
        );

        let detail = ready(aggregator.open(MediaKind::Tv, 1).await.unwrap());
        assert_eq!(detail.external, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ratings_join_the_detail_when_available() {
        let ratings = Arc::new(CountingRatings::default());
        let calls = Arc::clone(&ratings.calls);
        let aggregator = DetailAggregator::new(
            Arc::new(FakeMetadata {
                imdb_id: Some("tt0133093".to_string()),
                ..Default::default()
            }),
            Some(ratings),
        );

        let detail = ready(aggregator.open(MediaKind::Movie, 603).await.unwrap());
        let external = detail.external.unwrap();
        assert_eq!(external.ratings[0].value, "8.7/10");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unconfigured_ratings_source_is_fine() {
        let aggregator = DetailAggregator::new(
            Arc::new(FakeMetadata {
                imdb_id: Some("tt0133093".to_string()),
                ..Default::default()
            }),
            None,
        );

        let detail = ready(aggregator.open(MediaKind::Movie, 603).await.unwrap());
        assert_eq!(detail.external, None);
    }

    #[tokio::test]
    async fn failed_mandatory_fetch_surfaces() {
        let aggregator = DetailAggregator::new(
            Arc::new(FakeMetadata {
                fail_credits: true,
                ..Default::default()
            }),
            None,
        );

        let err = aggregator.open(MediaKind::Movie, 1).await.err().unwrap();
        assert!(matches!(err, SourceError::Api { status: 500 }));
    }

    #[tokio::test]
    async fn cast_is_trimmed_to_top_billing() {
        let aggregator = DetailAggregator::new(
            Arc::new(FakeMetadata {
                cast_size: 9,
                ..Default::default()
            }),
            None,
        );

        let detail = ready(aggregator.open(MediaKind::Movie, 1).await.unwrap());
        assert_eq!(detail.cast.len(), TOP_BILLED);
        assert_eq!(detail.cast[0].name, "Actor 0");
    }

    #[test]
    fn trailer_selection_respects_source_order() {
        let videos = vec![
            video("first", "YouTube", "Trailer"),
            video("second", "YouTube", "Trailer"),
        ];
        assert_eq!(select_trailer(&videos).unwrap().key, "first");
        assert_eq!(select_trailer(&[]), None);
    }
}
