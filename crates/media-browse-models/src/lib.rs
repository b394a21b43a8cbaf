pub mod detail;
pub mod media;
pub mod theme;
pub mod watchlist;

pub use detail::{CastMember, ExternalRating, ExternalRatings, Genre, MediaDetail, Trailer};
pub use media::{MediaKind, MediaSummary};
pub use theme::Theme;
pub use watchlist::WatchlistEntry;
