pub mod traits;
pub mod types;
pub mod tmdb;
pub mod omdb;
pub mod error;

pub use traits::{MetadataSource, RatingsSource};
pub use types::{PrimaryDetail, VideoEntry};
pub use error::SourceError;
pub use tmdb::TmdbClient;
pub use omdb::OmdbClient;
