pub mod aggregator;
pub mod token;
pub mod debounce;
pub mod carousel;
pub mod watchlist;

pub use aggregator::{DetailAggregator, DetailOutcome};
pub use token::{RequestTicket, RequestTracker};
pub use debounce::Debouncer;
pub use carousel::Carousel;
pub use watchlist::Watchlist;
