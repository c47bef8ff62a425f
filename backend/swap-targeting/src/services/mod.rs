pub mod browse;
pub mod feed;
pub mod targeting;

pub use browse::{BrowseEntry, BrowsePipeline, BrowseQuery, SortField, SortOrder};
pub use feed::{FetchOutcome, ListingFeed, ListingSource, SearchDebouncer};
pub use targeting::{TargetabilityEvaluator, TargetingContext, TargetingWeights};
