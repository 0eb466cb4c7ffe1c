//! Periodic import of products from the external catalog feed.

pub mod collector;
pub mod feed;

pub use collector::{CatalogCollector, JobState, TickOutcome};
pub use feed::{FeedCategory, FeedProduct, decode_feed};
