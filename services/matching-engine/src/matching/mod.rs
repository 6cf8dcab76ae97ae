//! Matching logic module
//!
//! Bucket-sorts a drained ticker and crosses the two sides with price
//! priority, then time priority within a price level.

pub mod bucket;
pub mod crossing;
pub mod executor;

pub use bucket::{bucket_sort, PriceBuckets, PriceOrder};
pub use crossing::{can_match, cross};
pub use executor::MatchExecutor;
