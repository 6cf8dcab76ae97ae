//! Matching Engine Service
//!
//! Lock-free order intake and batch matching for a fixed set of tickers.
//! Any number of producer threads submit orders into bounded per-ticker,
//! per-side channels; a single matcher periodically drains a ticker, sorts
//! both sides by price and crosses them.
//!
//! **Key Invariants:**
//! - Per-channel FIFO in reservation order; never more than capacity items
//! - Producers never block on each other or on the matcher
//! - Price priority, then time priority within a price level
//! - Conservation of quantity: each trade removes `2 × matched` from a ticker

pub mod book;
pub mod channel;
pub mod engine;
pub mod events;
pub mod matching;
pub mod metrics;

pub use book::{BookConsumer, BookError, DrainedOrders, OrderBook};
pub use channel::{BoundedChannel, Receiver};
pub use engine::MatchingEngine;
pub use events::{LostOrder, PassOutcome, SweepSummary};
pub use metrics::{MetricsSnapshot, VenueMetrics};
