//! Error types for the venue
//!
//! Every failure here is an expected outcome of a saturation-prone pipeline,
//! so all of them are returned as values.

use crate::ids::TickerId;
use crate::order::Side;
use thiserror::Error;

/// Order validation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    #[error("Invalid ticker {ticker}: venue has {ticker_count} tickers")]
    InvalidTicker { ticker: TickerId, ticker_count: usize },

    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity { quantity: u32 },

    #[error("Invalid price: {price} outside [{}, {}]", crate::config::MIN_PRICE, crate::config::MAX_PRICE)]
    InvalidPrice { price: u32 },
}

/// Order submission errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Order rejected: {0}")]
    Invalid(#[from] OrderError),

    #[error("Queue full for ticker {ticker} ({side:?})")]
    QueueFull { ticker: TickerId, side: Side },
}

impl SubmitError {
    /// Whether the order was refused for capacity rather than content
    pub fn is_queue_full(&self) -> bool {
        matches!(self, SubmitError::QueueFull { .. })
    }
}
