//! Trade records
//!
//! A trade is one crossing produced by a matching pass. The core hands it to
//! the caller and keeps no copy.

use crate::ids::TickerId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One matched crossing between a buy and a sell order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Engine-wide monotonic sequence
    pub sequence: u64,
    pub ticker: TickerId,
    /// Execution price (the sell order's limit)
    pub price: Price,
    pub quantity: Quantity,
}

impl Trade {
    pub fn new(sequence: u64, ticker: TickerId, price: Price, quantity: Quantity) -> Self {
        Self {
            sequence,
            ticker,
            price,
            quantity,
        }
    }

    /// Trade value in dollars (price × quantity)
    pub fn notional(&self) -> u64 {
        u64::from(self.price.as_u32()) * u64::from(self.quantity.as_u32())
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Matched Ticker {}: {} shares at {}",
            self.ticker, self.quantity, self.price
        )
    }
}
