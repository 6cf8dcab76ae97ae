//! Order types
//!
//! An order is a small `Copy` value: it travels through the lock-free
//! channels by value and is only mutated by the matching pass that drained it.

use crate::errors::OrderError;
use crate::ids::TickerId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Single-letter code used in log lines
    pub fn code(&self) -> char {
        match self {
            Side::Buy => 'B',
            Side::Sell => 'S',
        }
    }
}

/// A limit order resting in, or travelling to, a ticker channel
///
/// `quantity` is the number of shares still open. It only shrinks, and only
/// inside a matching pass; an order at zero is filled and is never
/// re-published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub side: Side,
    pub ticker: TickerId,
    pub quantity: Quantity,
    pub price: Price,
}

impl Order {
    /// Create an order from already validated parts
    pub fn new(side: Side, ticker: TickerId, quantity: Quantity, price: Price) -> Self {
        Self {
            side,
            ticker,
            quantity,
            price,
        }
    }

    /// Create an order from raw integers, validating quantity and price
    ///
    /// The ticker range depends on the book and is checked on submission.
    pub fn try_new(side: Side, ticker: u32, quantity: u32, price: u32) -> Result<Self, OrderError> {
        Ok(Self::new(
            side,
            TickerId::new(ticker),
            Quantity::try_new(quantity)?,
            Price::try_new(price)?,
        ))
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Reduce the open quantity by a matched amount
    ///
    /// # Panics
    /// Panics if the fill exceeds the open quantity
    pub fn fill(&mut self, matched: Quantity) {
        self.quantity = self
            .quantity
            .checked_sub(matched)
            .expect("Fill would exceed order quantity");
    }
}
