//! Integer price and quantity types
//!
//! Prices are whole dollars inside `[MIN_PRICE, MAX_PRICE]`; quantities are
//! whole shares. Both are validated on construction so a value that reaches
//! a channel is always in range.

use crate::config::{MAX_PRICE, MIN_PRICE};
use crate::errors::OrderError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Limit price in whole dollars
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Price(u32);

impl Price {
    pub const MIN: Price = Price(MIN_PRICE);
    pub const MAX: Price = Price(MAX_PRICE);

    /// Create a price, rejecting values outside the venue's price domain
    pub fn try_new(dollars: u32) -> Result<Self, OrderError> {
        if (MIN_PRICE..=MAX_PRICE).contains(&dollars) {
            Ok(Self(dollars))
        } else {
            Err(OrderError::InvalidPrice { price: dollars })
        }
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Offset of this price from `MIN_PRICE`, used as a bucket index
    pub const fn bucket(&self) -> usize {
        (self.0 - MIN_PRICE) as usize
    }
}

impl TryFrom<u32> for Price {
    type Error = OrderError;

    fn try_from(dollars: u32) -> Result<Self, Self::Error> {
        Self::try_new(dollars)
    }
}

impl From<Price> for u32 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.00", self.0)
    }
}

/// Share count
///
/// Zero is representable because matching drives quantities down to zero,
/// but `try_new` and deserialization refuse it: an order always enters the
/// venue with shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Create a positive quantity
    pub fn try_new(shares: u32) -> Result<Self, OrderError> {
        if shares == 0 {
            Err(OrderError::InvalidQuantity { quantity: shares })
        } else {
            Ok(Self(shares))
        }
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtract, returning `None` on underflow
    pub fn checked_sub(self, other: Quantity) -> Option<Quantity> {
        self.0.checked_sub(other.0).map(Quantity)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = OrderError;

    fn try_from(shares: u32) -> Result<Self, Self::Error> {
        Self::try_new(shares)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
