//! Identifier types for venue entities
//!
//! Tickers are dense integer indices so the order book can address its
//! per-ticker channels with plain slice indexing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a tradable instrument
///
/// A ticker is valid for a given book when `index() < ticker_count`.
/// Range checks happen at submission time because the ticker space is a
/// property of the book, not of the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerId(u32);

impl TickerId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw identifier value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Position of this ticker in a book's ticker table
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Iterate every ticker in `[0, count)`
    pub fn all(count: usize) -> impl Iterator<Item = TickerId> {
        (0..count as u32).map(TickerId)
    }
}

impl fmt::Display for TickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TickerId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
