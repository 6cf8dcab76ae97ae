//! Event structures for matching engine
//!
//! Results reported by matching passes and sweeps.

use serde::{Deserialize, Serialize};
use types::ids::TickerId;
use types::order::Order;
use types::trade::Trade;

/// An order remainder that could not be put back into its channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostOrder {
    pub order: Order,
    /// Re-publish attempts made before giving up
    pub attempts: u32,
}

/// Result of one matching pass over a single ticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassOutcome {
    pub ticker: TickerId,
    /// Trades in execution order
    pub trades: Vec<Trade>,
    /// Orders put back into the book
    pub requeued: usize,
    pub lost: Vec<LostOrder>,
}

impl PassOutcome {
    pub fn new(ticker: TickerId) -> Self {
        Self {
            ticker,
            trades: Vec::new(),
            requeued: 0,
            lost: Vec::new(),
        }
    }

    /// Total shares traded in this pass
    pub fn matched_quantity(&self) -> u64 {
        self.trades.iter().map(|t| u64::from(t.quantity.as_u32())).sum()
    }

    /// Total dollar value traded in this pass
    pub fn notional(&self) -> u64 {
        self.trades.iter().map(Trade::notional).sum()
    }

    /// Whether the pass neither traded nor touched any order
    pub fn is_idle(&self) -> bool {
        self.trades.is_empty() && self.requeued == 0 && self.lost.is_empty()
    }
}

/// Aggregate of a pass over every ticker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub passes: usize,
    pub trades: usize,
    pub quantity_matched: u64,
    pub notional: u64,
    pub requeued: usize,
    pub lost: Vec<LostOrder>,
}

impl SweepSummary {
    /// Fold one pass into the summary
    pub fn absorb(&mut self, outcome: PassOutcome) {
        self.passes += 1;
        self.trades += outcome.trades.len();
        self.quantity_matched += outcome.matched_quantity();
        self.notional += outcome.notional();
        self.requeued += outcome.requeued;
        self.lost.extend(outcome.lost);
    }
}
