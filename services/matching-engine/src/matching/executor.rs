//! Trade execution logic
//!
//! Fills a crossing buy/sell pair and produces the trade record.

use types::ids::TickerId;
use types::order::Order;
use types::trade::Trade;

/// Match executor for handling trade generation
#[derive(Debug)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Sequence the next trade will carry
    pub fn peek_sequence(&self) -> u64 {
        self.sequence_counter
    }

    /// Execute a trade between a crossing buy and sell
    ///
    /// The matched quantity is the smaller open quantity and the execution
    /// price is the sell order's limit. Both orders are filled in place.
    pub fn execute_trade(&mut self, ticker: TickerId, buy: &mut Order, sell: &mut Order) -> Trade {
        debug_assert!(buy.price >= sell.price, "execute_trade called on a non-crossing pair");

        let matched = buy.quantity.min(sell.quantity);
        buy.fill(matched);
        sell.fill(matched);

        Trade::new(self.next_sequence(), ticker, sell.price, matched)
    }
}

impl Default for MatchExecutor {
    fn default() -> Self {
        Self::new(1)
    }
}
