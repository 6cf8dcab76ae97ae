//! Random order producer bot
//!
//! Generates uniformly random limit orders with a deterministic seeded RNG
//! and submits them straight into the shared order book.

use matching_engine::OrderBook;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use types::config::{MAX_PRICE, MIN_PRICE};
use types::errors::{OrderError, SubmitError};
use types::order::{Order, Side};

use crate::config::SimConfig;

/// Counters kept by a producer over its lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerStats {
    pub orders_submitted: u64,
    pub orders_accepted: u64,
    pub orders_rejected_full: u64,
    /// Attempts that failed validation, whether at generation or at the book
    pub orders_invalid: u64,
    /// Sum of quantities of accepted orders
    pub accepted_quantity: u64,
}

impl ProducerStats {
    pub fn merge(&mut self, other: &ProducerStats) {
        self.orders_submitted += other.orders_submitted;
        self.orders_accepted += other.orders_accepted;
        self.orders_rejected_full += other.orders_rejected_full;
        self.orders_invalid += other.orders_invalid;
        self.accepted_quantity += other.accepted_quantity;
    }
}

/// Random order producer with deterministic seeded RNG.
pub struct OrderProducer {
    pub id: usize,
    pub stats: ProducerStats,
    ticker_count: u32,
    min_quantity: u32,
    max_quantity: u32,
    rng: ChaCha8Rng,
}

impl OrderProducer {
    /// Create a producer with an explicit seed
    pub fn new(id: usize, seed: u64, ticker_count: u32, min_quantity: u32, max_quantity: u32) -> Self {
        Self {
            id,
            stats: ProducerStats::default(),
            ticker_count,
            min_quantity,
            max_quantity,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Producer `id` of a simulation, seeded from the run's base seed
    pub fn from_config(id: usize, config: &SimConfig) -> Self {
        let ticker_count = u32::try_from(config.venue.ticker_count).unwrap_or(u32::MAX);
        Self::new(
            id,
            config.producer_seed(id),
            ticker_count,
            config.min_quantity,
            config.max_quantity,
        )
    }

    /// Draw the next random order
    ///
    /// Side is a fair coin; ticker, quantity and whole-dollar price are
    /// uniform over their ranges.
    pub fn generate_order(&mut self) -> Result<Order, OrderError> {
        let side = if self.rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let ticker = self.rng.gen_range(0..self.ticker_count);
        let quantity = self.rng.gen_range(self.min_quantity..=self.max_quantity);
        let price = self.rng.gen_range(MIN_PRICE..=MAX_PRICE);

        Order::try_new(side, ticker, quantity, price)
    }

    /// Generate one order and submit it
    ///
    /// Every call counts as one submission attempt. A full queue drops the
    /// order; an invalid order is counted and never reaches a channel.
    pub fn tick(&mut self, book: &OrderBook) -> Result<(), SubmitError> {
        self.stats.orders_submitted += 1;
        let order = match self.generate_order() {
            Ok(order) => order,
            Err(err) => {
                self.stats.orders_invalid += 1;
                return Err(err.into());
            }
        };

        match book.submit_order(order) {
            Ok(()) => {
                self.stats.orders_accepted += 1;
                self.stats.accepted_quantity += u64::from(order.quantity.as_u32());
                debug!(
                    producer = self.id,
                    ticker = %order.ticker,
                    side = ?order.side,
                    quantity = order.quantity.as_u32(),
                    price = order.price.as_u32(),
                    "Order accepted"
                );
                Ok(())
            }
            Err(err) => {
                if err.is_queue_full() {
                    self.stats.orders_rejected_full += 1;
                    warn!(
                        producer = self.id,
                        ticker = %order.ticker,
                        side = ?order.side,
                        "Queue full, order dropped"
                    );
                } else {
                    self.stats.orders_invalid += 1;
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::VenueConfig;

    #[test]
    fn test_deterministic_with_same_seed() {
        let mut a = OrderProducer::new(0, 42, 1024, 1, 500);
        let mut b = OrderProducer::new(0, 42, 1024, 1, 500);

        for _ in 0..100 {
            assert_eq!(a.generate_order().unwrap(), b.generate_order().unwrap());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = OrderProducer::new(0, 1, 1024, 1, 500);
        let mut b = OrderProducer::new(1, 2, 1024, 1, 500);

        let first: Vec<_> = (0..20).map(|_| a.generate_order().unwrap()).collect();
        let second: Vec<_> = (0..20).map(|_| b.generate_order().unwrap()).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn test_orders_stay_in_range() {
        let mut producer = OrderProducer::new(0, 7, 16, 1, 500);
        let mut buys = 0;

        for _ in 0..2_000 {
            let order = producer.generate_order().unwrap();
            assert!(order.ticker.as_u32() < 16);
            assert!((1..=500).contains(&order.quantity.as_u32()));
            assert!((MIN_PRICE..=MAX_PRICE).contains(&order.price.as_u32()));
            if order.side == Side::Buy {
                buys += 1;
            }
        }

        // Fair coin over 2000 draws
        assert!((800..1200).contains(&buys), "buys = {}", buys);
    }

    #[test]
    fn test_tick_counts_accepted_and_dropped() {
        let (book, _consumer) = OrderBook::new(&VenueConfig::new(1, 1)).unwrap();
        let mut producer = OrderProducer::new(0, 3, 1, 1, 500);

        let mut accepted = 0;
        for _ in 0..10 {
            if producer.tick(&book).is_ok() {
                accepted += 1;
            }
        }

        // One ticker, capacity one per side: at most two orders fit
        assert!(accepted <= 2);
        assert_eq!(producer.stats.orders_submitted, 10);
        assert_eq!(producer.stats.orders_accepted, accepted);
        assert_eq!(producer.stats.orders_rejected_full, 10 - accepted);
        assert_eq!(producer.stats.orders_invalid, 0);
        assert_eq!(book.resting_orders() as u64, accepted);
    }

    #[test]
    fn test_tick_counts_failed_generation() {
        let (book, _consumer) = OrderBook::new(&VenueConfig::new(1, 8)).unwrap();
        // A zero lower bound lets the draw produce an empty order
        let mut producer = OrderProducer::new(0, 11, 1, 0, 0);

        for _ in 0..5 {
            let err = producer.tick(&book).unwrap_err();
            assert_eq!(err, SubmitError::Invalid(OrderError::InvalidQuantity { quantity: 0 }));
        }

        assert_eq!(producer.stats.orders_submitted, 5);
        assert_eq!(producer.stats.orders_invalid, 5);
        assert_eq!(producer.stats.orders_accepted, 0);
        assert_eq!(book.resting_orders(), 0);
        // Generation failures never reach the venue counters
        assert_eq!(book.metrics().snapshot().orders_invalid, 0);
    }

    #[test]
    fn test_from_config_uses_venue_tickers() {
        let config = SimConfig {
            venue: VenueConfig::new(4, 8),
            ..SimConfig::default()
        };
        let mut producer = OrderProducer::from_config(2, &config);
        for _ in 0..200 {
            assert!(producer.generate_order().unwrap().ticker.as_u32() < 4);
        }
    }

    #[test]
    fn test_stats_merge() {
        let mut total = ProducerStats::default();
        let one = ProducerStats {
            orders_submitted: 3,
            orders_accepted: 2,
            orders_rejected_full: 1,
            orders_invalid: 0,
            accepted_quantity: 40,
        };
        let two = ProducerStats {
            orders_submitted: 1,
            orders_invalid: 1,
            ..ProducerStats::default()
        };
        total.merge(&one);
        total.merge(&one);
        total.merge(&two);
        assert_eq!(total.orders_submitted, 7);
        assert_eq!(total.orders_invalid, 1);
        assert_eq!(total.accepted_quantity, 80);
    }
}
