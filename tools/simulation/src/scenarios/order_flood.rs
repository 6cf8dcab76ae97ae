//! Order flood scenario
//!
//! Several threads burst orders into a single ticker with no matcher
//! running, so the channels fill and producers see `QueueFull`. One pass
//! then matches what got in. Passes when no accepted share is unaccounted
//! for and neither channel ever held more than its capacity.

use std::sync::Arc;
use std::thread;

use matching_engine::MatchingEngine;
use tracing::info;
use types::config::{VenueConfig, MAX_PRICE, MIN_PRICE};
use types::ids::TickerId;
use types::order::Side;

use crate::bots::order_producer::ProducerStats;
use crate::config::ConfigError;
use crate::runner::SimError;
use crate::scenarios::ScenarioResult;

/// Configuration for the order flood scenario.
#[derive(Debug, Clone)]
pub struct OrderFloodConfig {
    /// Submitting threads
    pub threads: usize,
    /// Orders each thread submits in its burst
    pub orders_per_thread: usize,
    /// Ticker every order targets
    pub ticker: u32,
    /// Price orders are staggered around
    pub base_price: u32,
    pub venue: VenueConfig,
}

impl Default for OrderFloodConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            orders_per_thread: 250,
            ticker: 0,
            base_price: 500,
            venue: VenueConfig::default(),
        }
    }
}

impl OrderFloodConfig {
    /// Default flood with a given total burst size
    pub fn with_burst(total_orders: usize) -> Self {
        let defaults = Self::default();
        Self {
            orders_per_thread: total_orders.div_ceil(defaults.threads),
            ..defaults
        }
    }
}

/// Widest distance of a flood price from the base price
const PRICE_SPREAD: u32 = 9;

/// Run the order flood scenario.
///
/// Threads alternate buy/sell at prices staggered ten levels either side of
/// the base price, so part of the flood crosses.
pub fn run(config: &OrderFloodConfig) -> Result<ScenarioResult, SimError> {
    let (mut engine, book) = MatchingEngine::with_config(&config.venue)?;
    if config.ticker as usize >= book.ticker_count() {
        return Err(ConfigError::TickerOutOfRange {
            ticker: config.ticker,
            ticker_count: book.ticker_count(),
        }
        .into());
    }
    if !(MIN_PRICE + PRICE_SPREAD..=MAX_PRICE - PRICE_SPREAD).contains(&config.base_price) {
        return Err(ConfigError::BasePriceRange {
            base_price: config.base_price,
        }
        .into());
    }
    let ticker = TickerId::new(config.ticker);

    let handles: Vec<_> = (0..config.threads)
        .map(|thread_id| {
            let book = Arc::clone(&book);
            let config = config.clone();
            thread::spawn(move || {
                let mut stats = ProducerStats::default();
                for i in 0..config.orders_per_thread {
                    let side = if (i + thread_id) % 2 == 0 { Side::Buy } else { Side::Sell };
                    let offset = (i % 10) as u32;
                    let price = match side {
                        Side::Buy => config.base_price + offset,
                        Side::Sell => config.base_price - offset,
                    };
                    let quantity = 1 + (i % 25) as u32;

                    stats.orders_submitted += 1;
                    match book.submit(side, config.ticker, quantity, price) {
                        Ok(()) => {
                            stats.orders_accepted += 1;
                            stats.accepted_quantity += u64::from(quantity);
                        }
                        Err(err) if err.is_queue_full() => stats.orders_rejected_full += 1,
                        Err(_) => stats.orders_invalid += 1,
                    }
                }
                stats
            })
        })
        .collect();

    let mut flow = ProducerStats::default();
    let mut panicked = 0;
    for handle in handles {
        match handle.join() {
            Ok(stats) => flow.merge(&stats),
            Err(_) => panicked += 1,
        }
    }

    let capacity = book.channel_capacity();
    let bounded = [Side::Buy, Side::Sell]
        .iter()
        .all(|side| book.depth(ticker, *side).is_some_and(|depth| depth <= capacity));

    let outcome = engine.run_matching_pass(ticker);
    let lost_quantity: u64 = outcome
        .lost
        .iter()
        .map(|lost| u64::from(lost.order.quantity.as_u32()))
        .sum();

    let (_book, mut consumer) = engine.into_parts();
    let drained = consumer.drain_ticker(ticker);
    let resting_quantity: u64 = drained
        .buys
        .iter()
        .chain(&drained.sells)
        .map(|o| u64::from(o.quantity.as_u32()))
        .sum();

    let conserved = flow.accepted_quantity == resting_quantity + 2 * outcome.matched_quantity() + lost_quantity;
    let passed = panicked == 0 && bounded && conserved && flow.orders_invalid == 0;

    info!(
        submitted = flow.orders_submitted,
        accepted = flow.orders_accepted,
        rejected = flow.orders_rejected_full,
        invalid = flow.orders_invalid,
        trades = outcome.trades.len(),
        passed,
        "Order flood finished"
    );

    Ok(ScenarioResult {
        name: "order_flood".to_string(),
        orders_submitted: flow.orders_submitted,
        orders_accepted: flow.orders_accepted,
        orders_rejected: flow.orders_rejected_full,
        trades_executed: outcome.trades.len() as u64,
        passed,
        details: format!(
            "Burst of {} orders into ticker {}. {} accepted, {} rejected full, {} invalid, {} trades, {} resting, {} lost.",
            flow.orders_submitted,
            ticker,
            flow.orders_accepted,
            flow.orders_rejected_full,
            flow.orders_invalid,
            outcome.trades.len(),
            drained.len(),
            outcome.lost.len(),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use matching_engine::BookError;

    fn small_flood() -> OrderFloodConfig {
        OrderFloodConfig {
            threads: 4,
            orders_per_thread: 100,
            ticker: 2,
            base_price: 500,
            venue: VenueConfig::new(4, 16),
        }
    }

    #[test]
    fn test_order_flood_passes() {
        let result = run(&small_flood()).unwrap();

        assert!(result.passed, "{}", result.details);
        assert_eq!(result.orders_submitted, 400);
        assert_eq!(result.orders_accepted + result.orders_rejected, 400);
    }

    #[test]
    fn test_flood_overflows_channels() {
        let result = run(&small_flood()).unwrap();

        // Two channels of 16 and nothing draining them during the burst
        assert_eq!(result.orders_accepted, 32);
        assert_eq!(result.orders_rejected, 368);
        assert!(result.trades_executed > 0);
    }

    #[test]
    fn test_with_burst_splits_across_threads() {
        let config = OrderFloodConfig::with_burst(1_001);
        assert_eq!(config.threads, 4);
        assert_eq!(config.orders_per_thread, 251);
    }

    #[test]
    fn test_invalid_venue() {
        let config = OrderFloodConfig {
            venue: VenueConfig::new(0, 16),
            ..small_flood()
        };
        assert!(matches!(run(&config), Err(SimError::Book(BookError::NoTickers))));
    }

    #[test]
    fn test_ticker_outside_venue() {
        let config = OrderFloodConfig {
            ticker: 4,
            ..small_flood()
        };
        assert!(matches!(
            run(&config),
            Err(SimError::Config(ConfigError::TickerOutOfRange { ticker: 4, ticker_count: 4 }))
        ));
    }

    #[test]
    fn test_base_price_must_leave_room_for_spread() {
        for base_price in [12, 995] {
            let config = OrderFloodConfig {
                base_price,
                ..small_flood()
            };
            assert!(matches!(
                run(&config),
                Err(SimError::Config(ConfigError::BasePriceRange { base_price: rejected }))
                    if rejected == base_price
            ));
        }

        // Both edges of the allowed range keep every price valid
        for base_price in [MIN_PRICE + PRICE_SPREAD, MAX_PRICE - PRICE_SPREAD] {
            let config = OrderFloodConfig {
                base_price,
                ..small_flood()
            };
            let result = run(&config).unwrap();
            assert!(result.passed, "{}", result.details);
            assert_eq!(result.orders_accepted + result.orders_rejected, 400);
        }
    }
}
