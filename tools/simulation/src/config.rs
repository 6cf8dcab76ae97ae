//! Simulation configuration
//!
//! Defaults reproduce a short run: 2 seconds, 3 producers, one order per
//! producer every 50 ms and a full sweep every 500 ms.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use types::config::{VenueConfig, MAX_PRICE, MIN_PRICE};

pub const DEFAULT_DURATION: Duration = Duration::from_secs(2);
pub const DEFAULT_PRODUCERS: usize = 3;
pub const DEFAULT_PRODUCER_INTERVAL: Duration = Duration::from_millis(50);
pub const DEFAULT_MATCHER_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_SEED: u64 = 42;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Simulation needs at least one producer")]
    NoProducers,

    #[error("Simulation duration must be positive")]
    ZeroDuration,

    #[error("Invalid quantity range [{min}, {max}]")]
    QuantityRange { min: u32, max: u32 },

    #[error("Venue needs at least one ticker")]
    NoTickers,

    #[error("Venue channel capacity must be positive")]
    ZeroCapacity,

    #[error("Ticker {ticker} outside a venue of {ticker_count} tickers")]
    TickerOutOfRange { ticker: u32, ticker_count: usize },

    #[error("Base price {base_price} leaves flood prices outside [{}, {}]", MIN_PRICE, MAX_PRICE)]
    BasePriceRange { base_price: u32 },
}

/// Full configuration of one simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub duration: Duration,
    pub producers: usize,
    /// Pause between two orders of the same producer
    pub producer_interval: Duration,
    /// Pause between two sweeps of the matcher
    pub matcher_interval: Duration,
    /// Base seed; producer `i` uses `seed + i`
    pub seed: u64,
    pub min_quantity: u32,
    pub max_quantity: u32,
    pub venue: VenueConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            producers: DEFAULT_PRODUCERS,
            producer_interval: DEFAULT_PRODUCER_INTERVAL,
            matcher_interval: DEFAULT_MATCHER_INTERVAL,
            seed: DEFAULT_SEED,
            min_quantity: 1,
            max_quantity: 500,
            venue: VenueConfig::default(),
        }
    }
}

impl SimConfig {
    /// Apply raw command-line counts
    ///
    /// Missing or non-positive values keep the current setting.
    pub fn with_positional(mut self, seconds: Option<i64>, producers: Option<i64>) -> Self {
        if let Some(seconds) = seconds.filter(|s| *s > 0) {
            self.duration = Duration::from_secs(seconds as u64);
        }
        if let Some(producers) = producers.filter(|p| *p > 0) {
            self.producers = producers as usize;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.producers == 0 {
            return Err(ConfigError::NoProducers);
        }
        if self.duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        if self.min_quantity == 0 || self.min_quantity > self.max_quantity {
            return Err(ConfigError::QuantityRange {
                min: self.min_quantity,
                max: self.max_quantity,
            });
        }
        if self.venue.ticker_count == 0 {
            return Err(ConfigError::NoTickers);
        }
        if self.venue.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Seed for the producer with the given index
    pub fn producer_seed(&self, producer: usize) -> u64 {
        self.seed.wrapping_add(producer as u64)
    }
}
