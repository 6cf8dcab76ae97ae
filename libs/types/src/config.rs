//! Venue configuration
//!
//! Sizes are fixed when the order book is built and never change during a
//! run. The price domain is a compile-time constant because the matching
//! pass allocates one bucket per price level.

use serde::{Deserialize, Serialize};

/// Number of tickers in the default venue
pub const TICKER_COUNT: usize = 1024;

/// Slots per (ticker, side) channel
pub const CHANNEL_CAPACITY: usize = 128;

/// Lowest accepted price, in whole dollars
pub const MIN_PRICE: u32 = 10;

/// Highest accepted price, in whole dollars
pub const MAX_PRICE: u32 = 1000;

/// Number of distinct price levels in `[MIN_PRICE, MAX_PRICE]`
pub const PRICE_LEVELS: usize = (MAX_PRICE - MIN_PRICE + 1) as usize;

/// What a matching pass does when a remainder cannot be re-published
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "max_attempts", rename_all = "snake_case")]
pub enum RequeuePolicy {
    /// Give up after the first failed enqueue and report the order as lost
    #[default]
    Drop,
    /// Retry with backoff up to `max_attempts` enqueue attempts in total
    Retry(u32),
}

impl RequeuePolicy {
    /// Total enqueue attempts allowed for one remainder
    pub fn attempts(&self) -> u32 {
        match self {
            RequeuePolicy::Drop => 1,
            RequeuePolicy::Retry(max_attempts) => (*max_attempts).max(1),
        }
    }
}

/// Layout of an order book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Size of the ticker index space
    pub ticker_count: usize,
    /// Slots per (ticker, side) channel; a power of two keeps slot lookup cheap
    pub channel_capacity: usize,
    /// Handling of remainders that find their channel full
    #[serde(default)]
    pub requeue_policy: RequeuePolicy,
}

impl VenueConfig {
    /// Config with explicit sizes and the default requeue policy
    pub fn new(ticker_count: usize, channel_capacity: usize) -> Self {
        Self {
            ticker_count,
            channel_capacity,
            requeue_policy: RequeuePolicy::default(),
        }
    }

    pub fn with_requeue_policy(mut self, policy: RequeuePolicy) -> Self {
        self.requeue_policy = policy;
        self
    }
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self::new(TICKER_COUNT, CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_levels() {
        assert_eq!(PRICE_LEVELS, 991);
    }

    #[test]
    fn test_default_config() {
        let config = VenueConfig::default();
        assert_eq!(config.ticker_count, 1024);
        assert_eq!(config.channel_capacity, 128);
        assert!(config.channel_capacity.is_power_of_two());
        assert_eq!(config.requeue_policy, RequeuePolicy::Drop);
    }

    #[test]
    fn test_requeue_attempts() {
        assert_eq!(RequeuePolicy::Drop.attempts(), 1);
        assert_eq!(RequeuePolicy::Retry(5).attempts(), 5);
        assert_eq!(RequeuePolicy::Retry(0).attempts(), 1);
    }

    #[test]
    fn test_config_serialization() {
        let config = VenueConfig::new(16, 8).with_requeue_policy(RequeuePolicy::Retry(3));
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: VenueConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_missing_policy_defaults_to_drop() {
        let config: VenueConfig =
            serde_json::from_str(r#"{"ticker_count":4,"channel_capacity":2}"#).unwrap();
        assert_eq!(config.requeue_policy, RequeuePolicy::Drop);
    }
}
