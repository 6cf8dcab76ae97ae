//! Producer-facing order book
//!
//! One (buy, sell) channel pair per ticker, built once and never resized.
//! `OrderBook` is `Send + Sync` and shared by every producer; the matching
//! side of the same channels lives in [`BookConsumer`].

use std::sync::Arc;
use thiserror::Error;
use types::config::VenueConfig;
use types::errors::{OrderError, SubmitError};
use types::ids::TickerId;
use types::order::{Order, Side};

use crate::book::consumer::{BookConsumer, TickerReceivers};
use crate::channel::BoundedChannel;
use crate::metrics::VenueMetrics;

/// Book construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("Ticker count must be positive")]
    NoTickers,

    #[error("Ticker count {0} exceeds the ticker id space")]
    TooManyTickers(usize),

    #[error("Channel capacity must be positive")]
    ZeroCapacity,
}

/// Producer ends of one ticker's channels
struct TickerChannels {
    buys: Arc<BoundedChannel<Order>>,
    sells: Arc<BoundedChannel<Order>>,
}

impl TickerChannels {
    fn side(&self, side: Side) -> &BoundedChannel<Order> {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }
}

/// Table of per-ticker buy/sell channels
pub struct OrderBook {
    tickers: Box<[TickerChannels]>,
    channel_capacity: usize,
    metrics: VenueMetrics,
}

impl OrderBook {
    /// Build the book and its unique consumer
    pub fn new(config: &VenueConfig) -> Result<(Arc<OrderBook>, BookConsumer), BookError> {
        if config.ticker_count == 0 {
            return Err(BookError::NoTickers);
        }
        if config.ticker_count > u32::MAX as usize {
            return Err(BookError::TooManyTickers(config.ticker_count));
        }
        if config.channel_capacity == 0 {
            return Err(BookError::ZeroCapacity);
        }

        let mut tickers = Vec::with_capacity(config.ticker_count);
        let mut receivers = Vec::with_capacity(config.ticker_count);

        for _ in 0..config.ticker_count {
            let (buys, buy_rx) = BoundedChannel::with_capacity(config.channel_capacity);
            let (sells, sell_rx) = BoundedChannel::with_capacity(config.channel_capacity);
            tickers.push(TickerChannels { buys, sells });
            receivers.push(TickerReceivers::new(buy_rx, sell_rx));
        }

        let book = Arc::new(OrderBook {
            tickers: tickers.into_boxed_slice(),
            channel_capacity: config.channel_capacity,
            metrics: VenueMetrics::new(),
        });

        Ok((book, BookConsumer::new(receivers)))
    }

    /// Route an order into its (ticker, side) channel
    ///
    /// Does not retry: a full channel is reported as `QueueFull` and the
    /// order is gone. An order with no open shares is rejected as invalid,
    /// since a filled order must never occupy a slot.
    pub fn submit_order(&self, order: Order) -> Result<(), SubmitError> {
        let Some(channels) = self.tickers.get(order.ticker.index()) else {
            self.metrics.record_invalid();
            return Err(OrderError::InvalidTicker {
                ticker: order.ticker,
                ticker_count: self.ticker_count(),
            }
            .into());
        };
        if order.is_filled() {
            self.metrics.record_invalid();
            return Err(OrderError::InvalidQuantity { quantity: 0 }.into());
        }

        match channels.side(order.side).try_enqueue(order) {
            Ok(()) => {
                self.metrics.record_accepted();
                Ok(())
            }
            Err(rejected) => {
                self.metrics.record_rejected_full();
                Err(SubmitError::QueueFull {
                    ticker: rejected.ticker,
                    side: rejected.side,
                })
            }
        }
    }

    /// Validate raw order fields and submit
    ///
    /// Invalid orders are rejected before touching any channel.
    pub fn submit(&self, side: Side, ticker: u32, quantity: u32, price: u32) -> Result<(), SubmitError> {
        let order = Order::try_new(side, ticker, quantity, price).map_err(|err| {
            self.metrics.record_invalid();
            err
        })?;
        self.submit_order(order)
    }

    /// Published orders waiting in one channel, `None` for an unknown ticker
    pub fn depth(&self, ticker: TickerId, side: Side) -> Option<usize> {
        self.tickers
            .get(ticker.index())
            .map(|channels| channels.side(side).len())
    }

    /// Published orders waiting across every channel
    pub fn resting_orders(&self) -> usize {
        self.tickers
            .iter()
            .map(|channels| channels.buys.len() + channels.sells.len())
            .sum()
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    pub fn metrics(&self) -> &VenueMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("ticker_count", &self.ticker_count())
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}
