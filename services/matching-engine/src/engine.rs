//! Matching engine core
//!
//! Owns the consumer side of the book and runs matching passes. A pass
//! drains one ticker, sorts both sides, crosses them and puts every
//! remainder back. Producers keep submitting while a pass runs.

use std::sync::Arc;

use crossbeam_utils::Backoff;
use tracing::{debug, warn};
use types::config::{RequeuePolicy, VenueConfig};
use types::ids::TickerId;
use types::order::Order;

use crate::book::{BookConsumer, BookError, OrderBook};
use crate::events::{LostOrder, PassOutcome, SweepSummary};
use crate::matching::{cross, MatchExecutor, PriceBuckets, PriceOrder};

/// Main matching engine
pub struct MatchingEngine {
    book: Arc<OrderBook>,
    consumer: BookConsumer,
    /// Trade executor with sequence generation
    executor: MatchExecutor,
    buckets: PriceBuckets,
    requeue_policy: RequeuePolicy,
}

impl MatchingEngine {
    /// Wrap an existing book and the consumer it was built with
    pub fn new(book: Arc<OrderBook>, consumer: BookConsumer, config: &VenueConfig) -> Self {
        debug_assert_eq!(book.ticker_count(), consumer.ticker_count());
        Self {
            book,
            consumer,
            executor: MatchExecutor::default(),
            buckets: PriceBuckets::new(),
            requeue_policy: config.requeue_policy,
        }
    }

    /// Build a fresh book and the engine that matches it
    ///
    /// The returned `Arc<OrderBook>` is the handle to give to producers.
    pub fn with_config(config: &VenueConfig) -> Result<(Self, Arc<OrderBook>), BookError> {
        let (book, consumer) = OrderBook::new(config)?;
        let engine = Self::new(Arc::clone(&book), consumer, config);
        Ok((engine, book))
    }

    pub fn book(&self) -> &Arc<OrderBook> {
        &self.book
    }

    /// Give back the book and its consumer, e.g. to inspect what rests
    pub fn into_parts(self) -> (Arc<OrderBook>, BookConsumer) {
        (self.book, self.consumer)
    }

    pub fn requeue_policy(&self) -> RequeuePolicy {
        self.requeue_policy
    }

    /// Sequence number the next trade will carry
    pub fn next_trade_sequence(&self) -> u64 {
        self.executor.peek_sequence()
    }

    /// Run one matching pass over a ticker
    ///
    /// # Panics
    /// Panics if `ticker` is outside the book
    pub fn run_matching_pass(&mut self, ticker: TickerId) -> PassOutcome {
        let drained = self.consumer.drain_ticker(ticker);
        let mut outcome = PassOutcome::new(ticker);

        if !drained.is_two_sided() {
            // Nothing can cross: put the non-empty side back as it came out
            let orders = drained
                .buys
                .into_iter()
                .chain(drained.sells)
                .filter(|o| !o.is_filled());
            self.requeue_all(orders, &mut outcome);
            self.record(&outcome);
            return outcome;
        }

        let mut sells = self.buckets.sort(&drained.sells, PriceOrder::Ascending);
        let mut buys = self.buckets.sort(&drained.buys, PriceOrder::Descending);

        outcome.trades = cross(ticker, &mut buys, &mut sells, &mut self.executor);
        for trade in &outcome.trades {
            debug!(
                ticker = %ticker,
                sequence = trade.sequence,
                quantity = trade.quantity.as_u32(),
                price = trade.price.as_u32(),
                "{}", trade
            );
        }

        let remainders = buys.into_iter().chain(sells).filter(|o| !o.is_filled());
        self.requeue_all(remainders, &mut outcome);
        self.record(&outcome);
        outcome
    }

    /// Run one pass per ticker in index order
    pub fn sweep(&mut self) -> SweepSummary {
        let mut summary = SweepSummary::default();
        for ticker in TickerId::all(self.consumer.ticker_count()) {
            let outcome = self.run_matching_pass(ticker);
            summary.absorb(outcome);
        }

        debug!(
            passes = summary.passes,
            trades = summary.trades,
            quantity = summary.quantity_matched,
            notional = summary.notional,
            lost = summary.lost.len(),
            "Sweep complete"
        );
        summary
    }

    fn requeue_all(&self, orders: impl IntoIterator<Item = Order>, outcome: &mut PassOutcome) {
        for order in orders {
            match self.requeue(order) {
                Ok(()) => outcome.requeued += 1,
                Err(lost) => {
                    warn!(
                        ticker = %lost.order.ticker,
                        side = ?lost.order.side,
                        quantity = lost.order.quantity.as_u32(),
                        price = lost.order.price.as_u32(),
                        attempts = lost.attempts,
                        "Channel full on re-publish, order lost"
                    );
                    outcome.lost.push(lost);
                }
            }
        }
    }

    /// Put one order back into its channel under the requeue policy
    fn requeue(&self, order: Order) -> Result<(), LostOrder> {
        let attempts = self.requeue_policy.attempts();
        let backoff = Backoff::new();
        let mut pending = order;

        for attempt in 1..=attempts {
            match self.consumer.republish(pending) {
                Ok(()) => return Ok(()),
                Err(returned) => {
                    pending = returned;
                    if attempt < attempts {
                        backoff.snooze();
                    }
                }
            }
        }

        Err(LostOrder {
            order: pending,
            attempts,
        })
    }

    fn record(&self, outcome: &PassOutcome) {
        let metrics = self.book.metrics();
        metrics.record_pass(
            outcome.trades.len() as u64,
            outcome.matched_quantity(),
            outcome.notional(),
        );
        metrics.record_requeued(outcome.requeued as u64);
        metrics.record_lost(outcome.lost.len() as u64);
    }
}

impl std::fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("book", &self.book)
            .field("requeue_policy", &self.requeue_policy)
            .field("next_trade_sequence", &self.executor.peek_sequence())
            .finish()
    }
}
