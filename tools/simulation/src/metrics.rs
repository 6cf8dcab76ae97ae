//! Run metrics for simulation
//!
//! Tracks what the matcher did across sweeps and assembles the final
//! report of a run.

use chrono::{DateTime, Utc};
use matching_engine::{MetricsSnapshot, SweepSummary};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::bots::order_producer::ProducerStats;

/// Matcher-side totals over every sweep of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub sweeps: u64,
    pub trades: u64,
    pub quantity_matched: u64,
    pub notional: u64,
    pub orders_lost: u64,
    /// Open quantity of the lost orders
    pub lost_quantity: u64,
}

impl MatchStats {
    /// Fold one sweep into the totals.
    pub fn absorb(&mut self, summary: &SweepSummary) {
        self.sweeps += 1;
        self.trades += summary.trades as u64;
        self.quantity_matched += summary.quantity_matched;
        self.notional += summary.notional;
        self.orders_lost += summary.lost.len() as u64;
        self.lost_quantity += summary
            .lost
            .iter()
            .map(|lost| u64::from(lost.order.quantity.as_u32()))
            .sum::<u64>();
    }
}

/// What is left in the book once every thread has stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingBook {
    pub orders: u64,
    pub quantity: u64,
}

/// Final report of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub producers: usize,
    pub ticker_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub orders_submitted: u64,
    pub orders_accepted: u64,
    pub orders_rejected_full: u64,
    pub orders_invalid: u64,
    pub accepted_quantity: u64,
    pub sweeps: u64,
    pub trades: u64,
    pub quantity_matched: u64,
    pub notional: u64,
    pub orders_lost: u64,
    pub lost_quantity: u64,
    pub resting_orders: u64,
    pub resting_quantity: u64,
    /// Venue counters at the end of the run
    pub venue: MetricsSnapshot,
}

impl RunReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seed: u64,
        ticker_count: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        elapsed: Duration,
        producers: &[ProducerStats],
        matcher: &MatchStats,
        resting: RestingBook,
        venue: MetricsSnapshot,
    ) -> Self {
        let mut flow = ProducerStats::default();
        for stats in producers {
            flow.merge(stats);
        }

        Self {
            seed,
            producers: producers.len(),
            ticker_count,
            started_at,
            finished_at,
            elapsed_ms: elapsed.as_millis() as u64,
            orders_submitted: flow.orders_submitted,
            orders_accepted: flow.orders_accepted,
            orders_rejected_full: flow.orders_rejected_full,
            orders_invalid: flow.orders_invalid,
            accepted_quantity: flow.accepted_quantity,
            sweeps: matcher.sweeps,
            trades: matcher.trades,
            quantity_matched: matcher.quantity_matched,
            notional: matcher.notional,
            orders_lost: matcher.orders_lost,
            lost_quantity: matcher.lost_quantity,
            resting_orders: resting.orders,
            resting_quantity: resting.quantity,
            venue,
        }
    }

    /// Every accepted share is resting, was traded (on both sides) or was lost
    pub fn is_conserved(&self) -> bool {
        self.accepted_quantity == self.resting_quantity + 2 * self.quantity_matched + self.lost_quantity
    }

    /// Throughput: orders submitted per second.
    pub fn orders_per_second(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.orders_submitted as f64 / (self.elapsed_ms as f64 / 1_000.0)
    }

    /// Throughput: trades per second.
    pub fn trades_per_second(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.trades as f64 / (self.elapsed_ms as f64 / 1_000.0)
    }

    /// Build a summary string.
    pub fn summary(&self) -> String {
        format!(
            "Orders: {} | Accepted: {} | Dropped: {} | Trades: {} | Matched: {} | Lost: {} | Resting: {} | Throughput: {:.0} orders/s",
            self.orders_submitted,
            self.orders_accepted,
            self.orders_rejected_full,
            self.trades,
            self.quantity_matched,
            self.orders_lost,
            self.resting_orders,
            self.orders_per_second(),
        )
    }
}
