//! Venue counters
//!
//! Lock-free counters shared by producers and the matcher. Every dropped
//! order shows up here: queue-full rejections on submission and remainders
//! lost on re-publication are counted separately.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Core metrics for the venue
#[derive(Debug, Default)]
pub struct VenueMetrics {
    // Submission
    pub orders_accepted: AtomicU64,
    pub orders_rejected_full: AtomicU64,
    pub orders_invalid: AtomicU64,

    // Matching
    pub passes_run: AtomicU64,
    pub trades_executed: AtomicU64,
    pub quantity_matched: AtomicU64,
    pub notional_matched: AtomicU64,

    // Re-publication
    pub orders_requeued: AtomicU64,
    pub orders_lost: AtomicU64,
}

impl VenueMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&self) {
        self.orders_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_full(&self) {
        self.orders_rejected_full.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid(&self) {
        self.orders_invalid.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one completed matching pass and its trades.
    pub fn record_pass(&self, trades: u64, quantity: u64, notional: u64) {
        self.passes_run.fetch_add(1, Ordering::Relaxed);
        self.trades_executed.fetch_add(trades, Ordering::Relaxed);
        self.quantity_matched.fetch_add(quantity, Ordering::Relaxed);
        self.notional_matched.fetch_add(notional, Ordering::Relaxed);
    }

    pub fn record_requeued(&self, count: u64) {
        self.orders_requeued.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_lost(&self, count: u64) {
        self.orders_lost.fetch_add(count, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            orders_accepted: self.orders_accepted.load(Ordering::Relaxed),
            orders_rejected_full: self.orders_rejected_full.load(Ordering::Relaxed),
            orders_invalid: self.orders_invalid.load(Ordering::Relaxed),
            passes_run: self.passes_run.load(Ordering::Relaxed),
            trades_executed: self.trades_executed.load(Ordering::Relaxed),
            quantity_matched: self.quantity_matched.load(Ordering::Relaxed),
            notional_matched: self.notional_matched.load(Ordering::Relaxed),
            orders_requeued: self.orders_requeued.load(Ordering::Relaxed),
            orders_lost: self.orders_lost.load(Ordering::Relaxed),
        }
    }

    /// Export metrics as a BTreeMap for Prometheus-style exposition.
    pub fn export(&self) -> BTreeMap<String, u64> {
        self.snapshot().into_map()
    }
}

/// Plain copy of [`VenueMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub orders_accepted: u64,
    pub orders_rejected_full: u64,
    pub orders_invalid: u64,
    pub passes_run: u64,
    pub trades_executed: u64,
    pub quantity_matched: u64,
    pub notional_matched: u64,
    pub orders_requeued: u64,
    pub orders_lost: u64,
}

impl MetricsSnapshot {
    /// Orders that left the venue without trading
    pub fn orders_dropped(&self) -> u64 {
        self.orders_rejected_full + self.orders_lost
    }

    pub fn into_map(self) -> BTreeMap<String, u64> {
        let mut m = BTreeMap::new();
        m.insert("orders_accepted".to_string(), self.orders_accepted);
        m.insert("orders_rejected_full".to_string(), self.orders_rejected_full);
        m.insert("orders_invalid".to_string(), self.orders_invalid);
        m.insert("passes_run".to_string(), self.passes_run);
        m.insert("trades_executed".to_string(), self.trades_executed);
        m.insert("quantity_matched".to_string(), self.quantity_matched);
        m.insert("notional_matched".to_string(), self.notional_matched);
        m.insert("orders_requeued".to_string(), self.orders_requeued);
        m.insert("orders_lost".to_string(), self.orders_lost);
        m
    }
}
