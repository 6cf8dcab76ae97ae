//! Price bucket sort
//!
//! Prices live in a small discrete domain, so a counting sort over one
//! bucket per price level orders n orders in O(levels + n) without a single
//! comparison. The sort is stable: orders sharing a price keep their
//! dequeue order, which is what gives earlier orders priority at a level.

use types::config::PRICE_LEVELS;
use types::order::Order;

/// Direction in which price buckets are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrder {
    /// Lowest price first (sells)
    Ascending,
    /// Highest price first (buys)
    Descending,
}

/// Reusable scratch space for bucket sorting
///
/// Holds one counter per price level so repeated passes do not reallocate.
#[derive(Debug, Clone)]
pub struct PriceBuckets {
    offsets: Vec<usize>,
}

impl PriceBuckets {
    pub fn new() -> Self {
        Self {
            offsets: vec![0; PRICE_LEVELS],
        }
    }

    /// Sort live orders by price in the given direction
    ///
    /// Filled orders (zero quantity) are dropped from the output.
    pub fn sort(&mut self, orders: &[Order], direction: PriceOrder) -> Vec<Order> {
        self.offsets.fill(0);

        let mut live = 0;
        for order in orders.iter().filter(|o| !o.is_filled()) {
            self.offsets[order.price.bucket()] += 1;
            live += 1;
        }

        // Exclusive prefix sum in visiting order: counts become start offsets
        let mut next = 0;
        let mut to_offset = |slot: &mut usize| {
            let count = *slot;
            *slot = next;
            next += count;
        };
        match direction {
            PriceOrder::Ascending => self.offsets.iter_mut().for_each(&mut to_offset),
            PriceOrder::Descending => self.offsets.iter_mut().rev().for_each(&mut to_offset),
        }

        let mut sorted: Vec<Option<Order>> = vec![None; live];
        for order in orders.iter().filter(|o| !o.is_filled()) {
            let offset = &mut self.offsets[order.price.bucket()];
            sorted[*offset] = Some(*order);
            *offset += 1;
        }

        sorted.into_iter().flatten().collect()
    }
}

impl Default for PriceBuckets {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off bucket sort with fresh scratch space
pub fn bucket_sort(orders: &[Order], direction: PriceOrder) -> Vec<Order> {
    PriceBuckets::new().sort(orders, direction)
}
