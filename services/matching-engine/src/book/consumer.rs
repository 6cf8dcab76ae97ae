//! Consumer side of the order book
//!
//! Holds the single receiver of every ticker channel. Only one
//! `BookConsumer` exists per book and draining takes `&mut self`, so at most
//! one execution context dequeues from a ticker at a time.

use types::ids::TickerId;
use types::order::{Order, Side};

use crate::channel::Receiver;

/// Receivers of one ticker's channels
pub(crate) struct TickerReceivers {
    buys: Receiver<Order>,
    sells: Receiver<Order>,
}

impl TickerReceivers {
    pub(crate) fn new(buys: Receiver<Order>, sells: Receiver<Order>) -> Self {
        Self { buys, sells }
    }

    fn side(&self, side: Side) -> &Receiver<Order> {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }
}

/// Orders taken out of one ticker, in dequeue order per side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainedOrders {
    pub buys: Vec<Order>,
    pub sells: Vec<Order>,
}

impl DrainedOrders {
    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }

    /// Whether both sides have at least one order
    pub fn is_two_sided(&self) -> bool {
        !self.buys.is_empty() && !self.sells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buys.len() + self.sells.len()
    }
}

/// The matching side of an [`OrderBook`](crate::book::OrderBook)
pub struct BookConsumer {
    tickers: Box<[TickerReceivers]>,
}

impl BookConsumer {
    pub(crate) fn new(tickers: Vec<TickerReceivers>) -> Self {
        Self {
            tickers: tickers.into_boxed_slice(),
        }
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }

    /// Dequeue both of a ticker's channels until each reports empty
    ///
    /// # Panics
    /// Panics if `ticker` is outside the book
    pub fn drain_ticker(&mut self, ticker: TickerId) -> DrainedOrders {
        let receivers = &mut self.tickers[ticker.index()];
        DrainedOrders {
            buys: receivers.buys.drain().collect(),
            sells: receivers.sells.drain().collect(),
        }
    }

    /// Put an order back into its own (ticker, side) channel
    ///
    /// Returns the order in `Err` when the channel is full.
    ///
    /// # Panics
    /// Panics if the order's ticker is outside the book
    pub fn republish(&self, order: Order) -> Result<(), Order> {
        self.tickers[order.ticker.index()]
            .side(order.side)
            .channel()
            .try_enqueue(order)
    }
}

impl std::fmt::Debug for BookConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookConsumer")
            .field("ticker_count", &self.ticker_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::OrderBook;
    use types::config::VenueConfig;

    #[test]
    fn test_drain_preserves_dequeue_order() {
        let (book, mut consumer) = OrderBook::new(&VenueConfig::new(2, 8)).unwrap();

        book.submit(Side::Buy, 1, 10, 100).unwrap();
        book.submit(Side::Sell, 1, 20, 200).unwrap();
        book.submit(Side::Buy, 1, 30, 300).unwrap();

        let drained = consumer.drain_ticker(TickerId::new(1));
        let buy_quantities: Vec<_> = drained.buys.iter().map(|o| o.quantity.as_u32()).collect();
        assert_eq!(buy_quantities, vec![10, 30]);
        assert_eq!(drained.sells.len(), 1);
        assert!(drained.is_two_sided());
        assert_eq!(drained.len(), 3);

        // Channels are empty afterwards
        assert!(consumer.drain_ticker(TickerId::new(1)).is_empty());
        assert_eq!(book.resting_orders(), 0);
    }

    #[test]
    fn test_drain_only_touches_one_ticker() {
        let (book, mut consumer) = OrderBook::new(&VenueConfig::new(2, 8)).unwrap();

        book.submit(Side::Buy, 0, 10, 100).unwrap();
        book.submit(Side::Buy, 1, 10, 100).unwrap();

        let drained = consumer.drain_ticker(TickerId::new(0));
        assert_eq!(drained.buys.len(), 1);
        assert!(!drained.is_two_sided());
        assert_eq!(book.depth(TickerId::new(1), Side::Buy), Some(1));
    }

    #[test]
    fn test_republish_into_own_channel() {
        let (book, mut consumer) = OrderBook::new(&VenueConfig::new(1, 1)).unwrap();
        let order = Order::try_new(Side::Sell, 0, 5, 50).unwrap();

        assert_eq!(consumer.republish(order), Ok(()));
        assert_eq!(book.depth(TickerId::new(0), Side::Sell), Some(1));

        // Capacity 1: a second re-publish hands the order back
        assert_eq!(consumer.republish(order), Err(order));

        let drained = consumer.drain_ticker(TickerId::new(0));
        assert_eq!(drained.sells, vec![order]);
    }

    #[test]
    #[should_panic]
    fn test_drain_unknown_ticker_panics() {
        let (_book, mut consumer) = OrderBook::new(&VenueConfig::new(1, 1)).unwrap();
        consumer.drain_ticker(TickerId::new(1));
    }
}
