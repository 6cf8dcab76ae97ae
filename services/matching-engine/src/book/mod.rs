//! Order book infrastructure module
//!
//! Contains the producer-facing book and its single consumer.

pub mod order_book;
pub mod consumer;

pub use order_book::{BookError, OrderBook};
pub use consumer::{BookConsumer, DrainedOrders};
