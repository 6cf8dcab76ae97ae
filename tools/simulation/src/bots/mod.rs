//! Order flow bots
//!
//! Each bot owns a seeded RNG and runs on its own producer thread.

pub mod order_producer;

pub use order_producer::OrderProducer;
