//! Types library for the lock-free trading venue
//!
//! This library provides the value types shared by the matching engine and
//! the simulation driver.
//!
//! # Modules
//! - `ids`: Ticker identifiers
//! - `numeric`: Integer price and quantity types
//! - `order`: Order and side types
//! - `trade`: Trade records
//! - `config`: Venue constants and book layout
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod config;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::config::*;
    pub use crate::errors::*;
}
