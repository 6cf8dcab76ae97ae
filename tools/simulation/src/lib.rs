//! Order Flow Simulation
//!
//! Drives the matching venue with real threads: random order producers
//! submit concurrently while a single matcher sweeps every ticker on a
//! fixed interval.
//!
//! # Modules
//! - `config`: Run configuration and validation
//! - `bots`: Seeded random order producers
//! - `runner`: Producer/matcher threads and shutdown
//! - `scenarios`: Stress scenarios such as the order flood
//! - `metrics`: Run totals and the final report
//! - `export`: Report JSON export

pub mod bots;
pub mod config;
pub mod export;
pub mod metrics;
pub mod runner;
pub mod scenarios;

pub use config::{ConfigError, SimConfig};
pub use metrics::RunReport;
pub use runner::{run, SimError};

/// Crate version constant
pub const VERSION: &str = "1.0.0";
