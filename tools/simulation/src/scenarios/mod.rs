//! Scenario simulation modules
//!
//! Each scenario exercises specific venue behavior under stress conditions.

pub mod order_flood;

use serde::{Deserialize, Serialize};

/// Result of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub orders_submitted: u64,
    pub orders_accepted: u64,
    pub orders_rejected: u64,
    pub trades_executed: u64,
    pub passed: bool,
    pub details: String,
}
