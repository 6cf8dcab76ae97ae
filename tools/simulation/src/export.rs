//! Report export
//!
//! Serializes run reports and scenario results to JSON for external
//! consumption.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::metrics::RunReport;
use crate::scenarios::ScenarioResult;

/// Combined export containing all simulation outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationExport {
    pub version: String,
    pub report: Option<RunReport>,
    pub scenarios: Vec<ScenarioResult>,
}

/// Build a complete simulation export.
pub fn build_export(report: Option<RunReport>, scenarios: Vec<ScenarioResult>) -> SimulationExport {
    SimulationExport {
        version: crate::VERSION.to_string(),
        report,
        scenarios,
    }
}

/// Export complete simulation data as JSON.
pub fn export_json(export: &SimulationExport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(export)
}

/// Write export to a file path.
pub fn write_to_file(export: &SimulationExport, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = export_json(export)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ScenarioResult {
        ScenarioResult {
            name: "order_flood".to_string(),
            orders_submitted: 10,
            orders_accepted: 4,
            orders_rejected: 6,
            trades_executed: 2,
            passed: true,
            details: String::new(),
        }
    }

    #[test]
    fn test_build_export() {
        let export = build_export(None, vec![]);
        assert_eq!(export.version, crate::VERSION);
        assert!(export.report.is_none());
        assert!(export.scenarios.is_empty());
    }

    #[test]
    fn test_export_json_roundtrip() {
        let export = build_export(None, vec![scenario()]);
        let json = export_json(&export).unwrap();
        let parsed: SimulationExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, crate::VERSION);
        assert_eq!(parsed.scenarios, vec![scenario()]);
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join(format!("simulation-export-{}.json", std::process::id()));
        write_to_file(&build_export(None, vec![scenario()]), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"order_flood\""));
        std::fs::remove_file(&path).unwrap();
    }
}
