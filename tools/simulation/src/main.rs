use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use simulation::export::{build_export, write_to_file};
use simulation::scenarios::order_flood::{self, OrderFloodConfig};
use simulation::SimConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "simulation")]
#[command(about = "Concurrent order producers against a lock-free matching venue")]
struct Cli {
    /// Run time in seconds (non-positive uses the default of 2)
    #[arg(allow_negative_numbers = true)]
    seconds: Option<i64>,

    /// Number of producer threads (non-positive uses the default of 3)
    #[arg(allow_negative_numbers = true)]
    producers: Option<i64>,

    /// Base RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between orders of one producer
    #[arg(long)]
    producer_interval_ms: Option<u64>,

    /// Pause between matcher sweeps
    #[arg(long)]
    matcher_interval_ms: Option<u64>,

    /// Write the JSON report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Run the order flood scenario with this many orders instead
    #[arg(long)]
    flood: Option<usize>,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        let mut config = SimConfig::default().with_positional(self.seconds, self.producers);
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(ms) = self.producer_interval_ms {
            config.producer_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.matcher_interval_ms {
            config.matcher_interval = Duration::from_millis(ms);
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let export = if let Some(total) = cli.flood {
        let result = order_flood::run(&OrderFloodConfig::with_burst(total))
            .context("order flood scenario failed")?;
        info!("{}", result.details);
        build_export(None, vec![result])
    } else {
        let report = simulation::run(&cli.sim_config()).context("simulation failed")?;
        info!("{}", report.summary());
        build_export(Some(report), vec![])
    };

    if let Some(path) = &cli.report {
        write_to_file(&export, path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Report written");
    }

    Ok(())
}
