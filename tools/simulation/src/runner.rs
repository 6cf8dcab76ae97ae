//! Threaded simulation runner
//!
//! Spawns the producer threads and a single matcher thread around one
//! shared book. A shared running flag stops every loop; after the threads
//! are joined one last sweep settles whatever was submitted late.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::Utc;
use matching_engine::{BookError, MatchingEngine, OrderBook};
use thiserror::Error;
use tracing::{debug, info};
use types::ids::TickerId;

use crate::bots::order_producer::{OrderProducer, ProducerStats};
use crate::config::{ConfigError, SimConfig};
use crate::metrics::{MatchStats, RestingBook, RunReport};

/// Simulation errors
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build order book: {0}")]
    Book(#[from] BookError),

    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

/// Run a full simulation and report on it
pub fn run(config: &SimConfig) -> Result<RunReport, SimError> {
    config.validate()?;

    let started_at = Utc::now();
    let clock = Instant::now();
    let (engine, book) = MatchingEngine::with_config(&config.venue)?;
    let running = Arc::new(AtomicBool::new(true));

    info!(
        producers = config.producers,
        seconds = config.duration.as_secs_f64(),
        tickers = config.venue.ticker_count,
        seed = config.seed,
        "Starting simulation"
    );

    let producers = (0..config.producers)
        .map(|id| spawn_producer(OrderProducer::from_config(id, config), &book, &running, config.producer_interval))
        .collect::<Result<Vec<_>, _>>()?;
    let matcher = spawn_matcher(engine, &running, config.matcher_interval)?;

    thread::sleep(config.duration);
    running.store(false, Ordering::Release);

    let producer_stats = producers
        .into_iter()
        .map(|handle| handle.join().map_err(|_| SimError::ThreadPanicked("producer")))
        .collect::<Result<Vec<_>, _>>()?;
    let (mut engine, mut match_stats) = matcher
        .join()
        .map_err(|_| SimError::ThreadPanicked("matcher"))?;

    // Producers are gone; settle what they submitted after the last sweep
    match_stats.absorb(&engine.sweep());

    let venue = book.metrics().snapshot();
    let resting = settle(engine);
    let elapsed = clock.elapsed();

    let report = RunReport::new(
        config.seed,
        config.venue.ticker_count,
        started_at,
        Utc::now(),
        elapsed,
        &producer_stats,
        &match_stats,
        resting,
        venue,
    );

    info!(
        orders = report.orders_submitted,
        accepted = report.orders_accepted,
        dropped = report.orders_rejected_full,
        trades = report.trades,
        matched = report.quantity_matched,
        lost = report.orders_lost,
        resting = report.resting_orders,
        "Simulation complete"
    );

    Ok(report)
}

fn spawn_producer(
    mut producer: OrderProducer,
    book: &Arc<OrderBook>,
    running: &Arc<AtomicBool>,
    interval: Duration,
) -> std::io::Result<JoinHandle<ProducerStats>> {
    let book = Arc::clone(book);
    let running = Arc::clone(running);

    thread::Builder::new()
        .name(format!("producer-{}", producer.id))
        .spawn(move || {
            while running.load(Ordering::Acquire) {
                if let Err(err) = producer.tick(&book) {
                    debug!(producer = producer.id, %err, "Submit failed");
                }
                thread::sleep(interval);
            }
            debug!(producer = producer.id, submitted = producer.stats.orders_submitted, "Producer stopped");
            producer.stats
        })
}

fn spawn_matcher(
    mut engine: MatchingEngine,
    running: &Arc<AtomicBool>,
    interval: Duration,
) -> std::io::Result<JoinHandle<(MatchingEngine, MatchStats)>> {
    let running = Arc::clone(running);

    thread::Builder::new()
        .name("matcher".to_string())
        .spawn(move || {
            let mut stats = MatchStats::default();
            while running.load(Ordering::Acquire) {
                stats.absorb(&engine.sweep());
                thread::sleep(interval);
            }
            (engine, stats)
        })
}

/// Drain every ticker and measure what is still resting
fn settle(engine: MatchingEngine) -> RestingBook {
    let (book, mut consumer) = engine.into_parts();
    let mut resting = RestingBook::default();

    for ticker in TickerId::all(book.ticker_count()) {
        let drained = consumer.drain_ticker(ticker);
        resting.orders += drained.len() as u64;
        resting.quantity += drained
            .buys
            .iter()
            .chain(&drained.sells)
            .map(|o| u64::from(o.quantity.as_u32()))
            .sum::<u64>();
    }

    resting
}
