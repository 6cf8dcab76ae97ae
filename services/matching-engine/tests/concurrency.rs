//! Concurrency tests for the channel and the order book
//!
//! Runs real producer threads against a live consumer and checks that:
//! - Each producer's items come out in the order it enqueued them
//! - Nothing is lost or duplicated across the hand-off
//! - Occupancy never exceeds capacity
//! - Quantity is conserved while producers and the matcher interleave

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use matching_engine::{BoundedChannel, MatchingEngine};
use proptest::prelude::*;
use types::config::{RequeuePolicy, VenueConfig};
use types::ids::TickerId;
use types::order::Side;

const PRODUCERS: usize = 4;
const PER_PRODUCER: u64 = 5_000;

#[test]
fn test_fifo_per_producer_under_contention() {
    let (channel, mut receiver) = BoundedChannel::with_capacity(64);

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    let mut item = (producer, seq);
                    // Spin until the consumer makes room
                    while let Err(rejected) = channel.try_enqueue(item) {
                        item = rejected;
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    let total = PRODUCERS as u64 * PER_PRODUCER;
    let mut last_seen: Vec<Option<u64>> = vec![None; PRODUCERS];
    let mut seen = HashSet::new();
    let mut received = 0u64;

    while received < total {
        match receiver.try_dequeue() {
            Some((producer, seq)) => {
                if let Some(prev) = last_seen[producer] {
                    assert!(seq > prev, "producer {} went back from {} to {}", producer, prev, seq);
                }
                last_seen[producer] = Some(seq);
                assert!(seen.insert((producer, seq)), "duplicate item {:?}", (producer, seq));
                received += 1;
            }
            None => thread::yield_now(),
        }
        assert!(channel.len() <= channel.capacity());
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(seen.len() as u64, total);
    assert!(receiver.try_dequeue().is_none());
}

#[test]
fn test_accepted_count_never_exceeds_capacity() {
    let capacity = 32;
    let (channel, mut receiver) = BoundedChannel::with_capacity(capacity);
    let accepted = Arc::new(AtomicU64::new(0));

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|_| {
            let channel = Arc::clone(&channel);
            let accepted = Arc::clone(&accepted);
            thread::spawn(move || {
                for i in 0..1_000u32 {
                    if channel.try_enqueue(i).is_ok() {
                        accepted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // No consumer ran, so exactly `capacity` attempts could have succeeded
    assert_eq!(accepted.load(Ordering::Relaxed), capacity as u64);
    assert_eq!(receiver.drain().count(), capacity);
}

#[test]
fn test_quantity_conserved_with_live_matcher() {
    let config = VenueConfig::new(4, 32).with_requeue_policy(RequeuePolicy::Retry(8));
    let (mut engine, book) = MatchingEngine::with_config(&config).unwrap();
    let running = Arc::new(AtomicBool::new(true));
    let submitted = Arc::new(AtomicU64::new(0));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let book = Arc::clone(&book);
            let submitted = Arc::clone(&submitted);
            thread::spawn(move || {
                for i in 0..2_000u32 {
                    let side = if (i + producer as u32) % 2 == 0 { Side::Buy } else { Side::Sell };
                    let ticker = i % 4;
                    let quantity = 1 + i % 50;
                    let price = 10 + (i * 31 + producer as u32 * 7) % 991;
                    if book.submit(side, ticker, quantity, price).is_ok() {
                        submitted.fetch_add(u64::from(quantity), Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    let matcher = {
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut matched = 0u64;
            let mut lost = 0u64;
            while running.load(Ordering::Acquire) {
                let summary = engine.sweep();
                matched += summary.quantity_matched;
                lost += summary
                    .lost
                    .iter()
                    .map(|l| u64::from(l.order.quantity.as_u32()))
                    .sum::<u64>();
                thread::yield_now();
            }
            (engine, matched, lost)
        })
    };

    for handle in producers {
        handle.join().unwrap();
    }
    running.store(false, Ordering::Release);
    let (mut engine, mut matched, mut lost) = matcher.join().unwrap();

    // One last pass with no producers left
    let summary = engine.sweep();
    matched += summary.quantity_matched;
    lost += summary
        .lost
        .iter()
        .map(|l| u64::from(l.order.quantity.as_u32()))
        .sum::<u64>();

    let final_pass = engine.sweep();
    assert_eq!(final_pass.trades, 0, "a settled book has nothing left to cross");
    assert!(final_pass.lost.is_empty());

    let snapshot = book.metrics().snapshot();
    assert_eq!(snapshot.quantity_matched, matched);

    let (book, mut consumer) = engine.into_parts();
    let mut resting = 0u64;
    for ticker in TickerId::all(book.ticker_count()) {
        for side in [Side::Buy, Side::Sell] {
            assert!(book.depth(ticker, side).unwrap() <= book.channel_capacity());
        }
        let drained = consumer.drain_ticker(ticker);
        resting += drained
            .buys
            .iter()
            .chain(&drained.sells)
            .map(|o| u64::from(o.quantity.as_u32()))
            .sum::<u64>();
    }

    assert_eq!(submitted.load(Ordering::Relaxed), resting + 2 * matched + lost);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn occupancy_tracks_accepted_minus_dequeued(
        capacity in 1usize..16,
        ops in prop::collection::vec(any::<bool>(), 0..200),
    ) {
        let (channel, mut receiver) = BoundedChannel::with_capacity(capacity);
        let mut expected = std::collections::VecDeque::new();
        let mut next = 0u32;

        for enqueue in ops {
            if enqueue {
                let accepted = channel.try_enqueue(next).is_ok();
                prop_assert_eq!(accepted, expected.len() < capacity);
                if accepted {
                    expected.push_back(next);
                }
                next += 1;
            } else {
                prop_assert_eq!(receiver.try_dequeue(), expected.pop_front());
            }
            prop_assert_eq!(channel.len(), expected.len());
            prop_assert!(channel.len() <= capacity);
        }
    }
}
