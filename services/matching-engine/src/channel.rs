//! Bounded lock-free multi-producer single-consumer channel
//!
//! A fixed ring of slots driven by three monotonically increasing counters:
//!
//! - `head`: next slot the consumer reads
//! - `tail`: commit boundary, every slot below it is readable
//! - `reserved`: next slot a producer may claim
//!
//! with `head <= tail <= reserved <= head + capacity` at all times.
//!
//! Producers use a two-phase commit. A producer first reserves a slot index
//! with a CAS on `reserved`, writes its item into the slot without any
//! coordination, then waits until `tail` reaches its index and advances it
//! by one. Writes may finish in any order but items become visible to the
//! consumer strictly in reservation order.
//!
//! The consumer side is a separate [`Receiver`] handle. Exactly one exists
//! per channel and dequeueing needs `&mut Receiver`, so the single-consumer
//! rule is enforced by the type system instead of by convention.

use crossbeam_utils::{Backoff, CachePadded};
use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Slot<T> {
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

/// Fixed-capacity lock-free MPSC ring buffer
///
/// Shared by producers through an `Arc`. Counters are logical indices; the
/// physical slot is `counter % capacity`, so no index can leave the slot
/// array. Counter wrap-around is out of scope for a single run.
pub struct BoundedChannel<T> {
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
    reserved: CachePadded<AtomicUsize>,
    slots: Box<[Slot<T>]>,
}

// SAFETY: a slot is written only by the producer holding its reservation and
// read only by the single `Receiver`, with hand-off through the release/acquire
// pairs on `tail` (publish) and `head` (slot reuse). Items cross threads, so
// `T: Send` is required; `T: Sync` is not because no item is ever shared.
unsafe impl<T: Send> Sync for BoundedChannel<T> {}

impl<T> BoundedChannel<T> {
    /// Create a channel and its unique consumer handle
    ///
    /// # Panics
    /// Panics if `capacity` is zero
    pub fn with_capacity(capacity: usize) -> (Arc<Self>, Receiver<T>) {
        assert!(capacity > 0, "channel capacity must be non-zero");

        let channel = Arc::new(Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            reserved: CachePadded::new(AtomicUsize::new(0)),
            slots: (0..capacity).map(|_| Slot::empty()).collect(),
        });
        let receiver = Receiver {
            channel: Arc::clone(&channel),
        };

        (channel, receiver)
    }

    /// Try to append an item
    ///
    /// Returns the item back in `Err` when every slot is reserved. Never
    /// blocks except for the publish wait, which only lasts until producers
    /// holding earlier reservations have published.
    pub fn try_enqueue(&self, item: T) -> Result<(), T> {
        let capacity = self.slots.len();
        let backoff = Backoff::new();

        // Phase 1: reserve. `head` is loaded before `reserved`, so the
        // observed head never exceeds the observed reservation counter.
        let pos = loop {
            let head = self.head.load(Ordering::Acquire);
            let pos = self.reserved.load(Ordering::Acquire);
            if pos.wrapping_sub(head) >= capacity {
                return Err(item);
            }

            match self.reserved.compare_exchange_weak(
                pos,
                pos.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break pos,
                Err(_) => backoff.spin(),
            }
        };

        // Phase 2: write. The consumer released slot `pos - capacity` before
        // the `head` store we acquired above, so the slot is ours alone.
        unsafe {
            (*self.slot(pos).value.get()).write(item);
        }

        // Phase 3: publish in reservation order.
        let backoff = Backoff::new();
        while self.tail.load(Ordering::Acquire) != pos {
            backoff.snooze();
        }
        self.tail.store(pos.wrapping_add(1), Ordering::Release);

        Ok(())
    }

    /// Remove the oldest published item
    ///
    /// # Safety
    /// Must never run concurrently with another call on the same channel.
    /// Only [`Receiver`] calls it, through `&mut self`.
    unsafe fn dequeue(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head == tail {
            return None;
        }

        let item = (*self.slot(head).value.get()).assume_init_read();
        self.head.store(head.wrapping_add(1), Ordering::Release);
        Some(item)
    }

    fn slot(&self, pos: usize) -> &Slot<T> {
        &self.slots[pos % self.slots.len()]
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Published items waiting for the consumer
    ///
    /// A snapshot: producers and the consumer may move it immediately.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        tail.wrapping_sub(head)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Drop for BoundedChannel<T> {
    fn drop(&mut self) {
        // No producer can be mid-enqueue while we hold `&mut self`, so
        // `reserved == tail` and every slot in [head, tail) is initialised.
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut();
        let capacity = self.slots.len();

        let mut pos = head;
        while pos != tail {
            unsafe {
                self.slots[pos % capacity].value.get_mut().assume_init_drop();
            }
            pos = pos.wrapping_add(1);
        }
    }
}

impl<T> fmt::Debug for BoundedChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedChannel")
            .field("capacity", &self.capacity())
            .field("head", &self.head.load(Ordering::Relaxed))
            .field("tail", &self.tail.load(Ordering::Relaxed))
            .field("reserved", &self.reserved.load(Ordering::Relaxed))
            .finish()
    }
}

/// The single consumer of a [`BoundedChannel`]
///
/// Not `Clone`: holding the receiver is what makes a caller the consumer.
pub struct Receiver<T> {
    channel: Arc<BoundedChannel<T>>,
}

impl<T> Receiver<T> {
    /// Take the oldest published item, or `None` if nothing is published
    pub fn try_dequeue(&mut self) -> Option<T> {
        // SAFETY: `&mut self` on the only receiver excludes concurrent calls.
        unsafe { self.channel.dequeue() }
    }

    /// Dequeue until the channel reports empty
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { receiver: self }
    }

    /// The shared channel, for re-publishing or handing to producers
    pub fn channel(&self) -> &Arc<BoundedChannel<T>> {
        &self.channel
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver").field("channel", &self.channel).finish()
    }
}

/// Iterator returned by [`Receiver::drain`]
pub struct Drain<'a, T> {
    receiver: &'a mut Receiver<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receiver.try_dequeue()
    }
}
