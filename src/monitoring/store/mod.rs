//! Fixed-capacity event storage
//!
//! An [`EventStore`] is an append-only ring buffer guarded by a single lock.
//! Appending to a full store evicts the oldest entry, so the store never
//! holds more than its capacity at any observation point. Reads always hand
//! out a copy taken under the lock; the live buffer is never exposed.

mod bounded;

pub use bounded::{DEFAULT_EVENT_CAPACITY, DEFAULT_HISTORY_CAPACITY};
pub(crate) use bounded::BoundedPush;

use super::types::Timestamped;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Bounded FIFO of events with oldest-first eviction
#[derive(Debug)]
pub struct EventStore<T> {
    capacity: usize,
    events: Mutex<VecDeque<T>>,
    evicted: AtomicU64,
}

impl<T: Clone> EventStore<T> {
    /// Create a store holding at most `capacity` events (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_CAPACITY))),
            evicted: AtomicU64::new(0),
        }
    }

    /// Append an event, evicting the oldest one when full
    pub fn append(&self, event: T) {
        let evicted = self.events.lock().push_bounded(event, self.capacity);
        if evicted > 0 {
            self.evicted.fetch_add(evicted as u64, Ordering::Relaxed);
        }
    }

    /// Copy of all stored events in insertion order
    pub fn snapshot(&self) -> Vec<T> {
        self.events.lock().iter().cloned().collect()
    }

    /// Copy of the stored events matching `predicate`, in insertion order
    pub fn snapshot_filtered<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.events
            .lock()
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    /// Copy of the newest `n` events, oldest first
    pub fn latest(&self, n: usize) -> Vec<T> {
        let events = self.events.lock();
        let skip = events.len().saturating_sub(n);
        events.iter().skip(skip).cloned().collect()
    }

    /// Most recently appended event
    pub fn last(&self) -> Option<T> {
        self.events.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total events dropped by overflow since creation
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl<T: Clone + Timestamped> EventStore<T> {
    /// Drop events older than `cutoff`; returns how many were removed
    pub fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut events = self.events.lock();
        let before = events.len();
        // Wall-clock timestamps are not monotonic across appending threads.
        events.retain(|e| e.timestamp() >= cutoff);
        before - events.len()
    }

    /// Copy of events with `timestamp >= since`
    pub fn since(&self, since: DateTime<Utc>) -> Vec<T> {
        self.snapshot_filtered(|e| e.timestamp() >= since)
    }
}
