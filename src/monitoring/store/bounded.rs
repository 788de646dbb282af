//! Bounded collection utilities

use std::collections::VecDeque;

/// Default capacity of the error and request event stores
pub const DEFAULT_EVENT_CAPACITY: usize = 10_000;

/// Default capacity of secondary histories (lifecycle records, measurements)
pub const DEFAULT_HISTORY_CAPACITY: usize = 1_000;

/// Helper trait for bounded VecDeque operations
pub(crate) trait BoundedPush<T> {
    /// Push a value, evicting from the front while at capacity.
    /// Returns the number of evicted entries.
    fn push_bounded(&mut self, value: T, max_size: usize) -> usize;
}

impl<T> BoundedPush<T> for VecDeque<T> {
    #[inline]
    fn push_bounded(&mut self, value: T, max_size: usize) -> usize {
        let mut evicted = 0;
        while self.len() >= max_size && self.pop_front().is_some() {
            evicted += 1;
        }
        self.push_back(value);
        evicted
    }
}
