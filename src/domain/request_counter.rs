//! Monotonic request counter used to correlate log entries.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-local counter incremented once per built log entry.
///
/// Owned by the logger and injected into the entry builder. Values restart at
/// 1 with every new counter, so they are not gap-free across restarts.
#[derive(Debug, Default)]
pub struct RequestCounter(AtomicU64);

impl RequestCounter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Increments the counter and returns the new value.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The last value handed out.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
