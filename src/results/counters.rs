//! Atomic session counters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;

use crate::models::HostStatus;

/// A merge that would push a bucket past `u64::MAX`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Adding {delta:?} to {current:?} would overflow the counters")]
pub struct CounterOverflow {
    pub current: CounterSnapshot,
    pub delta: CounterSnapshot,
}

/// Running totals for one runner instance
///
/// Increment-only. Each bucket is updated with a single atomic add, so units
/// running on different threads never observe a torn value.
#[derive(Debug, Default)]
pub struct Counters {
    total: AtomicU64,
    success: AtomicU64,
    failure: AtomicU64,
    error: AtomicU64,
    merging: Mutex<()>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one emitted event
    ///
    /// Anything that is neither a success nor an error lands in the failure
    /// bucket, skipped events included.
    pub fn record(&self, status: HostStatus) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let bucket = match status {
            HostStatus::Success => &self.success,
            HostStatus::Error => &self.error,
            HostStatus::Failure | HostStatus::Skipped => &self.failure,
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }

    /// Add a worker's totals into these counters
    ///
    /// All four buckets are checked before any is touched, so a rejected
    /// delta leaves the counters as they were.
    pub fn merge(&self, delta: &CounterSnapshot) -> Result<(), CounterOverflow> {
        let _guard = self.merging.lock().unwrap_or_else(|e| e.into_inner());

        let current = self.snapshot();
        if current.checked_add(delta).is_none() {
            return Err(CounterOverflow {
                current,
                delta: *delta,
            });
        }

        self.total.fetch_add(delta.total, Ordering::Relaxed);
        self.success.fetch_add(delta.success, Ordering::Relaxed);
        self.failure.fetch_add(delta.failure, Ordering::Relaxed);
        self.error.fetch_add(delta.error, Ordering::Relaxed);
        Ok(())
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total: self.total.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            failure: self.failure.load(Ordering::Relaxed),
            error: self.error.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of the counters at one point in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub error: u64,
}

impl CounterSnapshot {
    pub fn new(total: u64, success: u64, failure: u64, error: u64) -> Self {
        Self {
            total,
            success,
            failure,
            error,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.total == self.success
    }

    /// Bucket-wise sum, `None` if any bucket overflows
    pub fn checked_add(&self, other: &CounterSnapshot) -> Option<CounterSnapshot> {
        Some(CounterSnapshot {
            total: self.total.checked_add(other.total)?,
            success: self.success.checked_add(other.success)?,
            failure: self.failure.checked_add(other.failure)?,
            error: self.error.checked_add(other.error)?,
        })
    }

    pub fn heading(&self) -> &'static str {
        if self.is_passed() {
            "Passed"
        } else {
            "Failed"
        }
    }
}

impl fmt::Display for CounterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Total {}, Failed {}, Errors {}, Passed {}",
            self.heading(),
            self.total,
            self.failure,
            self.error,
            self.success
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_record_buckets() {
        let counters = Counters::new();
        counters.record(HostStatus::Success);
        counters.record(HostStatus::Failure);
        counters.record(HostStatus::Error);
        counters.record(HostStatus::Skipped);

        assert_eq!(counters.snapshot(), CounterSnapshot::new(4, 1, 2, 1));
    }

    #[test]
    fn test_merge_adds_delta() {
        let counters = Counters::new();
        counters.record(HostStatus::Success);
        counters.merge(&CounterSnapshot::new(7, 5, 1, 1)).unwrap();

        assert_eq!(counters.snapshot(), CounterSnapshot::new(8, 6, 1, 1));
    }

    #[test]
    fn test_overflowing_merge_is_rejected_whole() {
        let counters = Counters::new();
        counters.merge(&CounterSnapshot::new(1, 1, 0, 0)).unwrap();

        let delta = CounterSnapshot::new(u64::MAX, u64::MAX, 0, 0);
        let err = counters.merge(&delta).unwrap_err();

        assert_eq!(err.current, CounterSnapshot::new(1, 1, 0, 0));
        assert_eq!(err.delta, delta);
        assert_eq!(counters.snapshot(), CounterSnapshot::new(1, 1, 0, 0));

        // only the last bucket overflows; earlier ones must not move either
        counters.merge(&CounterSnapshot::new(0, 0, 0, u64::MAX)).unwrap();
        assert!(counters.merge(&CounterSnapshot::new(2, 2, 0, 1)).is_err());
        assert_eq!(counters.snapshot(), CounterSnapshot::new(1, 1, 0, u64::MAX));
    }

    #[test]
    fn test_concurrent_records() {
        let counters = Arc::new(Counters::new());
        let statuses = [HostStatus::Success, HostStatus::Failure, HostStatus::Error];

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let counters = counters.clone();
                thread::spawn(move || {
                    for i in 0..1000 {
                        counters.record(statuses[(t + i) % 3]);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.total, 8000);
        assert_eq!(snapshot.success + snapshot.failure + snapshot.error, 8000);

        let expected = |offset: usize| -> u64 {
            (0..8usize)
                .map(|t| (0..1000usize).filter(|i| (t + i) % 3 == offset).count() as u64)
                .sum()
        };
        assert_eq!(snapshot.success, expected(0));
        assert_eq!(snapshot.failure, expected(1));
        assert_eq!(snapshot.error, expected(2));
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            CounterSnapshot::new(3, 2, 1, 0).to_string(),
            "Failed: Total 3, Failed 1, Errors 0, Passed 2"
        );
        assert_eq!(
            CounterSnapshot::new(2, 2, 0, 0).to_string(),
            "Passed: Total 2, Failed 0, Errors 0, Passed 2"
        );
        assert_eq!(CounterSnapshot::default().heading(), "Passed");
    }
}
