//! Operation counters for client-side reporting.
//!
//! Clients bump these after a response arrives. The counters are plain
//! `AtomicU64`s shared through an `Arc`; construct one per run and hand a clone
//! to every client.
//!
//! ## Usage
//!
//! ```
//! use state_owner::OpCounters;
//! use std::sync::Arc;
//!
//! let counters = Arc::new(OpCounters::new());
//! counters.increment_read_count();
//! counters.increment_write_count();
//!
//! let snapshot = counters.snapshot();
//! assert_eq!(snapshot.reads, 1);
//! assert_eq!(snapshot.writes, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Completed-operation counters.
#[derive(Debug, Default)]
pub struct OpCounters {
    /// Reads that received a response
    reads: AtomicU64,
    /// Writes that received an acknowledgment
    writes: AtomicU64,
    /// Requests that ended in an error (timeout or stopped owner)
    failures: AtomicU64,
}

impl OpCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_read_count(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_write_count(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Current values.
    ///
    /// Each counter is loaded separately, so the snapshot is not atomic with
    /// respect to requests still in flight.
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            reads: self.read_count(),
            writes: self.write_count(),
            failures: self.failure_count(),
        }
    }
}

/// Plain copy of `OpCounters`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountersSnapshot {
    pub reads: u64,
    pub writes: u64,
    pub failures: u64,
}

impl CountersSnapshot {
    /// Reads plus writes.
    pub fn completed(&self) -> u64 {
        self.reads + self.writes
    }
}
