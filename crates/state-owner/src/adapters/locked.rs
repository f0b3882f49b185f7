//! # Lock-Guarded Store
//!
//! The shared-memory strategy: one `StateMap` behind a `parking_lot::Mutex`,
//! touched directly by every caller. Kept behind the same `StateStoreApi` as
//! the owner actor so the two can be compared.
//!
//! Critical sections are a single map lookup or insert, so callers block on
//! the mutex instead of yielding. With a request timeout configured the lock
//! is taken with `try_lock_for`, giving the same `Timeout` error the actor
//! returns.

use crate::domain::{
    Key, Operation, OwnerConfig, ShutdownPolicy, ShutdownReport, StateError, StateMap,
    StateSnapshot, Strategy, Value,
};
use crate::ports::StateStoreApi;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

/// Mutex-guarded state map.
pub struct LockedStateStore {
    state: Mutex<StateMap>,
    stopped: AtomicBool,
    request_timeout: Option<Duration>,
    policy: ShutdownPolicy,
    reads_served: AtomicU64,
    writes_served: AtomicU64,
    /// Callers past the stop check that have not left `with_state` yet.
    in_flight: AtomicU64,
    drained: AtomicU64,
    rejected: AtomicU64,
}

/// Holds one slot of `LockedStateStore::in_flight` until dropped.
struct InFlight<'a>(&'a AtomicU64);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicU64) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LockedStateStore {
    pub fn new(config: &OwnerConfig) -> Self {
        Self {
            state: Mutex::new(StateMap::new()),
            stopped: AtomicBool::new(false),
            request_timeout: config.request_timeout,
            policy: config.shutdown_policy,
            reads_served: AtomicU64::new(0),
            writes_served: AtomicU64::new(0),
            in_flight: AtomicU64::new(0),
            drained: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Run `f` with exclusive access to the map.
    ///
    /// A caller registers as in flight before the stop check, so `shutdown`
    /// can wait for everyone who got past it. Those late callers finish under
    /// `Drain` and count as drained; under `Reject` the flag is checked again
    /// once the lock is held and they fail instead.
    fn with_state<T>(
        &self,
        operation: Operation,
        f: impl FnOnce(&mut StateMap) -> T,
    ) -> Result<T, StateError> {
        let _in_flight = InFlight::enter(&self.in_flight);
        if self.is_stopped() {
            return Err(StateError::OwnerStopped);
        }

        let mut guard = match self.request_timeout {
            Some(limit) => self
                .state
                .try_lock_for(limit)
                .ok_or(StateError::Timeout {
                    operation,
                    timeout: limit,
                })?,
            None => self.state.lock(),
        };

        if self.is_stopped() {
            match self.policy {
                ShutdownPolicy::Drain => {
                    self.drained.fetch_add(1, Ordering::Relaxed);
                }
                ShutdownPolicy::Reject => {
                    self.rejected.fetch_add(1, Ordering::Relaxed);
                    return Err(StateError::OwnerStopped);
                }
            }
        }

        let output = f(&mut guard);
        match operation {
            Operation::Read => {
                self.reads_served.fetch_add(1, Ordering::Relaxed);
            }
            Operation::Write => {
                self.writes_served.fetch_add(1, Ordering::Relaxed);
            }
            Operation::Snapshot | Operation::Shutdown => {}
        }
        Ok(output)
    }
}

#[async_trait]
impl StateStoreApi for LockedStateStore {
    fn strategy(&self) -> Strategy {
        Strategy::SharedLock
    }

    async fn read(&self, key: Key) -> Result<Value, StateError> {
        self.with_state(Operation::Read, |state| state.get(key))
    }

    async fn write(&self, key: Key, value: Value) -> Result<bool, StateError> {
        self.with_state(Operation::Write, |state| state.set(key, value))?;
        Ok(true)
    }

    async fn snapshot(&self) -> Result<StateSnapshot, StateError> {
        self.with_state(Operation::Snapshot, |state| state.snapshot())
    }

    async fn shutdown(&self) -> Result<ShutdownReport, StateError> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Err(StateError::OwnerStopped);
        }

        // Late callers hold the mutex on other workers; let them finish.
        while self.in_flight.load(Ordering::SeqCst) > 0 {
            tokio::task::yield_now().await;
        }

        let final_state = self.state.lock().snapshot();
        let report = ShutdownReport {
            strategy: Strategy::SharedLock,
            reads_served: self.reads_served.load(Ordering::Relaxed),
            writes_served: self.writes_served.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            final_state,
        };

        info!(
            reads_served = report.reads_served,
            writes_served = report.writes_served,
            drained = report.drained,
            rejected = report.rejected,
            entries = report.final_state.len(),
            "Locked state store stopped"
        );
        Ok(report)
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
