//! # Client Pool
//!
//! Reader and writer tasks that hammer a `StateStoreApi`.
//!
//! Each client issues one request with a random key (writers also pick a
//! random value), waits for its own response, bumps the matching counter,
//! sleeps the configured delay and repeats. A client exits when it reaches
//! its operation budget, when shutdown is signalled, or when the store
//! reports that it has stopped.

use crate::config::{ClientPoolConfig, ConfigError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use state_owner::{OpCounters, StateError, StateStoreApi};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// What a client does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientRole {
    Reader,
    Writer,
}

/// Why a client stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientExit {
    /// Issued its full operation budget.
    Finished,
    /// Saw the shutdown signal.
    Shutdown,
    /// The store stopped answering.
    OwnerStopped,
}

/// Exit tallies for one pool run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReport {
    pub reader_count: usize,
    pub writer_count: usize,
    pub finished: usize,
    pub shutdown: usize,
    pub owner_stopped: usize,
    /// Client tasks that panicked or were cancelled.
    pub aborted: usize,
}

impl PoolReport {
    fn record(&mut self, exit: ClientExit) {
        match exit {
            ClientExit::Finished => self.finished += 1,
            ClientExit::Shutdown => self.shutdown += 1,
            ClientExit::OwnerStopped => self.owner_stopped += 1,
        }
    }

    /// Total clients accounted for.
    pub fn total(&self) -> usize {
        self.finished + self.shutdown + self.owner_stopped + self.aborted
    }
}

/// Spawns and supervises the reader and writer tasks.
pub struct ClientPool {
    store: Arc<dyn StateStoreApi>,
    counters: Arc<OpCounters>,
    config: ClientPoolConfig,
}

impl ClientPool {
    /// Fails if `config` describes an empty key or value range.
    pub fn new(
        store: Arc<dyn StateStoreApi>,
        counters: Arc<OpCounters>,
        config: ClientPoolConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store,
            counters,
            config,
        })
    }

    pub fn counters(&self) -> Arc<OpCounters> {
        Arc::clone(&self.counters)
    }

    /// Run every client to completion.
    ///
    /// Returns once all clients have exited; flip `shutdown` to `true` to make
    /// unbounded clients stop.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> PoolReport {
        info!(
            readers = self.config.reader_count,
            writers = self.config.writer_count,
            key_space = self.config.key_space,
            ops_per_client = ?self.config.ops_per_client,
            "Starting client pool"
        );

        let roles = std::iter::repeat(ClientRole::Reader)
            .take(self.config.reader_count)
            .chain(std::iter::repeat(ClientRole::Writer).take(self.config.writer_count));

        let mut tasks = JoinSet::new();
        for (id, role) in roles.enumerate() {
            let client = Client {
                id,
                role,
                store: Arc::clone(&self.store),
                counters: Arc::clone(&self.counters),
                config: self.config.clone(),
            };
            tasks.spawn(client.run(shutdown.clone()));
        }

        let mut report = PoolReport {
            reader_count: self.config.reader_count,
            writer_count: self.config.writer_count,
            ..PoolReport::default()
        };
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(exit) => report.record(exit),
                Err(e) => {
                    error!(error = %e, "Client task aborted");
                    report.aborted += 1;
                }
            }
        }

        info!(
            finished = report.finished,
            shutdown = report.shutdown,
            owner_stopped = report.owner_stopped,
            aborted = report.aborted,
            "Client pool drained"
        );
        report
    }
}

/// One reader or writer.
struct Client {
    id: usize,
    role: ClientRole,
    store: Arc<dyn StateStoreApi>,
    counters: Arc<OpCounters>,
    config: ClientPoolConfig,
}

impl Client {
    async fn run(self, mut shutdown: watch::Receiver<bool>) -> ClientExit {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.id as u64)),
            None => StdRng::from_entropy(),
        };
        let delay = self.config.inter_request_delay;
        let mut issued = 0u64;

        loop {
            if self.config.ops_per_client.is_some_and(|limit| issued >= limit) {
                return ClientExit::Finished;
            }
            if *shutdown.borrow() {
                return ClientExit::Shutdown;
            }

            let key = rng.gen_range(0..self.config.key_space);
            let outcome = match self.role {
                ClientRole::Reader => self.store.read(key).await.map(|_| ()),
                ClientRole::Writer => {
                    let value = rng.gen_range(0..self.config.value_space);
                    self.store.write(key, value).await.map(|_| ())
                }
            };
            issued += 1;

            match outcome {
                Ok(()) => match self.role {
                    ClientRole::Reader => self.counters.increment_read_count(),
                    ClientRole::Writer => self.counters.increment_write_count(),
                },
                Err(StateError::OwnerStopped) => {
                    self.counters.record_failure();
                    debug!(client = self.id, role = ?self.role, "Store stopped, client exiting");
                    return ClientExit::OwnerStopped;
                }
                Err(e) => {
                    self.counters.record_failure();
                    warn!(client = self.id, role = ?self.role, key, error = %e, "Request failed");
                }
            }

            // The locked store never suspends, so an unpaced client must give
            // the scheduler a turn or it starves timers and signals.
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            return ClientExit::Shutdown;
                        }
                    }
                }
            }
        }
    }
}
