//! # Workload Runtime
//!
//! Wires one run together: launch the store, start the pool, decide when to
//! stop, stop the store and collect everything into a `RunReport`.
//!
//! ## Stop order
//!
//! 1. The pool ends on its own (bounded clients), the run duration elapses,
//!    or the caller's interrupt future resolves.
//! 2. The shutdown watch flips so unbounded clients leave their loops.
//! 3. The store is shut down; its report carries the final state.

use crate::config::DriverConfig;
use crate::pool::{ClientPool, PoolReport};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use state_owner::{launch_store, CountersSnapshot, OpCounters, ShutdownReport, Strategy};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info};

/// What ended the client phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCause {
    /// Every client exhausted its operation budget.
    ClientsFinished,
    /// The configured run duration elapsed.
    DurationElapsed,
    /// The caller interrupted the run (Ctrl-C in the binary).
    Interrupted,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub strategy: Strategy,
    pub stop_cause: StopCause,
    pub elapsed_ms: u64,
    pub counters: CountersSnapshot,
    pub pool: PoolReport,
    pub shutdown: ShutdownReport,
}

impl RunReport {
    /// The classic three-line summary.
    pub fn render_text(&self) -> String {
        format!(
            "Read Ops: {}\nWrite Ops: {}\nState: {}",
            self.counters.reads, self.counters.writes, self.shutdown.final_state
        )
    }
}

enum ClientPhase {
    Completed(PoolReport),
    Stop(StopCause),
}

pub struct WorkloadRuntime {
    config: DriverConfig,
}

impl WorkloadRuntime {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Run until the pool finishes or the run duration elapses.
    pub async fn run(&self) -> Result<RunReport> {
        self.run_until(std::future::pending()).await
    }

    /// Like `run`, but also stops early when `interrupt` resolves.
    pub async fn run_until<F>(&self, interrupt: F) -> Result<RunReport>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let store = launch_store(self.config.strategy, &self.config.owner);
        let counters = Arc::new(OpCounters::new());
        let pool = ClientPool::new(
            Arc::clone(&store),
            Arc::clone(&counters),
            self.config.pool.clone(),
        )
        .context("Invalid client pool configuration")?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let clients = pool.run(shutdown_rx);
        let deadline = deadline(self.config.run_duration);
        tokio::pin!(clients, deadline, interrupt);

        let phase = tokio::select! {
            report = &mut clients => ClientPhase::Completed(report),
            () = &mut deadline => ClientPhase::Stop(StopCause::DurationElapsed),
            () = &mut interrupt => ClientPhase::Stop(StopCause::Interrupted),
        };

        let (stop_cause, pool_report) = match phase {
            ClientPhase::Completed(report) => (StopCause::ClientsFinished, report),
            ClientPhase::Stop(cause) => {
                info!(cause = ?cause, "Signalling clients to stop");
                if shutdown_tx.send(true).is_err() {
                    debug!("No clients left to signal");
                }
                (cause, clients.await)
            }
        };

        let counters = counters.snapshot();
        let shutdown = store
            .shutdown()
            .await
            .context("Failed to shut down the state store")?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            strategy = %self.config.strategy,
            stop_cause = ?stop_cause,
            reads = counters.reads,
            writes = counters.writes,
            failures = counters.failures,
            elapsed_ms,
            "Run complete"
        );

        Ok(RunReport {
            strategy: self.config.strategy,
            stop_cause,
            elapsed_ms,
            counters,
            pool: pool_report,
            shutdown,
        })
    }
}

async fn deadline(limit: Option<Duration>) {
    match limit {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}
