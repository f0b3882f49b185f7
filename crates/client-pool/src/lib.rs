//! # Client Pool
//!
//! Load driver for the `state-owner` stores.
//!
//! A pool of reader tasks and writer tasks issues random requests against
//! one store, the shared `OpCounters` tally what completed, and a
//! `WorkloadRuntime` ties the run together and produces a `RunReport`.
//!
//! ```text
//! ┌──────────────┐  read/write   ┌───────────────────┐
//! │ reader tasks │──────────────►│                   │
//! └──────────────┘               │  StateStoreApi    │
//! ┌──────────────┐  read/write   │  (owner or mutex) │
//! │ writer tasks │──────────────►│                   │
//! └──────┬───────┘               └───────────────────┘
//!        │ increment
//!        ▼
//!   OpCounters ──► RunReport
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod pool;
pub mod runtime;
pub mod telemetry;

pub use config::{ClientPoolConfig, ConfigError, DriverConfig, LogConfig};
pub use pool::{ClientExit, ClientPool, ClientRole, PoolReport};
pub use runtime::{RunReport, StopCause, WorkloadRuntime};
pub use telemetry::{init_logging, TelemetryError};
