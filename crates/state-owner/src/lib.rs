//! # state-owner
//!
//! Integer key/value state that is owned by exactly one task.
//!
//! ## Role in System
//!
//! - **Single Owner**: the `StateOwner` task is the only code that ever touches
//!   the map; everybody else sends it messages.
//! - **Request/Response**: every request carries its own single-use
//!   `ResponseSlot`, and the caller waits on that slot alone.
//! - **Lock-based twin**: `LockedStateStore` offers the same `StateStoreApi`
//!   behind a mutex so both designs can be tested and benchmarked side by side.
//!
//! ## Message Flow
//!
//! ```text
//! [Client]──ReadRequest──→ read mailbox ──┐
//!    ↑                                    │
//! [Client]──WriteRequest─→ write mailbox ─┼──→ [StateOwner] (owns StateMap)
//!    ↑                                    │          │
//!    │                   stop channel ────┘          │
//!    └──────────────── ResponseSlot ←───────────────┘
//! ```
//!
//! ## Shutdown
//!
//! A dedicated stop channel ends the owner loop. Requests already sitting in
//! a mailbox are served or rejected according to `ShutdownPolicy`, and every
//! later request fails with `StateError::OwnerStopped`.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod protocol;

pub use adapters::*;
pub use domain::*;
pub use metrics::{CountersSnapshot, OpCounters};
pub use ports::*;
pub use protocol::*;

/// Default bound on each owner mailbox.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 64;

/// Capacity of the stop channel. One pending stop is enough; later callers wait
/// or observe the owner already gone.
pub const STOP_CHANNEL_CAPACITY: usize = 1;
