//! Implementations of `StateStoreApi`, one per `Strategy`.

pub mod actor;
pub mod locked;

pub use actor::*;
pub use locked::*;

use crate::domain::{OwnerConfig, Strategy};
use crate::ports::StateStoreApi;
use std::sync::Arc;
use tracing::info;

/// Build a store for `strategy` behind the common interface.
///
/// The message-passing store spawns its owner task, so this must run inside a
/// tokio runtime.
pub fn launch_store(strategy: Strategy, config: &OwnerConfig) -> Arc<dyn StateStoreApi> {
    info!(
        strategy = %strategy,
        mailbox_capacity = config.mailbox_capacity,
        request_timeout_ms = config
            .request_timeout
            .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
        shutdown_policy = %config.shutdown_policy,
        "Launching state store"
    );

    match strategy {
        Strategy::MessagePassing => Arc::new(StateOwner::start(config)),
        Strategy::SharedLock => Arc::new(LockedStateStore::new(config)),
    }
}
