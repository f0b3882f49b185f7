use crate::domain::{Key, ShutdownReport, StateError, StateSnapshot, Strategy, Value};
use async_trait::async_trait;

/// Primary API for state operations.
///
/// Both strategies implement this trait so callers, tests and benchmarks can
/// swap one for the other without noticing anything but timing.
#[async_trait]
pub trait StateStoreApi: Send + Sync {
    /// Synchronization design behind this store.
    fn strategy(&self) -> Strategy;

    // === State Access ===

    /// Value for `key`, or 0 if it was never written.
    async fn read(&self, key: Key) -> Result<Value, StateError>;

    /// Set `key` to `value`. Resolves to `true` once the write is applied.
    async fn write(&self, key: Key, value: Value) -> Result<bool, StateError>;

    /// Ordered copy of the whole map.
    async fn snapshot(&self) -> Result<StateSnapshot, StateError>;

    // === Lifecycle ===

    /// Stop the store and return its final report.
    ///
    /// Only the first call succeeds; later calls return `OwnerStopped`.
    async fn shutdown(&self) -> Result<ShutdownReport, StateError>;

    /// True once the store no longer accepts requests.
    fn is_stopped(&self) -> bool;
}
