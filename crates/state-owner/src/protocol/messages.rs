use super::slot::ResponseSlot;
use crate::domain::{Key, ShutdownReport, StateSnapshot, Value};

/// Look up `key`; the owner answers with its value (0 when absent).
#[derive(Debug)]
pub struct ReadRequest {
    pub key: Key,
    pub respond_to: ResponseSlot<Value>,
}

/// Set `key` to `value`; the owner answers `true` once applied.
#[derive(Debug)]
pub struct WriteRequest {
    pub key: Key,
    pub value: Value,
    pub respond_to: ResponseSlot<bool>,
}

/// Copy the whole map.
#[derive(Debug)]
pub struct SnapshotRequest {
    pub respond_to: ResponseSlot<StateSnapshot>,
}

/// End the owner loop; the owner answers with its final report.
#[derive(Debug)]
pub struct StopRequest {
    pub respond_to: ResponseSlot<ShutdownReport>,
}
