use super::Operation;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("{operation} request timed out after {timeout:?}")]
    Timeout {
        operation: Operation,
        timeout: Duration,
    },

    #[error("State owner has stopped")]
    OwnerStopped,
}

/// Failure to parse a strategy or policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("unknown shutdown policy '{0}'")]
    UnknownShutdownPolicy(String),
}

impl StateError {
    /// True when the store will never answer again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StateError::OwnerStopped)
    }
}
