//! # Store Configuration
//!
//! Tunables shared by both strategies. All values have sane defaults.

use super::ParseError;
use crate::DEFAULT_MAILBOX_CAPACITY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default bound on a single request round-trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// What happens to requests already queued when a stop arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownPolicy {
    /// Serve everything already enqueued, then exit.
    #[default]
    Drain,
    /// Drop everything already enqueued; those callers get `OwnerStopped`.
    Reject,
}

impl fmt::Display for ShutdownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownPolicy::Drain => f.write_str("drain"),
            ShutdownPolicy::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for ShutdownPolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drain" => Ok(ShutdownPolicy::Drain),
            "reject" => Ok(ShutdownPolicy::Reject),
            other => Err(ParseError::UnknownShutdownPolicy(other.to_string())),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerConfig {
    /// Bound on each owner mailbox. Senders wait when it is full.
    pub mailbox_capacity: usize,
    /// Bound on one request round-trip (enqueue plus response).
    /// `None` waits forever.
    pub request_timeout: Option<Duration>,
    /// Handling of queued requests at stop time.
    pub shutdown_policy: ShutdownPolicy,
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            shutdown_policy: ShutdownPolicy::Drain,
        }
    }
}

impl OwnerConfig {
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }

    /// Mailbox capacity clamped to the minimum tokio accepts.
    pub(crate) fn effective_capacity(&self) -> usize {
        self.mailbox_capacity.max(1)
    }
}
