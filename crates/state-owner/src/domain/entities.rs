//! Core state entities.

use super::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Key into the owned state.
pub type Key = i64;

/// Value stored under a key.
pub type Value = i64;

/// Value observed for a key that was never written.
pub const DEFAULT_VALUE: Value = 0;

/// The mutable key/value map.
///
/// Never shared: it lives inside the `StateOwner` task or behind the
/// `LockedStateStore` mutex, and is only handed out as a `StateSnapshot` copy.
#[derive(Debug, Default)]
pub struct StateMap {
    entries: HashMap<Key, Value>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, or `DEFAULT_VALUE` when absent.
    pub fn get(&self, key: Key) -> Value {
        self.entries.get(&key).copied().unwrap_or(DEFAULT_VALUE)
    }

    pub fn set(&mut self, key: Key, value: Value) {
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordered copy of the current contents.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            entries: self.entries.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }
}

/// Point-in-time copy of a `StateMap`, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    entries: BTreeMap<Key, Value>,
}

impl StateSnapshot {
    /// Value for `key`, or `DEFAULT_VALUE` when absent.
    pub fn get(&self, key: Key) -> Value {
        self.entries.get(&key).copied().unwrap_or(DEFAULT_VALUE)
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Value)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

impl fmt::Display for StateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map[")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{key}:{value}")?;
        }
        write!(f, "]")
    }
}

/// Synchronization design backing a `StateStoreApi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One owning task, reached through mailboxes.
    MessagePassing,
    /// Shared map guarded by a mutex.
    SharedLock,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::MessagePassing, Strategy::SharedLock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::MessagePassing => "message-passing",
            Strategy::SharedLock => "shared-lock",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "actor" | "owner" | "message-passing" => Ok(Strategy::MessagePassing),
            "mutex" | "lock" | "shared-lock" => Ok(Strategy::SharedLock),
            other => Err(ParseError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Kind of request, used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Read,
    Write,
    Snapshot,
    Shutdown,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Snapshot => "snapshot",
            Operation::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// Final accounting returned once a store has stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownReport {
    pub strategy: Strategy,
    /// Read requests answered over the store's lifetime.
    pub reads_served: u64,
    /// Write requests applied and acknowledged.
    pub writes_served: u64,
    /// Requests found queued at stop time and served anyway.
    pub drained: u64,
    /// Requests found queued at stop time and dropped unanswered.
    pub rejected: u64,
    /// Map contents at the moment the store stopped.
    pub final_state: StateSnapshot,
}
