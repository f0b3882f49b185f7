//! # Driver Configuration
//!
//! Unified configuration for the store under test, the client pool and the
//! process itself. Every value has a default matching the classic demo
//! (100 readers, 10 writers, 5 keys, values below 100, 1 ms pacing, 1 s run)
//! and can be overridden from the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SO_STRATEGY` | `actor` | `actor` or `mutex` |
//! | `SO_READERS` | `100` | Reader tasks |
//! | `SO_WRITERS` | `10` | Writer tasks |
//! | `SO_KEY_SPACE` | `5` | Keys are drawn from `0..key_space` |
//! | `SO_VALUE_SPACE` | `100` | Values are drawn from `0..value_space` |
//! | `SO_REQUEST_DELAY_MS` | `1` | Pause between two requests of one client |
//! | `SO_OPS_PER_CLIENT` | unbounded | Requests per client before it exits |
//! | `SO_SEED` | entropy | Base seed for the client RNGs |
//! | `SO_RUN_DURATION_MS` | `1000` | Wall-clock cap, `0` for none |
//! | `SO_MAILBOX_CAPACITY` | `64` | Owner mailbox bound |
//! | `SO_REQUEST_TIMEOUT_MS` | `5000` | Per-request bound, `0` for none |
//! | `SO_SHUTDOWN_POLICY` | `drain` | `drain` or `reject` |
//! | `SO_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `SO_JSON_LOGS` | `false` | JSON log lines |
//! | `SO_REPORT_JSON` | `false` | Print the run report as JSON |

use state_owner::{Key, OwnerConfig, ShutdownPolicy, Strategy, Value};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ENV_STRATEGY: &str = "SO_STRATEGY";
pub const ENV_READERS: &str = "SO_READERS";
pub const ENV_WRITERS: &str = "SO_WRITERS";
pub const ENV_KEY_SPACE: &str = "SO_KEY_SPACE";
pub const ENV_VALUE_SPACE: &str = "SO_VALUE_SPACE";
pub const ENV_REQUEST_DELAY_MS: &str = "SO_REQUEST_DELAY_MS";
pub const ENV_OPS_PER_CLIENT: &str = "SO_OPS_PER_CLIENT";
pub const ENV_SEED: &str = "SO_SEED";
pub const ENV_RUN_DURATION_MS: &str = "SO_RUN_DURATION_MS";
pub const ENV_MAILBOX_CAPACITY: &str = "SO_MAILBOX_CAPACITY";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "SO_REQUEST_TIMEOUT_MS";
pub const ENV_SHUTDOWN_POLICY: &str = "SO_SHUTDOWN_POLICY";
pub const ENV_LOG_LEVEL: &str = "SO_LOG_LEVEL";
pub const ENV_JSON_LOGS: &str = "SO_JSON_LOGS";
pub const ENV_REPORT_JSON: &str = "SO_REPORT_JSON";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Key space must be at least 1, got {0}")]
    EmptyKeySpace(Key),

    #[error("Value space must be at least 1, got {0}")]
    EmptyValueSpace(Value),

    #[error("Mailbox capacity must be at least 1")]
    ZeroMailboxCapacity,

    #[error("Clients are unbounded and no run duration is set; the run would never end")]
    Unbounded,
}

/// Client pool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPoolConfig {
    /// Number of reader tasks.
    pub reader_count: usize,
    /// Number of writer tasks.
    pub writer_count: usize,
    /// Keys are drawn uniformly from `0..key_space`.
    pub key_space: Key,
    /// Written values are drawn uniformly from `0..value_space`.
    pub value_space: Value,
    /// Pause after each completed request.
    pub inter_request_delay: Duration,
    /// Requests per client before it exits. `None` runs until shutdown.
    pub ops_per_client: Option<u64>,
    /// Base RNG seed; client `i` uses `seed + i`. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl ClientPoolConfig {
    /// Keys and values are drawn from `0..space`, so both spaces need at
    /// least one element.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_space < 1 {
            return Err(ConfigError::EmptyKeySpace(self.key_space));
        }
        if self.value_space < 1 {
            return Err(ConfigError::EmptyValueSpace(self.value_space));
        }
        Ok(())
    }
}

impl Default for ClientPoolConfig {
    fn default() -> Self {
        Self {
            reader_count: 100,
            writer_count: 10,
            key_space: 5,
            value_space: 100,
            inter_request_delay: Duration::from_millis(1),
            ops_per_client: None,
            seed: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression).
    pub log_level: String,
    /// Emit JSON lines instead of the pretty format.
    pub json_logs: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Complete driver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Which store implementation to drive.
    pub strategy: Strategy,
    /// Store tunables.
    pub owner: OwnerConfig,
    /// Client pool shape and pacing.
    pub pool: ClientPoolConfig,
    /// Wall-clock cap on the run. `None` waits for bounded clients to finish.
    pub run_duration: Option<Duration>,
    /// Logging.
    pub log: LogConfig,
    /// Print the final report as JSON.
    pub report_json: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::MessagePassing,
            owner: OwnerConfig::default(),
            pool: ClientPoolConfig::default(),
            run_duration: Some(Duration::from_secs(1)),
            log: LogConfig::default(),
            report_json: false,
        }
    }
}

impl DriverConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(strategy) = parse_var::<Strategy, _>(&lookup, ENV_STRATEGY)? {
            config.strategy = strategy;
        }
        if let Some(readers) = parse_var::<usize, _>(&lookup, ENV_READERS)? {
            config.pool.reader_count = readers;
        }
        if let Some(writers) = parse_var::<usize, _>(&lookup, ENV_WRITERS)? {
            config.pool.writer_count = writers;
        }
        if let Some(key_space) = parse_var::<Key, _>(&lookup, ENV_KEY_SPACE)? {
            config.pool.key_space = key_space;
        }
        if let Some(value_space) = parse_var::<Value, _>(&lookup, ENV_VALUE_SPACE)? {
            config.pool.value_space = value_space;
        }
        if let Some(delay_ms) = parse_var::<u64, _>(&lookup, ENV_REQUEST_DELAY_MS)? {
            config.pool.inter_request_delay = Duration::from_millis(delay_ms);
        }
        if let Some(ops) = parse_var::<u64, _>(&lookup, ENV_OPS_PER_CLIENT)? {
            config.pool.ops_per_client = Some(ops);
        }
        if let Some(seed) = parse_var::<u64, _>(&lookup, ENV_SEED)? {
            config.pool.seed = Some(seed);
        }
        if let Some(run_ms) = parse_var::<u64, _>(&lookup, ENV_RUN_DURATION_MS)? {
            config.run_duration = millis_or_none(run_ms);
        }
        if let Some(capacity) = parse_var::<usize, _>(&lookup, ENV_MAILBOX_CAPACITY)? {
            config.owner.mailbox_capacity = capacity;
        }
        if let Some(timeout_ms) = parse_var::<u64, _>(&lookup, ENV_REQUEST_TIMEOUT_MS)? {
            config.owner.request_timeout = millis_or_none(timeout_ms);
        }
        if let Some(policy) = parse_var::<ShutdownPolicy, _>(&lookup, ENV_SHUTDOWN_POLICY)? {
            config.owner.shutdown_policy = policy;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).or_else(|| lookup("RUST_LOG")) {
            config.log.log_level = level;
        }
        if let Some(json) = parse_flag(&lookup, ENV_JSON_LOGS)? {
            config.log.json_logs = json;
        }
        if let Some(json) = parse_flag(&lookup, ENV_REPORT_JSON)? {
            config.report_json = json;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pool.validate()?;
        if self.owner.mailbox_capacity == 0 {
            return Err(ConfigError::ZeroMailboxCapacity);
        }
        if self.pool.ops_per_client.is_none() && self.run_duration.is_none() {
            return Err(ConfigError::Unbounded);
        }
        Ok(())
    }
}

fn millis_or_none(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn parse_flag<F>(lookup: &F, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue {
                var,
                value: raw,
                reason: "expected true or false".to_string(),
            }),
        },
    }
}
