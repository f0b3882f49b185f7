//! # State Owner Actor
//!
//! The message-passing strategy. One task owns the `StateMap` and handles
//! exactly one message per loop iteration, so reads and writes are serialized
//! without a lock.
//!
//! ## Loop
//!
//! The owner waits on four mailboxes at once (read, write, snapshot, stop).
//! When several are ready the branch is picked at random; order is only
//! guaranteed within a single mailbox.
//!
//! ## Stop
//!
//! A `StopRequest`, or the last handle being dropped, ends the loop. The owner
//! then closes every mailbox, serves or drops what is still queued according
//! to `ShutdownPolicy`, answers the stop request with a `ShutdownReport` and
//! returns.

use crate::domain::{
    Key, Operation, OwnerConfig, ShutdownPolicy, ShutdownReport, StateError, StateMap,
    StateSnapshot, Strategy, Value,
};
use crate::ports::StateStoreApi;
use crate::protocol::{ReadRequest, ResponseSlot, SnapshotRequest, StopRequest, WriteRequest};
use crate::STOP_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The single task allowed to touch the state.
pub struct StateOwner {
    /// Private state; never leaves this struct except as a snapshot copy.
    state: StateMap,
    read_rx: mpsc::Receiver<ReadRequest>,
    write_rx: mpsc::Receiver<WriteRequest>,
    snapshot_rx: mpsc::Receiver<SnapshotRequest>,
    stop_rx: mpsc::Receiver<StopRequest>,
    policy: ShutdownPolicy,
    reads_served: u64,
    writes_served: u64,
}

/// Cloneable client handle to a running `StateOwner`.
#[derive(Clone, Debug)]
pub struct StateOwnerHandle {
    read_tx: mpsc::Sender<ReadRequest>,
    write_tx: mpsc::Sender<WriteRequest>,
    snapshot_tx: mpsc::Sender<SnapshotRequest>,
    stop_tx: mpsc::Sender<StopRequest>,
    request_timeout: Option<Duration>,
}

impl StateOwner {
    /// Create an owner with an empty map and the handle that talks to it.
    ///
    /// The owner does nothing until `run` is polled.
    pub fn new(config: &OwnerConfig) -> (Self, StateOwnerHandle) {
        let capacity = config.effective_capacity();
        let (read_tx, read_rx) = mpsc::channel(capacity);
        let (write_tx, write_rx) = mpsc::channel(capacity);
        let (snapshot_tx, snapshot_rx) = mpsc::channel(capacity);
        let (stop_tx, stop_rx) = mpsc::channel(STOP_CHANNEL_CAPACITY);

        let owner = Self {
            state: StateMap::new(),
            read_rx,
            write_rx,
            snapshot_rx,
            stop_rx,
            policy: config.shutdown_policy,
            reads_served: 0,
            writes_served: 0,
        };
        let handle = StateOwnerHandle {
            read_tx,
            write_tx,
            snapshot_tx,
            stop_tx,
            request_timeout: config.request_timeout,
        };
        (owner, handle)
    }

    /// Spawn the owner loop on its own tokio task and return a handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: &OwnerConfig) -> StateOwnerHandle {
        let (owner, handle) = Self::new(config);
        tokio::spawn(owner.run());
        handle
    }

    /// Run the owner loop until stopped or until every handle is dropped.
    pub async fn run(mut self) -> ShutdownReport {
        info!(policy = %self.policy, "State owner started");

        let stop = loop {
            tokio::select! {
                Some(request) = self.read_rx.recv() => self.handle_read(request),
                Some(request) = self.write_rx.recv() => self.handle_write(request),
                Some(request) = self.snapshot_rx.recv() => self.handle_snapshot(request),
                // None here means every handle is gone.
                request = self.stop_rx.recv() => break request,
            }
        };

        let report = self.wind_down();
        info!(
            reads_served = report.reads_served,
            writes_served = report.writes_served,
            drained = report.drained,
            rejected = report.rejected,
            entries = report.final_state.len(),
            "State owner stopped"
        );

        match stop {
            Some(request) => {
                if !request.respond_to.deliver(report.clone()) {
                    debug!("Stop requester went away before the report was delivered");
                }
            }
            None => info!("All handles dropped, state owner exiting"),
        }

        report
    }

    fn handle_read(&mut self, request: ReadRequest) {
        let value = self.state.get(request.key);
        self.reads_served += 1;
        if !request.respond_to.deliver(value) {
            debug!(key = request.key, "Read response dropped, caller gave up");
        }
    }

    fn handle_write(&mut self, request: WriteRequest) {
        self.state.set(request.key, request.value);
        self.writes_served += 1;
        if !request.respond_to.deliver(true) {
            debug!(key = request.key, "Write acknowledgment dropped, caller gave up");
        }
    }

    fn handle_snapshot(&mut self, request: SnapshotRequest) {
        if !request.respond_to.deliver(self.state.snapshot()) {
            debug!("Snapshot response dropped, caller gave up");
        }
    }

    /// Close the mailboxes and settle whatever is still queued.
    fn wind_down(&mut self) -> ShutdownReport {
        self.read_rx.close();
        self.write_rx.close();
        self.snapshot_rx.close();
        self.stop_rx.close();

        let mut drained = 0u64;
        let mut rejected = 0u64;

        while let Ok(request) = self.read_rx.try_recv() {
            match self.policy {
                ShutdownPolicy::Drain => {
                    self.handle_read(request);
                    drained += 1;
                }
                ShutdownPolicy::Reject => rejected += 1,
            }
        }
        while let Ok(request) = self.write_rx.try_recv() {
            match self.policy {
                ShutdownPolicy::Drain => {
                    self.handle_write(request);
                    drained += 1;
                }
                ShutdownPolicy::Reject => rejected += 1,
            }
        }
        while let Ok(request) = self.snapshot_rx.try_recv() {
            match self.policy {
                ShutdownPolicy::Drain => {
                    self.handle_snapshot(request);
                    drained += 1;
                }
                ShutdownPolicy::Reject => rejected += 1,
            }
        }
        // Stop requests that lost the race see OwnerStopped.
        while self.stop_rx.try_recv().is_ok() {}

        if rejected > 0 {
            warn!(rejected, "Rejected queued requests at shutdown");
        }

        ShutdownReport {
            strategy: Strategy::MessagePassing,
            reads_served: self.reads_served,
            writes_served: self.writes_served,
            drained,
            rejected,
            final_state: self.state.snapshot(),
        }
    }
}

impl StateOwnerHandle {
    /// Apply the configured bound to one request round-trip.
    async fn round_trip<T, F>(&self, operation: Operation, exchange: F) -> Result<T, StateError>
    where
        F: Future<Output = Result<T, StateError>>,
    {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| StateError::Timeout {
                    operation,
                    timeout: limit,
                })?,
            None => exchange.await,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

#[async_trait]
impl StateStoreApi for StateOwnerHandle {
    fn strategy(&self) -> Strategy {
        Strategy::MessagePassing
    }

    async fn read(&self, key: Key) -> Result<Value, StateError> {
        let (respond_to, pending) = ResponseSlot::channel();
        let exchange = async {
            self.read_tx
                .send(ReadRequest { key, respond_to })
                .await
                .map_err(|_| StateError::OwnerStopped)?;
            pending.await
        };
        self.round_trip(Operation::Read, exchange).await
    }

    async fn write(&self, key: Key, value: Value) -> Result<bool, StateError> {
        let (respond_to, pending) = ResponseSlot::channel();
        let exchange = async {
            self.write_tx
                .send(WriteRequest {
                    key,
                    value,
                    respond_to,
                })
                .await
                .map_err(|_| StateError::OwnerStopped)?;
            pending.await
        };
        self.round_trip(Operation::Write, exchange).await
    }

    async fn snapshot(&self) -> Result<StateSnapshot, StateError> {
        let (respond_to, pending) = ResponseSlot::channel();
        let exchange = async {
            self.snapshot_tx
                .send(SnapshotRequest { respond_to })
                .await
                .map_err(|_| StateError::OwnerStopped)?;
            pending.await
        };
        self.round_trip(Operation::Snapshot, exchange).await
    }

    async fn shutdown(&self) -> Result<ShutdownReport, StateError> {
        let (respond_to, pending) = ResponseSlot::channel();
        let exchange = async {
            self.stop_tx
                .send(StopRequest { respond_to })
                .await
                .map_err(|_| StateError::OwnerStopped)?;
            pending.await
        };
        self.round_trip(Operation::Shutdown, exchange).await
    }

    fn is_stopped(&self) -> bool {
        self.read_tx.is_closed()
    }
}
