//! Benchmark utilities for the state store strategies.

pub mod utils {
    use client_pool::{ClientPool, ClientPoolConfig};
    use state_owner::{launch_store, OpCounters, OwnerConfig, StateStoreApi, Strategy};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;

    /// Runtime for `Bencher::to_async`.
    pub fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap_or_else(|e| panic!("failed to build benchmark runtime: {e}"))
    }

    /// Store with default tunables, ready for requests.
    pub fn fresh_store(strategy: Strategy) -> Arc<dyn StateStoreApi> {
        launch_store(strategy, &OwnerConfig::default())
    }

    /// Unpaced, seeded pool shape where every client issues `ops` requests.
    pub fn burst_config(readers: usize, writers: usize, ops: u64) -> ClientPoolConfig {
        ClientPoolConfig {
            reader_count: readers,
            writer_count: writers,
            inter_request_delay: Duration::ZERO,
            ops_per_client: Some(ops),
            seed: Some(0x5eed),
            ..ClientPoolConfig::default()
        }
    }

    /// Run one bounded pool against `store` and return completed operations.
    pub async fn run_burst(store: Arc<dyn StateStoreApi>, config: ClientPoolConfig) -> u64 {
        let counters = Arc::new(OpCounters::new());
        let pool = ClientPool::new(store, Arc::clone(&counters), config)
            .unwrap_or_else(|e| panic!("invalid benchmark pool: {e}"));
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        pool.run(shutdown_rx).await;
        counters.snapshot().completed()
    }
}
