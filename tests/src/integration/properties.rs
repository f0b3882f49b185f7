//! # Store Properties
//!
//! Guarantees every `StateStoreApi` implementation must keep, checked against
//! each `Strategy`.

#[cfg(test)]
mod tests {
    use client_pool::{ClientPool, ClientPoolConfig};
    use state_owner::{launch_store, OpCounters, OwnerConfig, StateStoreApi, Strategy};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio::task::JoinSet;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn store(strategy: Strategy) -> Arc<dyn StateStoreApi> {
        launch_store(strategy, &OwnerConfig::default())
    }

    fn bounded_pool(readers: usize, writers: usize, ops: u64) -> ClientPoolConfig {
        ClientPoolConfig {
            reader_count: readers,
            writer_count: writers,
            inter_request_delay: Duration::ZERO,
            ops_per_client: Some(ops),
            seed: Some(2024),
            ..ClientPoolConfig::default()
        }
    }

    // =============================================================================
    // READ/WRITE GUARANTEES
    // =============================================================================

    #[tokio::test]
    async fn test_unwritten_keys_read_zero() {
        for strategy in Strategy::ALL {
            let store = store(strategy);
            for key in [-3, 0, 1, 4, i64::MAX] {
                assert_eq!(store.read(key).await.unwrap(), 0, "{strategy} key {key}");
            }
        }
    }

    #[tokio::test]
    async fn test_read_after_write_sees_value() {
        for strategy in Strategy::ALL {
            let store = store(strategy);
            assert!(store.write(5, 42).await.unwrap());
            assert_eq!(store.read(5).await.unwrap(), 42, "{strategy}");
            assert_eq!(store.read(4).await.unwrap(), 0, "{strategy}");
        }
    }

    #[tokio::test]
    async fn test_repeated_reads_are_idempotent() {
        for strategy in Strategy::ALL {
            let store = store(strategy);
            store.write(2, 17).await.unwrap();
            for _ in 0..20 {
                assert_eq!(store.read(2).await.unwrap(), 17, "{strategy}");
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_leave_one_written_value() {
        for strategy in Strategy::ALL {
            let store = store(strategy);
            let mut writers = JoinSet::new();
            for value in 1..=50 {
                let store = Arc::clone(&store);
                writers.spawn(async move { store.write(0, value).await });
            }
            while let Some(result) = writers.join_next().await {
                assert!(result.unwrap().unwrap());
            }

            let value = store.read(0).await.unwrap();
            assert!((1..=50).contains(&value), "{strategy} left {value}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_three_writers_then_readers_agree() {
        for strategy in Strategy::ALL {
            let store = store(strategy);

            let mut writers = JoinSet::new();
            for id in 1..=3 {
                let store = Arc::clone(&store);
                writers.spawn(async move { store.write(1, id).await });
            }
            while let Some(result) = writers.join_next().await {
                result.unwrap().unwrap();
            }

            let mut readers = JoinSet::new();
            for _ in 0..3 {
                let store = Arc::clone(&store);
                readers.spawn(async move { store.read(1).await });
            }
            let mut seen = HashSet::new();
            while let Some(result) = readers.join_next().await {
                seen.insert(result.unwrap().unwrap());
            }

            assert_eq!(seen.len(), 1, "{strategy} readers disagreed: {seen:?}");
            let value = seen.into_iter().next().unwrap();
            assert!((1..=3).contains(&value));
        }
    }

    // =============================================================================
    // COUNTERS
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_counters_match_client_budgets() {
        const OPS: u64 = 40;
        for strategy in Strategy::ALL {
            let store = store(strategy);
            let counters = Arc::new(OpCounters::new());
            let pool = ClientPool::new(
                Arc::clone(&store),
                Arc::clone(&counters),
                bounded_pool(20, 5, OPS),
            )
            .unwrap();

            let (_shutdown_tx, shutdown_rx) = watch::channel(false);
            let report = pool.run(shutdown_rx).await;
            assert_eq!(report.finished, 25);

            assert_eq!(counters.read_count(), 20 * OPS, "{strategy}");
            assert_eq!(counters.write_count(), 5 * OPS, "{strategy}");

            let shutdown = store.shutdown().await.unwrap();
            assert_eq!(shutdown.reads_served, counters.read_count());
            assert_eq!(shutdown.writes_served, counters.write_count());
        }
    }

    #[tokio::test]
    async fn test_snapshot_keys_stay_in_key_space() {
        for strategy in Strategy::ALL {
            let store = store(strategy);
            let mut config = bounded_pool(0, 3, 30);
            config.key_space = 4;
            let pool =
                ClientPool::new(Arc::clone(&store), Arc::new(OpCounters::new()), config).unwrap();
            let (_shutdown_tx, shutdown_rx) = watch::channel(false);
            pool.run(shutdown_rx).await;

            let snapshot = store.snapshot().await.unwrap();
            assert!(snapshot.len() <= 4);
            assert!(snapshot.iter().all(|(key, _)| (0..4).contains(&key)));
        }
    }
}
