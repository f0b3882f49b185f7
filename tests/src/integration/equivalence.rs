//! # Strategy Equivalence
//!
//! The message-passing owner and the mutex-guarded map must be
//! interchangeable: the same request sequence produces the same answers and
//! the same final state, and both match a plain `HashMap` model.

#[cfg(test)]
mod tests {
    use client_pool::{DriverConfig, WorkloadRuntime};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use state_owner::{launch_store, Key, OwnerConfig, StateSnapshot, Strategy, Value};
    use std::collections::HashMap;

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Read(Key),
        Write(Key, Value),
    }

    fn script(seed: u64, len: usize) -> Vec<Step> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len)
            .map(|_| {
                let key = rng.gen_range(0..8);
                if rng.gen_bool(0.3) {
                    Step::Write(key, rng.gen_range(0..1000))
                } else {
                    Step::Read(key)
                }
            })
            .collect()
    }

    /// Replays `steps` sequentially and returns every read result plus the
    /// final snapshot.
    async fn replay(strategy: Strategy, steps: &[Step]) -> (Vec<Value>, StateSnapshot) {
        let store = launch_store(strategy, &OwnerConfig::default());
        let mut reads = Vec::new();
        for step in steps {
            match *step {
                Step::Read(key) => reads.push(store.read(key).await.unwrap()),
                Step::Write(key, value) => {
                    store.write(key, value).await.unwrap();
                }
            }
        }
        let report = store.shutdown().await.unwrap();
        assert_eq!(report.strategy, strategy);
        (reads, report.final_state)
    }

    fn model(steps: &[Step]) -> Vec<Value> {
        let mut map: HashMap<Key, Value> = HashMap::new();
        steps
            .iter()
            .filter_map(|step| match *step {
                Step::Read(key) => Some(map.get(&key).copied().unwrap_or(0)),
                Step::Write(key, value) => {
                    map.insert(key, value);
                    None
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn test_sequential_scripts_agree_with_model() {
        for seed in [1, 7, 99] {
            let steps = script(seed, 300);
            let expected = model(&steps);

            let (owner_reads, owner_state) = replay(Strategy::MessagePassing, &steps).await;
            let (locked_reads, locked_state) = replay(Strategy::SharedLock, &steps).await;

            assert_eq!(owner_reads, expected, "seed {seed}");
            assert_eq!(locked_reads, expected, "seed {seed}");
            assert_eq!(owner_state, locked_state, "seed {seed}");
        }
    }

    #[tokio::test]
    async fn test_single_writer_runs_end_in_same_state() {
        let run = |strategy| {
            let mut config = DriverConfig {
                strategy,
                run_duration: None,
                ..DriverConfig::default()
            };
            config.pool.reader_count = 0;
            config.pool.writer_count = 1;
            config.pool.ops_per_client = Some(200);
            config.pool.inter_request_delay = std::time::Duration::ZERO;
            config.pool.seed = Some(31);
            WorkloadRuntime::new(config)
        };

        let owner = run(Strategy::MessagePassing).run().await.unwrap();
        let locked = run(Strategy::SharedLock).run().await.unwrap();

        assert_eq!(owner.counters, locked.counters);
        assert_eq!(owner.shutdown.final_state, locked.shutdown.final_state);
        assert_eq!(owner.render_text(), locked.render_text());
    }

    #[tokio::test]
    async fn test_json_report_names_strategy() {
        let config = DriverConfig {
            strategy: Strategy::SharedLock,
            run_duration: None,
            pool: client_pool::ClientPoolConfig {
                reader_count: 2,
                writer_count: 1,
                ops_per_client: Some(5),
                inter_request_delay: std::time::Duration::ZERO,
                ..Default::default()
            },
            ..DriverConfig::default()
        };
        let report = WorkloadRuntime::new(config).run().await.unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["strategy"], "shared-lock");
        assert_eq!(json["stop_cause"], "clients_finished");
        assert_eq!(json["counters"]["reads"], 10);
        assert_eq!(json["counters"]["writes"], 5);
    }
}
