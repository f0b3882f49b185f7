//! # Store Lifecycle
//!
//! Shutdown semantics, queued work under each `ShutdownPolicy`, and bounded
//! waits against a stalled owner.

#[cfg(test)]
mod tests {
    use state_owner::{
        launch_store, OwnerConfig, ShutdownPolicy, StateError, StateOwner, StateStoreApi,
        Strategy,
    };
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_every_operation_fails_after_shutdown() {
        for strategy in Strategy::ALL {
            let store = launch_store(strategy, &OwnerConfig::default());
            store.write(1, 10).await.unwrap();

            let report = store.shutdown().await.unwrap();
            assert_eq!(report.final_state.get(1), 10);
            assert!(store.is_stopped());

            assert_eq!(store.read(1).await, Err(StateError::OwnerStopped));
            assert_eq!(store.write(1, 11).await, Err(StateError::OwnerStopped));
            assert_eq!(store.snapshot().await, Err(StateError::OwnerStopped));
            assert_eq!(store.shutdown().await, Err(StateError::OwnerStopped));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_owner_times_out() {
        let config = OwnerConfig::default().with_request_timeout(Some(Duration::from_millis(100)));
        // The owner is never run, so nothing answers.
        let (_owner, handle) = StateOwner::new(&config);

        let err = handle.read(3).await.unwrap_err();
        assert!(matches!(err, StateError::Timeout { .. }));
        assert!(!err.is_terminal());
        assert!(!handle.is_stopped());
    }

    /// Queue `count` writes on an owner that is not running yet, ask it to
    /// stop, then run it.
    async fn queued_writes_then_stop(
        policy: ShutdownPolicy,
        count: i64,
    ) -> (Vec<Result<bool, StateError>>, state_owner::ShutdownReport) {
        let config = OwnerConfig::default().with_shutdown_policy(policy);
        let (owner, handle) = StateOwner::new(&config);
        let handle = Arc::new(handle);

        let writes: Vec<_> = (0..count)
            .map(|key| {
                let handle = Arc::clone(&handle);
                tokio::spawn(async move { handle.write(key, key * 10).await })
            })
            .collect();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let stopper = {
            let handle = Arc::clone(&handle);
            tokio::spawn(async move { handle.shutdown().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let report = owner.run().await;
        assert_eq!(stopper.await.unwrap().unwrap(), report);

        let mut outcomes = Vec::new();
        for write in writes {
            outcomes.push(write.await.unwrap());
        }
        (outcomes, report)
    }

    #[tokio::test]
    async fn test_drain_serves_queued_requests() {
        let (outcomes, report) = queued_writes_then_stop(ShutdownPolicy::Drain, 8).await;

        assert!(outcomes.iter().all(|outcome| *outcome == Ok(true)));
        assert_eq!(report.writes_served, 8);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.final_state.len(), 8);
        assert_eq!(report.final_state.get(7), 70);
    }

    #[tokio::test]
    async fn test_reject_fails_queued_requests() {
        let (outcomes, report) = queued_writes_then_stop(ShutdownPolicy::Reject, 8).await;

        let served = outcomes.iter().filter(|o| **o == Ok(true)).count() as u64;
        let rejected = outcomes
            .iter()
            .filter(|o| **o == Err(StateError::OwnerStopped))
            .count() as u64;

        assert_eq!(served + rejected, 8);
        assert_eq!(report.writes_served, served);
        assert_eq!(report.rejected, rejected);
        assert_eq!(report.drained, 0);
        assert_eq!(report.final_state.len() as u64, served);
    }

    #[tokio::test]
    async fn test_owner_exits_when_handles_drop() {
        let (owner, handle) = StateOwner::new(&OwnerConfig::default());
        let task = tokio::spawn(owner.run());

        handle.write(2, 5).await.unwrap();
        drop(handle);

        let report = tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.writes_served, 1);
        assert_eq!(report.final_state.get(2), 5);
    }
}
