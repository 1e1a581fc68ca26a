//! # Intake Pipeline Flows
//!
//! Wires the deduplication stage the way a node does:
//!
//! 1. **Network → Deduplication**: every received event is counted in, then
//!    submitted to the stage
//! 2. **Consensus → Deduplication**: the ancient threshold advances as rounds
//!    are decided
//! 3. **Deduplication → Consensus intake**: forwarded events are consumed and
//!    counted out once processed
//!
//! After a run every peer's in-flight count must return to zero.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{ensure, Context, Result};
    use tokio::time::timeout;

    use hg_01_event_deduplication::domain::check_all_invariants;
    use hg_01_event_deduplication::{
        DeduplicationConfig, DeduplicationMetrics, DeduplicationStage, DefaultIntakeEventCounter,
        EventDeduplicationApi, EventDeduplicator, IntakeEventCounter, NoOpIntakeEventCounter,
        PrometheusMetrics,
    };
    use shared_types::{GossipEvent, NodeId};

    use crate::fixtures::{distinct_pairs, generate_workload, init_test_logging, WorkloadSpec};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn small_queues() -> DeduplicationConfig {
        DeduplicationConfig {
            input_queue_capacity: 16,
            output_queue_capacity: 4,
            ..DeduplicationConfig::default()
        }
    }

    fn peers(spec: &WorkloadSpec) -> impl Iterator<Item = NodeId> {
        (0..spec.peers).map(NodeId::new)
    }

    // =========================================================================
    // INTEGRATION TESTS: STAGE + ACCOUNTING
    // =========================================================================

    /// Every distinct (descriptor, signature) pair reaches consensus intake
    /// exactly once, and intake accounting drains to zero.
    #[tokio::test]
    async fn test_pipeline_forwards_each_pair_once() -> Result<()> {
        init_test_logging();
        let spec = WorkloadSpec::default();
        let events = generate_workload(11, spec);
        let expected = distinct_pairs(&events, 0);

        let counter = Arc::new(DefaultIntakeEventCounter::with_peers(peers(&spec)));
        let metrics = Arc::new(DeduplicationMetrics::new());
        let dedup = EventDeduplicator::new(counter.clone(), metrics.clone());
        let (stage, mut to_consensus) =
            DeduplicationStage::spawn(dedup, counter.clone(), &small_queues());

        // consensus intake: consume and count out
        let consumer_counter = counter.clone();
        let consumer = tokio::spawn(async move {
            let mut received = Vec::new();
            while let Some(event) = to_consensus.recv().await {
                consumer_counter.event_exited_intake_pipeline(event.sender_id());
                received.push(event);
            }
            received
        });

        // network: count in and submit
        for event in events.iter().cloned() {
            counter.event_entered_intake_pipeline(event.sender_id());
            stage.submit_event(event).await?;
        }

        let report = stage.shutdown().await?;
        let received = timeout(Duration::from_secs(5), consumer)
            .await
            .context("consumer did not finish")??;

        ensure!(received.len() == expected, "forwarded {} of {expected}", received.len());
        assert_eq!(report.events_received, events.len() as u64);
        assert_eq!(report.events_forwarded, expected as u64);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.non_duplicate_events, expected as u64);
        assert_eq!(snapshot.duplicate_events, (events.len() - expected) as u64);
        assert_eq!(snapshot.ancient_events, 0);

        for peer in peers(&spec) {
            assert!(!counter.has_unprocessed_events(peer), "{peer} still in flight");
        }
        Ok(())
    }

    /// Forwarded events keep the relative order in which they were submitted.
    #[tokio::test]
    async fn test_forwarded_order_matches_submission_order() -> Result<()> {
        init_test_logging();
        let spec = WorkloadSpec {
            events: 300,
            ..WorkloadSpec::default()
        };
        let events = generate_workload(3, spec);

        // what a synchronous deduplicator forwards, in order
        let mut reference =
            EventDeduplicator::new(Arc::new(NoOpIntakeEventCounter), Arc::new(DeduplicationMetrics::new()));
        let expected: Vec<GossipEvent> = events
            .iter()
            .cloned()
            .filter_map(|e| reference.handle_event(e))
            .collect();

        let counter = Arc::new(NoOpIntakeEventCounter);
        let dedup = EventDeduplicator::new(counter.clone(), Arc::new(DeduplicationMetrics::new()));
        let (stage, mut to_consensus) = DeduplicationStage::spawn(dedup, counter, &small_queues());

        let consumer = tokio::spawn(async move {
            let mut received = Vec::new();
            while let Some(event) = to_consensus.recv().await {
                received.push(event);
            }
            received
        });

        for event in events {
            stage.submit_event(event).await?;
        }
        stage.shutdown().await?;

        let received = consumer.await?;
        assert_eq!(received, expected);
        Ok(())
    }

    /// Consensus advancing the threshold mid-stream drops late copies of
    /// old events as ancient.
    #[tokio::test]
    async fn test_consensus_threshold_advances_mid_stream() -> Result<()> {
        init_test_logging();
        let spec = WorkloadSpec {
            events: 2_000,
            generations: 200,
            ..WorkloadSpec::default()
        };
        let events = generate_workload(5, spec);

        let counter = Arc::new(DefaultIntakeEventCounter::new());
        let metrics = Arc::new(DeduplicationMetrics::new());
        let dedup = EventDeduplicator::new(counter.clone(), metrics.clone());
        let (stage, mut to_consensus) =
            DeduplicationStage::spawn(dedup, counter.clone(), &DeduplicationConfig::default());

        let consumer_counter = counter.clone();
        let consumer = tokio::spawn(async move {
            let mut forwarded = 0usize;
            while let Some(event) = to_consensus.recv().await {
                consumer_counter.event_exited_intake_pipeline(event.sender_id());
                forwarded += 1;
            }
            forwarded
        });

        let mut floor = 0;
        for (i, event) in events.iter().cloned().enumerate() {
            if i > 0 && i % 250 == 0 {
                // consensus lags the newest generation by 20
                floor = (event.generation().saturating_sub(20)).max(floor);
                stage.advance_window(floor).await?;
            }
            counter.event_entered_intake_pipeline(event.sender_id());
            stage.submit_event(event).await?;
        }

        let report = stage.shutdown().await?;
        let forwarded = consumer.await?;

        let snapshot = metrics.snapshot();
        assert!(snapshot.ancient_events > 0, "late copies should be ancient");
        assert_eq!(
            snapshot.ancient_events + snapshot.duplicate_events + snapshot.non_duplicate_events,
            events.len() as u64
        );
        assert_eq!(forwarded as u64, report.events_forwarded);
        assert_eq!(report.window_shifts, (events.len() as u64 - 1) / 250);

        for peer in peers(&spec) {
            assert!(!counter.has_unprocessed_events(peer));
        }
        Ok(())
    }

    /// Structural invariants hold at every threshold advance.
    #[test]
    fn test_invariants_hold_across_workload() -> Result<()> {
        init_test_logging();
        let spec = WorkloadSpec {
            events: 5_000,
            generations: 500,
            ..WorkloadSpec::default()
        };
        let events = generate_workload(9, spec);
        let mut dedup =
            EventDeduplicator::new(Arc::new(NoOpIntakeEventCounter), Arc::new(DeduplicationMetrics::new()));

        for (i, event) in events.into_iter().enumerate() {
            let generation = event.generation();
            dedup.handle_event(event);
            if i % 100 == 99 {
                let floor = generation.saturating_sub(10).max(dedup.minimum_generation_non_ancient());
                dedup.set_minimum_generation_non_ancient(floor)?;
                check_all_invariants(&dedup)
                    .map_err(|v| anyhow::anyhow!("invariant violated at event {i}: {v:?}"))?;
            }
        }
        Ok(())
    }

    /// A node restart clears observed events and intake accounting together.
    #[tokio::test]
    async fn test_restart_clears_history_and_accounting() -> Result<()> {
        init_test_logging();
        let counter = Arc::new(DefaultIntakeEventCounter::new());
        let metrics = Arc::new(DeduplicationMetrics::new());
        let dedup = EventDeduplicator::new(counter.clone(), metrics.clone());
        let (stage, mut to_consensus) =
            DeduplicationStage::spawn(dedup, counter.clone(), &DeduplicationConfig::default());

        let event = GossipEvent::new(NodeId::new(1), 4, b"payload".to_vec(), vec![1, 2], NodeId::new(2));

        counter.event_entered_intake_pipeline(event.sender_id());
        stage.submit_event(event.clone()).await?;
        let first = to_consensus.recv().await.context("first copy forwarded")?;
        assert_eq!(first, event);
        assert!(counter.has_unprocessed_events(NodeId::new(2)));

        // restart signal
        stage.clear().await?;
        counter.reset();

        counter.event_entered_intake_pipeline(event.sender_id());
        stage.submit_event(event.clone()).await?;
        let replay = to_consensus.recv().await.context("replay forwarded after clear")?;
        assert_eq!(replay, event);

        let report = stage.shutdown().await?;
        assert_eq!(report.clears, 1);
        assert_eq!(metrics.snapshot().duplicate_events, 0);
        Ok(())
    }

    // =========================================================================
    // INTEGRATION TESTS: METRICS EXPORT
    // =========================================================================

    /// Deduplication counters appear in the process-wide registry export.
    #[test]
    fn test_counters_exported_through_telemetry_registry() -> Result<()> {
        init_test_logging();
        let metrics = Arc::new(PrometheusMetrics::register(&hg_telemetry::REGISTRY)?);
        let mut dedup = EventDeduplicator::new(Arc::new(NoOpIntakeEventCounter), metrics);

        let event = GossipEvent::new(NodeId::new(3), 1, b"x".to_vec(), vec![9], NodeId::new(4));
        dedup.handle_event(event.clone());
        dedup.handle_event(event.clone());
        dedup.handle_event(event.with_signature(vec![8]));
        dedup.set_minimum_generation_non_ancient(2)?;
        dedup.handle_event(GossipEvent::new(NodeId::new(3), 1, b"y".to_vec(), vec![9], NodeId::new(4)));

        let text = hg_telemetry::encode_metrics()?;
        assert!(text.contains("hg_intake_non_duplicate_events_total 2"), "{text}");
        assert!(text.contains("hg_intake_duplicate_events_total 1"), "{text}");
        assert!(text.contains("hg_intake_disparate_signature_events_total 1"), "{text}");
        assert!(text.contains("hg_intake_ancient_events_total 1"), "{text}");
        Ok(())
    }
}
