//! # Deduplication Stage
//!
//! Runs an `EventDeduplicationApi` implementation on its own task between a
//! bounded inbound queue and a bounded outbound queue.
//!
//! ## Flow
//!
//! ```text
//! gossip intake ──Event──────────────────┐
//! consensus core ──MinimumGeneration...──┼──→ [input queue] ──→ stage task ──→ [output queue] ──→ consensus intake
//! restart signal ──Clear─────────────────┘
//! ```
//!
//! The three kinds of input share one queue, so they are applied in exactly
//! the order they were submitted. A full output queue suspends the task,
//! which in turn fills the input queue and pushes back on gossip intake.

use crate::config::DeduplicationConfig;
use crate::domain::DeduplicationError;
use crate::ports::{EventDeduplicationApi, IntakeEventCounter};
use hg_telemetry::log_stage_event;
use serde::Serialize;
use shared_types::{GossipEvent, NodeId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Message on the stage's inbound queue.
#[derive(Debug, Clone)]
pub enum DeduplicatorInput {
    Event(GossipEvent),
    MinimumGenerationNonAncient(u64),
    Clear,
}

/// Totals reported when the stage stops cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub events_received: u64,
    pub events_forwarded: u64,
    pub window_shifts: u64,
    pub clears: u64,
}

/// The stage task state.
pub struct DeduplicationStage<D> {
    deduplicator: D,
    intake_counter: Arc<dyn IntakeEventCounter>,
    input: mpsc::Receiver<DeduplicatorInput>,
    output: mpsc::Sender<GossipEvent>,
    report: StageReport,
    node_id: NodeId,
}

/// Label attached to every stage log line.
const STAGE: &str = "hg-01-event-deduplication";

impl<D: EventDeduplicationApi + 'static> DeduplicationStage<D> {
    /// Start the stage on the current tokio runtime.
    ///
    /// `intake_counter` must be the same counter the deduplicator reports to;
    /// the stage uses it for events it cannot deliver.
    pub fn spawn(
        deduplicator: D,
        intake_counter: Arc<dyn IntakeEventCounter>,
        config: &DeduplicationConfig,
    ) -> (DeduplicationStageHandle, mpsc::Receiver<GossipEvent>) {
        let (input_tx, input_rx) = mpsc::channel(config.input_queue_capacity.max(1));
        let (output_tx, output_rx) = mpsc::channel(config.output_queue_capacity.max(1));

        let stage = Self {
            deduplicator,
            intake_counter: intake_counter.clone(),
            input: input_rx,
            output: output_tx,
            report: StageReport::default(),
            node_id: config.node_id,
        };
        let task = tokio::spawn(stage.run());

        let handle = DeduplicationStageHandle {
            input: input_tx,
            intake_counter,
            task,
        };
        (handle, output_rx)
    }

    /// Run the stage loop until every input sender is dropped or an error
    /// stops it.
    pub async fn run(mut self) -> Result<StageReport, DeduplicationError> {
        log_stage_event!(info, STAGE, self.node_id, "stage started");

        let result = self.process().await;
        match &result {
            Ok(report) => log_stage_event!(
                info,
                STAGE,
                self.node_id,
                "input closed, stage stopped",
                received = report.events_received,
                forwarded = report.events_forwarded
            ),
            Err(e) => {
                log_stage_event!(error, STAGE, self.node_id, "stage stopped on error", error = %e);
                self.abandon_pending().await;
            }
        }
        result
    }

    async fn process(&mut self) -> Result<StageReport, DeduplicationError> {
        while let Some(input) = self.input.recv().await {
            match input {
                DeduplicatorInput::Event(event) => {
                    self.report.events_received += 1;
                    if let Some(event) = self.deduplicator.handle_event(event) {
                        self.forward(event).await?;
                    }
                }
                DeduplicatorInput::MinimumGenerationNonAncient(generation) => {
                    self.deduplicator
                        .set_minimum_generation_non_ancient(generation)?;
                    self.report.window_shifts += 1;
                }
                DeduplicatorInput::Clear => {
                    self.deduplicator.clear();
                    self.report.clears += 1;
                }
            }
        }
        Ok(self.report)
    }

    async fn forward(&mut self, event: GossipEvent) -> Result<(), DeduplicationError> {
        let sender = event.sender_id();
        if self.output.send(event).await.is_err() {
            self.intake_counter.event_exited_intake_pipeline(sender);
            return Err(DeduplicationError::DownstreamClosed);
        }
        self.report.events_forwarded += 1;
        Ok(())
    }

    /// Refuse further input and release queued events from intake accounting.
    ///
    /// Waits for producers holding a reserved permit to use or drop it, so
    /// events sent through such a permit are released too.
    async fn abandon_pending(&mut self) {
        self.input.close();
        let mut abandoned = 0u64;
        while let Some(input) = self.input.recv().await {
            if let DeduplicatorInput::Event(event) = input {
                self.intake_counter
                    .event_exited_intake_pipeline(event.sender_id());
                abandoned += 1;
            }
        }
        if abandoned > 0 {
            log_stage_event!(
                warn,
                STAGE,
                self.node_id,
                "queued events dropped after stage failure",
                abandoned = abandoned
            );
        }
    }
}

/// Handle to a running stage.
///
/// Dropping the handle (and every clone of `sender()`) closes the input and
/// lets the stage finish on its own.
pub struct DeduplicationStageHandle {
    input: mpsc::Sender<DeduplicatorInput>,
    intake_counter: Arc<dyn IntakeEventCounter>,
    task: JoinHandle<Result<StageReport, DeduplicationError>>,
}

impl DeduplicationStageHandle {
    /// Raw inbound queue, for producers that run on their own task.
    ///
    /// Unlike `submit_event`, a failed send through this queue does not touch
    /// intake accounting. The `SendError` carries the rejected input back;
    /// callers must pass it to `release_unsent` (or release the event
    /// themselves) so the sender's in-flight count stays correct.
    pub fn sender(&self) -> mpsc::Sender<DeduplicatorInput> {
        self.input.clone()
    }

    /// Release an input the stage refused from intake accounting.
    ///
    /// Only events are counted; threshold updates and clears are ignored.
    pub fn release_unsent(&self, input: DeduplicatorInput) {
        if let DeduplicatorInput::Event(event) = input {
            self.intake_counter
                .event_exited_intake_pipeline(event.sender_id());
        }
    }

    /// Queue an event, waiting for space.
    ///
    /// # Errors
    /// `StageStopped` if the stage no longer accepts input. The event is
    /// released from intake accounting.
    pub async fn submit_event(&self, event: GossipEvent) -> Result<(), DeduplicationError> {
        self.input
            .send(DeduplicatorInput::Event(event))
            .await
            .map_err(|rejected| {
                self.release_unsent(rejected.0);
                DeduplicationError::StageStopped
            })
    }

    /// Queue an advance of the ancient threshold.
    pub async fn advance_window(&self, generation: u64) -> Result<(), DeduplicationError> {
        self.send(DeduplicatorInput::MinimumGenerationNonAncient(generation))
            .await
    }

    /// Queue a clear.
    pub async fn clear(&self) -> Result<(), DeduplicationError> {
        self.send(DeduplicatorInput::Clear).await
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Close the input and wait for the stage to drain.
    ///
    /// Clones handed out by `sender()` keep the input open; drop them first.
    pub async fn shutdown(self) -> Result<StageReport, DeduplicationError> {
        drop(self.input);
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(DeduplicationError::TaskFailed(e.to_string())),
        }
    }

    async fn send(&self, input: DeduplicatorInput) -> Result<(), DeduplicationError> {
        self.input
            .send(input)
            .await
            .map_err(|_| DeduplicationError::StageStopped)
    }
}
