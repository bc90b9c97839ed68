//! Run controller - the public entry point for starting and resuming runs
//!
//! [`RunController`] wires the [`Executor`] to a [`CheckpointSaver`]:
//!
//! - [`start`](RunController::start) mints a fresh run id, drives from the entry
//!   node, and either returns the final state or persists a checkpoint and hands
//!   the interrupt payload to the caller. Checkpoints themselves are never exposed.
//! - [`resume`](RunController::resume) loads the checkpoint for a run id (failing
//!   with [`GraphError::UnknownRun`] when none exists), injects the decision into
//!   the paused node, and continues the walk. Completion clears the checkpoint; a
//!   later interrupt overwrites it with the new pause point. Resume is therefore
//!   not idempotent: a second resume for a consumed run id fails with `UnknownRun`.

use crate::error::{GraphError, Result};
use crate::executor::{Executor, RunOutcome};
use crate::graph::Graph;
use crate::node::{InterruptPayload, ResumeValue};
use crate::state::GraphState;
use flowgraph_checkpoint::{CheckpointSaver, RunCheckpoint};
use std::sync::Arc;
use uuid::Uuid;

/// What a `start` or `resume` call yields to the caller.
#[derive(Debug)]
pub enum RunResult<S: GraphState> {
    /// The run reached the terminal node
    Final(S),

    /// The run is paused; hand `payload` to the decision maker and keep `run_id`
    Paused {
        run_id: String,
        payload: InterruptPayload,
    },
}

/// Public API over a compiled graph: `start(input)` and `resume(run_id, decision)`.
pub struct RunController<S: GraphState> {
    graph: Arc<Graph<S>>,
    executor: Executor<S>,
    checkpoints: Arc<dyn CheckpointSaver<S>>,
}

impl<S: GraphState> RunController<S> {
    /// Create a controller over a compiled graph and a checkpoint backend.
    pub fn new(graph: Graph<S>, checkpoints: Arc<dyn CheckpointSaver<S>>) -> Self {
        let graph = Arc::new(graph);
        Self {
            executor: Executor::new(Arc::clone(&graph)),
            graph,
            checkpoints,
        }
    }

    /// Start a fresh run from the entry node with the given initial state.
    pub async fn start(&self, state: S) -> Result<RunResult<S>> {
        let run_id = Uuid::new_v4().to_string();
        tracing::info!(%run_id, "starting run");

        match self.executor.run_from(self.graph.entry(), state).await? {
            RunOutcome::Complete(state) => {
                tracing::info!(%run_id, "run completed without pausing");
                Ok(RunResult::Final(state))
            }
            RunOutcome::Suspended {
                node,
                payload,
                state,
            } => {
                tracing::info!(%run_id, %node, "run paused, checkpoint saved");
                self.checkpoints
                    .put(&run_id, RunCheckpoint::new(run_id.clone(), node, state))
                    .await?;
                Ok(RunResult::Paused { run_id, payload })
            }
        }
    }

    /// Resume a paused run with an externally supplied decision.
    pub async fn resume(&self, run_id: &str, decision: ResumeValue) -> Result<RunResult<S>> {
        let checkpoint = self
            .checkpoints
            .get(run_id)
            .await?
            .ok_or_else(|| GraphError::UnknownRun(run_id.to_string()))?;

        tracing::info!(%run_id, node = %checkpoint.node, "resuming run");

        match self
            .executor
            .resume_from(&checkpoint.node, checkpoint.state, decision)
            .await?
        {
            RunOutcome::Complete(state) => {
                self.checkpoints.remove(run_id).await?;
                tracing::info!(%run_id, "run completed, checkpoint cleared");
                Ok(RunResult::Final(state))
            }
            RunOutcome::Suspended {
                node,
                payload,
                state,
            } => {
                // A later interrupt replaces the pause point rather than clearing it.
                tracing::info!(%run_id, %node, "run paused again, checkpoint overwritten");
                self.checkpoints
                    .put(run_id, RunCheckpoint::new(run_id, node, state))
                    .await?;
                Ok(RunResult::Paused {
                    run_id: run_id.to_string(),
                    payload,
                })
            }
        }
    }
}
