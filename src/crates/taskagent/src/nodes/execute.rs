//! Execution stage
//!
//! Produces one short note per planned step via the generative collaborator. The
//! step/note pairing is index-aligned by construction: the i-th result always
//! carries the i-th step, a missing note is filled with [`NOTE_PLACEHOLDER`], and
//! surplus notes are discarded. This repair policy belongs to the node - the
//! engine never retries or patches collaborator output.

use crate::llm::TaskModel;
use crate::state::{RunStatus, StepResult, TaskState, TaskUpdate};
use async_trait::async_trait;
use flowgraph_core::{GraphError, NodeHandler, NodeOutcome, Result};
use std::sync::Arc;

/// Stand-in note when the model under-produces.
pub const NOTE_PLACEHOLDER: &str = "No note generated.";

/// Fourth node of the workflow: turn approved steps into `results`.
pub struct ExecuteNode {
    model: Arc<dyn TaskModel>,
}

impl ExecuteNode {
    pub fn new(model: Arc<dyn TaskModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl NodeHandler<TaskState> for ExecuteNode {
    async fn run(&self, state: &TaskState) -> Result<NodeOutcome<TaskUpdate>> {
        if state.is_cancelled() {
            return Ok(NodeOutcome::Update(TaskUpdate::default()));
        }

        let steps = state.steps.clone().unwrap_or_default();
        if steps.is_empty() {
            return Ok(NodeOutcome::Update(TaskUpdate::default()));
        }

        let notes = self
            .model
            .execution_notes(&steps)
            .await
            .map_err(|err| GraphError::node_failed("execute", err))?;

        if notes.len() != steps.len() {
            tracing::warn!(
                steps = steps.len(),
                notes = notes.len(),
                "note count mismatch, clamping to steps"
            );
        }

        let results: Vec<StepResult> = steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| StepResult {
                step,
                note: notes
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| NOTE_PLACEHOLDER.to_string()),
            })
            .collect();

        let message = format!("Executed {} steps", results.len());
        Ok(NodeOutcome::Update(TaskUpdate {
            results: Some(results),
            status: Some(RunStatus::Done),
            message: Some(message),
            ..Default::default()
        }))
    }
}
