//! Planning stage
//!
//! Asks the generative collaborator for an ordered list of short directives toward
//! the validated goal. The model is not trusted on count or whitespace: blank
//! entries are dropped and the plan is truncated to [`MAX_PLAN_STEPS`]. A cancelled
//! run passes straight through.

use crate::llm::TaskModel;
use crate::state::{RunStatus, TaskState, TaskUpdate};
use async_trait::async_trait;
use flowgraph_core::{GraphError, NodeHandler, NodeOutcome, Result};
use std::sync::Arc;

/// Upper bound on steps kept from the planner output.
pub const MAX_PLAN_STEPS: usize = 5;

/// Second node of the workflow: produce `steps` from the goal.
pub struct PlanNode {
    model: Arc<dyn TaskModel>,
}

impl PlanNode {
    pub fn new(model: Arc<dyn TaskModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl NodeHandler<TaskState> for PlanNode {
    async fn run(&self, state: &TaskState) -> Result<NodeOutcome<TaskUpdate>> {
        if state.is_cancelled() {
            return Ok(NodeOutcome::Update(TaskUpdate::default()));
        }

        let drafted = self
            .model
            .plan_steps(&state.input)
            .await
            .map_err(|err| GraphError::node_failed("plan", err))?;

        let steps: Vec<String> = drafted
            .into_iter()
            .map(|step| step.trim().to_string())
            .filter(|step| !step.is_empty())
            .take(MAX_PLAN_STEPS)
            .collect();

        tracing::info!(steps = steps.len(), "plan drafted");

        Ok(NodeOutcome::Update(TaskUpdate {
            steps: Some(steps),
            status: Some(RunStatus::Planned),
            ..Default::default()
        }))
    }
}
