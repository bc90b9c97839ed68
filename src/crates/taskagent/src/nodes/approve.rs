//! Human approval checkpoint
//!
//! The one node in the canonical workflow that pauses the run. With steps on the
//! table it raises an `approval_request` interrupt carrying them; the decision
//! comes back through [`NodeHandler::resume`] as either a raw JSON bool or a
//! `{"approve": bool}` object - both shapes are normalized here, at the boundary,
//! so nothing past this node ever sees the ambiguity. Rejection cancels the run.
//!
//! A run with nothing to approve (no steps) is auto-approved without pausing, and
//! a cancelled run passes straight through.

use crate::state::{RunStatus, TaskState, TaskUpdate};
use async_trait::async_trait;
use flowgraph_core::{InterruptPayload, NodeHandler, NodeOutcome, Result, ResumeValue};
use serde_json::{json, Value};

/// Interrupt tag the UI matches on.
pub const APPROVAL_REQUEST: &str = "approval_request";

/// Third node of the workflow: pause for a human decision on the plan.
pub struct ApproveNode;

/// Normalize the externally supplied decision into a plain bool.
///
/// Accepts `true`/`false` and `{"approve": true/false}`; anything else counts
/// as a rejection.
pub fn normalize_decision(decision: &ResumeValue) -> bool {
    match decision {
        Value::Bool(approve) => *approve,
        Value::Object(map) => map.get("approve").and_then(Value::as_bool).unwrap_or(false),
        _ => false,
    }
}

#[async_trait]
impl NodeHandler<TaskState> for ApproveNode {
    async fn run(&self, state: &TaskState) -> Result<NodeOutcome<TaskUpdate>> {
        if state.is_cancelled() {
            return Ok(NodeOutcome::Update(TaskUpdate::default()));
        }

        let steps = state.steps.clone().unwrap_or_default();
        if steps.is_empty() {
            return Ok(NodeOutcome::Update(TaskUpdate {
                approved: Some(true),
                message: Some("There are no steps to approve.".to_string()),
                ..Default::default()
            }));
        }

        Ok(NodeOutcome::Interrupt(InterruptPayload::new(
            APPROVAL_REQUEST,
            json!({ "steps": steps }),
        )))
    }

    async fn resume(&self, _state: &TaskState, decision: ResumeValue) -> Result<TaskUpdate> {
        if !normalize_decision(&decision) {
            tracing::info!("plan rejected");
            return Ok(TaskUpdate {
                approved: Some(false),
                status: Some(RunStatus::Cancelled),
                message: Some("User rejected the plan.".to_string()),
                ..Default::default()
            });
        }

        Ok(TaskUpdate {
            approved: Some(true),
            message: Some("Plan approved. Proceeding to execution.".to_string()),
            ..Default::default()
        })
    }
}
