//! Terminal normalization stage
//!
//! Last node of every path through the graph. Resolves the final status - a run
//! stays `cancelled`, an unapproved run becomes `cancelled`, everything else is
//! `done` - and guarantees a user-facing message. It writes nothing but `status`
//! and `message`: under shallow merge, echoing `steps`/`results` here would
//! overwrite absent fields on cancelled paths and break the pairing invariants.

use crate::state::{RunStatus, TaskState, TaskUpdate};
use async_trait::async_trait;
use flowgraph_core::{NodeHandler, NodeOutcome, Result};

/// Fifth and final node of the workflow.
pub struct FinalizeNode;

#[async_trait]
impl NodeHandler<TaskState> for FinalizeNode {
    async fn run(&self, state: &TaskState) -> Result<NodeOutcome<TaskUpdate>> {
        let approved = state.approved.unwrap_or(false);

        let status = match state.status {
            Some(RunStatus::Done) => RunStatus::Done,
            Some(RunStatus::Cancelled) => RunStatus::Cancelled,
            _ if !approved => RunStatus::Cancelled,
            _ => RunStatus::Done,
        };

        let message = state.message.clone().unwrap_or_else(|| {
            if status == RunStatus::Cancelled {
                "Task was cancelled or not approved.".to_string()
            } else {
                format!(
                    "Task completed successfully with {} steps and {} results.",
                    state.steps.as_ref().map_or(0, Vec::len),
                    state.results.as_ref().map_or(0, Vec::len),
                )
            }
        });

        Ok(NodeOutcome::Update(TaskUpdate {
            status: Some(status),
            message: Some(message),
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgraph_core::GraphState;

    async fn finalized(state: TaskState) -> TaskState {
        let mut state = state;
        match FinalizeNode.run(&state).await.unwrap() {
            NodeOutcome::Update(update) => state.apply(update),
            NodeOutcome::Interrupt(_) => panic!("finalize never interrupts"),
        }
        state
    }

    #[tokio::test]
    async fn cancelled_stays_cancelled() {
        let mut state = TaskState::new("goal");
        state.status = Some(RunStatus::Cancelled);
        state.message = Some("User rejected the plan.".to_string());

        let state = finalized(state).await;
        assert_eq!(state.status, Some(RunStatus::Cancelled));
        assert_eq!(state.message.as_deref(), Some("User rejected the plan."));
        assert!(state.results.is_none());
    }

    #[tokio::test]
    async fn unapproved_run_is_treated_as_cancelled() {
        // planned but never approved (e.g. no approval stage ran to completion)
        let state = finalized(TaskState::new("goal")).await;
        assert_eq!(state.status, Some(RunStatus::Cancelled));
        assert!(!state.message.unwrap().is_empty());
    }

    #[tokio::test]
    async fn done_run_keeps_its_message() {
        let mut state = TaskState::new("goal");
        state.approved = Some(true);
        state.status = Some(RunStatus::Done);
        state.message = Some("Executed 2 steps".to_string());

        let state = finalized(state).await;
        assert_eq!(state.status, Some(RunStatus::Done));
        assert_eq!(state.message.as_deref(), Some("Executed 2 steps"));
    }

    #[tokio::test]
    async fn approved_stepless_run_finishes_done_with_default_message() {
        let mut state = TaskState::new("goal");
        state.approved = Some(true);
        state.message = None;

        let state = finalized(state).await;
        assert_eq!(state.status, Some(RunStatus::Done));
        assert!(state.message.unwrap().contains("0 steps"));
    }
}
