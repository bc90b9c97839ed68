//! Graph wiring and the run facade
//!
//! The canonical topology:
//!
//! ```text
//! START -> validate -> plan -> approve -> { execute if approved else finalize }
//!                                          execute -> finalize -> END
//! ```
//!
//! [`build_graph`] declares the nodes and edges; the conditional edge after
//! `approve` reads the merged state. [`TaskRunner`] wraps a
//! [`RunController`] so callers deal in `input` strings and decision values
//! instead of states and payloads.

use crate::llm::TaskModel;
use crate::nodes::{ApproveNode, ExecuteNode, FinalizeNode, PlanNode, ValidateNode};
use crate::state::TaskState;
use flowgraph_checkpoint::{CheckpointSaver, InMemorySaver};
use flowgraph_core::{
    Graph, GraphBuilder, Result, ResumeValue, RunController, RunResult, END, START,
};
use serde_json::Value;
use std::sync::Arc;

/// Compile the task workflow graph over the given generative collaborator.
pub fn build_graph(model: Arc<dyn TaskModel>) -> Result<Graph<TaskState>> {
    GraphBuilder::new()
        .add_node("validate", ValidateNode::new())
        .add_node("plan", PlanNode::new(Arc::clone(&model)))
        .add_node("approve", ApproveNode)
        .add_node("execute", ExecuteNode::new(model))
        .add_node("finalize", FinalizeNode)
        .add_edge(START, "validate")
        .add_edge("validate", "plan")
        .add_edge("plan", "approve")
        .add_conditional_edge(
            "approve",
            |state: &TaskState| {
                if state.approved == Some(true) {
                    "execute".to_string()
                } else {
                    "finalize".to_string()
                }
            },
            ["execute", "finalize"],
        )
        .add_edge("execute", "finalize")
        .add_edge("finalize", END)
        .compile()
}

/// Outcome of starting or resuming a run, shaped for callers.
#[derive(Debug)]
pub enum AgentOutcome {
    /// The run reached its terminal state
    Final(TaskState),

    /// The run paused for plan approval; resume it with `run_id`
    NeedsApproval { run_id: String, steps: Vec<String> },
}

/// Public facade over the workflow: `start(input)` and `resume(run_id, decision)`.
pub struct TaskRunner {
    controller: RunController<TaskState>,
}

impl TaskRunner {
    /// Build a runner with the volatile in-memory checkpoint store.
    ///
    /// Paused runs are lost on process restart; use
    /// [`with_checkpointer`](Self::with_checkpointer) to plug in a durable
    /// backend.
    pub fn new(model: Arc<dyn TaskModel>) -> Result<Self> {
        Self::with_checkpointer(model, Arc::new(InMemorySaver::new()))
    }

    /// Build a runner over an explicit checkpoint backend.
    pub fn with_checkpointer(
        model: Arc<dyn TaskModel>,
        checkpoints: Arc<dyn CheckpointSaver<TaskState>>,
    ) -> Result<Self> {
        let graph = build_graph(model)?;
        Ok(Self {
            controller: RunController::new(graph, checkpoints),
        })
    }

    /// Start a new run for the given goal.
    pub async fn start(&self, input: &str) -> Result<AgentOutcome> {
        match self.controller.start(TaskState::new(input)).await? {
            RunResult::Final(state) => Ok(AgentOutcome::Final(state)),
            RunResult::Paused { run_id, payload } => Ok(AgentOutcome::NeedsApproval {
                run_id,
                steps: steps_from_payload(&payload.value),
            }),
        }
    }

    /// Resume a paused run with the user's decision (raw bool or
    /// `{"approve": bool}` - the approve node normalizes the shape).
    pub async fn resume(&self, run_id: &str, decision: ResumeValue) -> Result<AgentOutcome> {
        match self.controller.resume(run_id, decision).await? {
            RunResult::Final(state) => Ok(AgentOutcome::Final(state)),
            RunResult::Paused { run_id, payload } => Ok(AgentOutcome::NeedsApproval {
                run_id,
                steps: steps_from_payload(&payload.value),
            }),
        }
    }
}

fn steps_from_payload(value: &Value) -> Vec<String> {
    value["steps"]
        .as_array()
        .map(|steps| {
            steps
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
