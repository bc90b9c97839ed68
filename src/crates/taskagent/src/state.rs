//! Task run state - the single record threaded through the workflow
//!
//! Lifecycle:
//! - start: `{ input, status: planned }`
//! - validate: input normalized, or the run flips to `cancelled` with a message
//! - plan: `steps` filled (set at most once per run)
//! - approve: `approved` set; rejection flips the run to `cancelled`
//! - execute: `results` filled, `status: done`
//! - finalize: final status and a user-facing message guaranteed
//!
//! Invariants:
//! - `results`, when present, pairs with `steps` by index: same length,
//!   `results[i].step == steps[i]`
//! - `status: cancelled` means execute never ran and `results` stays absent
//! - `status: done` implies `approved == Some(true)`
//!
//! "Not yet set" is real optionality (`None`), never a sentinel status value.

use flowgraph_core::GraphState;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Planned,
    Done,
    Cancelled,
}

/// One executed step paired with its outcome note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: String,
    pub note: String,
}

/// Shared state flowing through the task workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    /// User-supplied goal, normalized once by the validate stage
    pub input: String,

    /// Planned steps, set at most once per run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,

    /// Approval decision; `None` means not yet decided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,

    /// Execution outcome per step, index-aligned with `steps`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<StepResult>>,

    /// Current lifecycle phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,

    /// Latest human-readable status explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TaskState {
    /// Initial state for a fresh run.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            steps: None,
            approved: None,
            results: None,
            status: Some(RunStatus::Planned),
            message: None,
        }
    }

    /// True once the run has been cancelled by any stage.
    pub fn is_cancelled(&self) -> bool {
        self.status == Some(RunStatus::Cancelled)
    }
}

/// Partial update returned by a node handler.
///
/// Fields left as `None` are untouched by the merge; a `Some` field replaces
/// the state's field wholesale (a handler that sets `steps` replaces the
/// entire sequence).
#[derive(Debug, Default)]
pub struct TaskUpdate {
    pub input: Option<String>,
    pub steps: Option<Vec<String>>,
    pub approved: Option<bool>,
    pub results: Option<Vec<StepResult>>,
    pub status: Option<RunStatus>,
    pub message: Option<String>,
}

impl GraphState for TaskState {
    type Update = TaskUpdate;

    fn apply(&mut self, update: TaskUpdate) {
        if let Some(input) = update.input {
            self.input = input;
        }
        if let Some(steps) = update.steps {
            self.steps = Some(steps);
        }
        if let Some(approved) = update.approved {
            self.approved = Some(approved);
        }
        if let Some(results) = update.results {
            self.results = Some(results);
        }
        if let Some(status) = update.status {
            self.status = Some(status);
        }
        if let Some(message) = update.message {
            self.message = Some(message);
        }
    }
}
