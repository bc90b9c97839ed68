//! Input validation stage
//!
//! Normalizes the user goal once (collapse whitespace, trim) so every later node
//! sees consistent input, and cancels the run for input the planner could not do
//! anything sensible with. Rejection is a normal `cancelled` state with a
//! human-readable message, never an error.

use crate::state::{RunStatus, TaskState, TaskUpdate};
use async_trait::async_trait;
use flowgraph_core::{NodeHandler, NodeOutcome, Result};
use regex::Regex;

/// Shortest goal worth planning for.
pub const MIN_INPUT_CHARS: usize = 5;

/// Longest goal accepted.
pub const MAX_INPUT_CHARS: usize = 500;

/// Inputs longer than this with fewer than [`MIN_DISTINCT_CHARS`] distinct
/// characters are treated as degenerate repetition ("aaaa...", "lol lol lol").
pub const REPETITION_LENGTH_FLOOR: usize = 20;

/// Minimum distinct characters required past the repetition floor.
pub const MIN_DISTINCT_CHARS: usize = 3;

/// First node of the workflow: normalize and gate the user input.
pub struct ValidateNode {
    symbols_only: Regex,
}

impl ValidateNode {
    pub fn new() -> Self {
        Self {
            // Unicode punctuation, symbols, and whitespace only
            symbols_only: Regex::new(r"^[\p{P}\p{S}\s]+$").expect("valid regex"),
        }
    }

    fn cancel(message: impl Into<String>) -> TaskUpdate {
        TaskUpdate {
            status: Some(RunStatus::Cancelled),
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

impl Default for ValidateNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeHandler<TaskState> for ValidateNode {
    async fn run(&self, state: &TaskState) -> Result<NodeOutcome<TaskUpdate>> {
        let input = state.input.split_whitespace().collect::<Vec<_>>().join(" ");
        let length = input.chars().count();

        let update = if input.is_empty() {
            Self::cancel("Please enter a request.")
        } else if length < MIN_INPUT_CHARS {
            Self::cancel(format!(
                "Input is too short, must be at least {MIN_INPUT_CHARS} characters."
            ))
        } else if length > MAX_INPUT_CHARS {
            Self::cancel(format!(
                "Input is too long, must be at most {MAX_INPUT_CHARS} characters."
            ))
        } else if self.symbols_only.is_match(&input) {
            Self::cancel("Input must include some words (not only symbols).")
        } else if length > REPETITION_LENGTH_FLOOR
            && input.chars().collect::<std::collections::HashSet<_>>().len() < MIN_DISTINCT_CHARS
        {
            Self::cancel("Input looks repetitive. Please describe your request normally.")
        } else {
            tracing::debug!(input = %input, "input accepted");
            // write back the normalized input so later nodes use the clean form
            TaskUpdate {
                input: Some(input),
                status: Some(RunStatus::Planned),
                message: Some("Input is valid, proceeding to planning.".to_string()),
                ..Default::default()
            }
        };

        Ok(NodeOutcome::Update(update))
    }
}
