//! Sequential executor: drive a run from a node until `END` or an interrupt
//!
//! Within a single run execution is strictly sequential - handlers never overlap and
//! an interrupt fully suspends the run until its matching resume. Concurrency lives
//! one level up: each run owns its state exclusively and any number of runs may be in
//! flight at once.
//!
//! One step of the walk:
//!
//! 1. look up the handler bound to the current node
//! 2. invoke it with the current state
//! 3. if it raises an interrupt, return [`StepOutcome::Suspended`] carrying the
//!    *unmerged* state - the interrupting node has not produced its partial update yet
//! 4. otherwise merge the partial update shallowly into the state
//! 5. route: evaluate the node's edge (conditional routers see the merged state)
//! 6. [`StepOutcome::Done`] when the next node is [`END`], else continue
//!
//! Resumption is not a re-entry from scratch: [`Executor::resume_from`] feeds the
//! decision to the paused node's [`resume`](crate::NodeHandler::resume) half, merges
//! the update that produces, and walks on from the node *after* the interrupting one.

use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId, END};
use crate::node::{InterruptPayload, NodeOutcome, ResumeValue};
use crate::state::GraphState;
use std::sync::Arc;

/// Result of executing a single node.
#[derive(Debug)]
pub enum StepOutcome<S: GraphState> {
    /// Node completed; continue the walk at `next` with the merged state
    Continue { next: NodeId, state: S },

    /// Node raised an interrupt; `state` is the pre-merge state to checkpoint
    Suspended {
        node: NodeId,
        payload: InterruptPayload,
        state: S,
    },

    /// The walk reached [`END`]
    Done { state: S },
}

/// Result of driving a run as far as it will go.
#[derive(Debug)]
pub enum RunOutcome<S: GraphState> {
    /// The run reached [`END`] with this final state
    Complete(S),

    /// The run is paused at `node`, waiting for an external decision
    Suspended {
        node: NodeId,
        payload: InterruptPayload,
        state: S,
    },
}

/// Walks a compiled [`Graph`], one node at a time.
pub struct Executor<S: GraphState> {
    graph: Arc<Graph<S>>,
}

impl<S: GraphState> Executor<S> {
    /// Create an executor over a compiled graph.
    pub fn new(graph: Arc<Graph<S>>) -> Self {
        Self { graph }
    }

    /// Execute the single node `node` against `state`.
    pub async fn step(&self, node: &str, state: S) -> Result<StepOutcome<S>> {
        let handler = self.graph.handler(node)?;

        match handler.run(&state).await? {
            NodeOutcome::Interrupt(payload) => {
                tracing::debug!(node, kind = %payload.kind, "node raised interrupt");
                Ok(StepOutcome::Suspended {
                    node: node.to_string(),
                    payload,
                    state,
                })
            }
            NodeOutcome::Update(update) => {
                let mut state = state;
                state.apply(update);
                self.route(node, state)
            }
        }
    }

    /// Drive the run from `node` until it completes or suspends.
    pub async fn run_from(&self, node: &str, state: S) -> Result<RunOutcome<S>> {
        let mut current = node.to_string();
        let mut state = state;

        loop {
            match self.step(&current, state).await? {
                StepOutcome::Continue { next, state: merged } => {
                    tracing::debug!(from = %current, to = %next, "advancing");
                    current = next;
                    state = merged;
                }
                StepOutcome::Suspended {
                    node,
                    payload,
                    state,
                } => {
                    return Ok(RunOutcome::Suspended {
                        node,
                        payload,
                        state,
                    })
                }
                StepOutcome::Done { state } => return Ok(RunOutcome::Complete(state)),
            }
        }
    }

    /// Continue a paused run: deliver `decision` to the interrupted node, merge
    /// the update it produces, and keep walking from the node after it.
    pub async fn resume_from(
        &self,
        node: &str,
        state: S,
        decision: ResumeValue,
    ) -> Result<RunOutcome<S>> {
        let handler = self.graph.handler(node)?;

        let update = handler.resume(&state, decision).await.map_err(|err| {
            // The default NodeHandler::resume does not know its node id.
            match err {
                GraphError::NotInterruptible { .. } => GraphError::NotInterruptible {
                    node: node.to_string(),
                },
                other => other,
            }
        })?;

        let mut state = state;
        state.apply(update);

        match self.route(node, state)? {
            StepOutcome::Continue { next, state } => self.run_from(&next, state).await,
            StepOutcome::Done { state } => Ok(RunOutcome::Complete(state)),
            StepOutcome::Suspended { .. } => unreachable!("route never suspends"),
        }
    }

    /// Evaluate the outgoing edge of `node` against the merged state.
    fn route(&self, node: &str, state: S) -> Result<StepOutcome<S>> {
        let next = self.graph.next_node(node, &state)?;
        if next == END {
            Ok(StepOutcome::Done { state })
        } else {
            Ok(StepOutcome::Continue { next, state })
        }
    }
}
