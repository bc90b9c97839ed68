//! Node handler contract and the interrupt channel
//!
//! A node is an async handler that reads the current state and produces a partial
//! update. A node may instead raise an **interrupt**: hand a payload to the caller,
//! suspend the run, and wait for an externally supplied decision. The two halves of
//! an interrupting node are explicit engine-visible states rather than a suspended
//! coroutine:
//!
//! - [`NodeHandler::run`] - "about to request a decision": returns
//!   [`NodeOutcome::Interrupt`] with the payload. Nothing this call produced is
//!   merged; the checkpointed state is the state the node was invoked with.
//! - [`NodeHandler::resume`] - "resumed with a decision": receives the decision as
//!   if it were the return value of the suspending call and produces the node's
//!   final partial update.
//!
//! Modeling the pause this way keeps the continuation out of the language runtime,
//! which is what makes resume-after-process-restart possible with a durable
//! checkpoint backend.

use crate::error::{GraphError, Result};
use crate::state::GraphState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decision value supplied out-of-band on resume.
///
/// Opaque to the engine; the interrupting node interprets it. Boundary layers are
/// expected to normalize ambiguous wire shapes before they get here.
pub type ResumeValue = Value;

/// Payload handed to the caller when a node suspends the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterruptPayload {
    /// Tag describing what kind of decision is being requested
    pub kind: String,

    /// Structured data for the decision maker (e.g. the steps awaiting approval)
    pub value: Value,
}

impl InterruptPayload {
    /// Create a payload with a kind tag and structured value.
    pub fn new(kind: impl Into<String>, value: Value) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

/// What a node invocation produced: a partial update, or a request to pause.
#[derive(Debug)]
pub enum NodeOutcome<U> {
    /// Merge this partial update and continue walking the graph
    Update(U),

    /// Suspend the run and hand the payload to the caller
    Interrupt(InterruptPayload),
}

/// An executable node bound to a graph node id.
///
/// Handlers never see the checkpoint store; persistence is the run controller's
/// concern. Handlers may perform their own I/O (model calls, searches) and may
/// apply their own repair policies to collaborator output - the engine does not
/// retry on their behalf.
#[async_trait]
pub trait NodeHandler<S: GraphState>: Send + Sync {
    /// Invoke the node against the current state.
    async fn run(&self, state: &S) -> Result<NodeOutcome<S::Update>>;

    /// Continue the node after an interrupt, with the externally supplied
    /// decision standing in for the return value of the suspending call.
    ///
    /// Only nodes that can return [`NodeOutcome::Interrupt`] need to override
    /// this; the default rejects the decision outright.
    async fn resume(&self, state: &S, decision: ResumeValue) -> Result<S::Update> {
        let _ = (state, decision);
        Err(GraphError::NotInterruptible {
            node: "<unbound>".to_string(),
        })
    }
}
