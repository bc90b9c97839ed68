//! Checkpoint record for a paused run
//!
//! A [`RunCheckpoint`] captures where a run stopped: the node that raised the
//! interrupt and the state that flowed *into* that node. Nothing produced by the
//! interrupting node is part of the snapshot - the node has not finished yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a suspended run, keyed by its run id.
///
/// `state` is the merged state as of the moment the paused node was invoked.
/// On resume the engine re-enters that same node with this state plus the
/// externally supplied decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCheckpoint<S> {
    /// Opaque, globally unique run identifier generated at start
    pub run_id: String,

    /// Node the run is suspended at
    pub node: String,

    /// State carried into the suspended node (pre-merge)
    pub state: S,

    /// When the run paused
    pub created_at: DateTime<Utc>,
}

impl<S> RunCheckpoint<S> {
    /// Create a checkpoint stamped with the current time.
    pub fn new(run_id: impl Into<String>, node: impl Into<String>, state: S) -> Self {
        Self {
            run_id: run_id.into(),
            node: node.into(),
            state,
            created_at: Utc::now(),
        }
    }
}
