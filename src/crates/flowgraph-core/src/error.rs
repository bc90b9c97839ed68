//! Error types for graph construction and execution
//!
//! Two families matter to callers and stay distinguishable: configuration errors
//! ([`GraphError::InvalidGraph`], [`GraphError::UnmappedBranch`]) which mean the
//! graph itself is wrong and the engine refuses to run, and runtime errors such as
//! [`GraphError::UnknownRun`] which a caller can branch on (e.g. map to HTTP 404).

use flowgraph_checkpoint::CheckpointError;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by graph construction, execution, and resumption
#[derive(Error, Debug)]
pub enum GraphError {
    /// Graph failed structural validation at compile time
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// An edge or lookup referenced a node that was never declared
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// A conditional router returned a target outside its declared branches.
    /// This is a configuration bug, not a data error.
    #[error("conditional edge on '{node}' routed to undeclared target '{target}'")]
    UnmappedBranch { node: String, target: String },

    /// No checkpoint exists for the run id: unknown, already consumed, or the
    /// run never paused
    #[error("unknown run: {0}")]
    UnknownRun(String),

    /// A resume decision was delivered to a node that never interrupts
    #[error("node '{node}' does not accept resume decisions")]
    NotInterruptible { node: String },

    /// A node handler (or the external collaborator it calls) failed
    #[error("node '{node}' failed: {message}")]
    NodeFailed { node: String, message: String },

    /// Checkpoint store failure
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

impl GraphError {
    /// Build a [`GraphError::NodeFailed`] from any displayable error.
    pub fn node_failed(node: impl Into<String>, err: impl std::fmt::Display) -> Self {
        GraphError::NodeFailed {
            node: node.into(),
            message: err.to_string(),
        }
    }
}
