//! Workflow node handlers: validate, plan, approve, execute, finalize
//!
//! Each node reads the shared [`TaskState`](crate::state::TaskState) and returns a
//! partial update; fields a node does not mention stay untouched. Domain policy
//! (length limits, step caps, message wording) lives here, not in the engine.

pub mod approve;
pub mod execute;
pub mod finalize;
pub mod plan;
pub mod validate;

pub use approve::ApproveNode;
pub use execute::{ExecuteNode, NOTE_PLACEHOLDER};
pub use finalize::FinalizeNode;
pub use plan::{PlanNode, MAX_PLAN_STEPS};
pub use validate::ValidateNode;
