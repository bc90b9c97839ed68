//! # flowgraph-core - Graph Execution with Pause/Resume Interrupts
//!
//! A small workflow-orchestration engine: a directed graph of processing stages
//! carries a shared, typed run state through its nodes, and any node can **pause the
//! run mid-flight**, persist exactly where it paused, and later continue from an
//! externally supplied decision.
//!
//! ## Components
//!
//! - [`GraphState`] - typed state with a hand-written shallow partial-update merge
//! - [`NodeHandler`] - async node contract: read state, return a partial update or
//!   raise an [`InterruptPayload`]; an explicit `resume` half receives the decision
//! - [`GraphBuilder`] / [`Graph`] - static node/edge declaration with compile-time
//!   validation; conditional edges route on the merged state
//! - [`Executor`] - sequential walk: invoke, merge, route, until [`END`] or a pause
//! - [`RunController`] - public `start`/`resume` API, wiring the executor to a
//!   [`CheckpointSaver`](flowgraph_checkpoint::CheckpointSaver)
//!
//! ## Execution model
//!
//! `start` creates a fresh state and run id and walks nodes until the graph reaches
//! [`END`] (returning [`RunResult::Final`]) or a node interrupts (returning
//! [`RunResult::Paused`] with the payload and run id; the pre-merge state is
//! checkpointed). `resume` restores the checkpoint and delivers the decision to the
//! same node invocation that requested it - conceptually the decision *is* the
//! return value of the suspending call.
//!
//! Within one run execution is strictly sequential; across runs the engine imposes
//! no concurrency bound beyond what the checkpoint store and the node handlers'
//! external collaborators can sustain.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowgraph_core::{GraphBuilder, RunController, RunResult, START, END};
//! use flowgraph_checkpoint::InMemorySaver;
//! use std::sync::Arc;
//!
//! let graph = GraphBuilder::new()
//!     .add_node("draft", DraftNode)
//!     .add_node("review", ReviewNode) // raises an approval interrupt
//!     .add_node("publish", PublishNode)
//!     .add_edge(START, "draft")
//!     .add_edge("draft", "review")
//!     .add_conditional_edge(
//!         "review",
//!         |s: &DocState| if s.approved { "publish".into() } else { END.into() },
//!         ["publish", END],
//!     )
//!     .add_edge("publish", END)
//!     .compile()?;
//!
//! let controller = RunController::new(graph, Arc::new(InMemorySaver::new()));
//! match controller.start(DocState::new("...")).await? {
//!     RunResult::Final(state) => { /* done in one pass */ }
//!     RunResult::Paused { run_id, payload } => {
//!         // hand payload to the UI; later:
//!         let finished = controller.resume(&run_id, serde_json::json!(true)).await?;
//!     }
//! }
//! ```

pub mod controller;
pub mod error;
pub mod executor;
pub mod graph;
pub mod node;
pub mod state;

pub use controller::{RunController, RunResult};
pub use error::{GraphError, Result};
pub use executor::{Executor, RunOutcome, StepOutcome};
pub use graph::{Edge, Graph, GraphBuilder, NodeId, Router, END, START};
pub use node::{InterruptPayload, NodeHandler, NodeOutcome, ResumeValue};
pub use state::GraphState;
