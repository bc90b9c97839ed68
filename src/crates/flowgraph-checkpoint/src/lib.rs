//! # flowgraph-checkpoint - Run Persistence for Paused Graph Executions
//!
//! **Trait-based checkpoint abstraction** for saving and restoring the position of a
//! graph run that paused at an interrupt. A checkpoint records exactly one thing: the
//! node a run is suspended at together with the state it carried into that node, keyed
//! by an opaque run identifier.
//!
//! ## Overview
//!
//! Checkpoints enable human-in-the-loop workflows:
//!
//! - **Pause** - a node raises an interrupt; the run controller saves `(run_id, node, state)`
//! - **Hand-off** - the interrupt payload travels to an external decision maker (UI, API caller)
//! - **Resume** - the decision comes back with the run id; the controller restores the
//!   checkpoint and continues from the exact node that paused
//!
//! ## Core Concepts
//!
//! ### CheckpointSaver Trait
//!
//! [`CheckpointSaver`] defines the persistence interface: [`put`](CheckpointSaver::put),
//! [`get`](CheckpointSaver::get), and [`remove`](CheckpointSaver::remove). The executor
//! and run controller only ever see a `dyn CheckpointSaver`, so a durable backend
//! (SQLite, PostgreSQL, Redis) can be substituted without touching the engine. The
//! state bound requires `Serialize + DeserializeOwned` for exactly that reason, even
//! though the in-memory saver never serializes.
//!
//! ### Lifecycle
//!
//! A checkpoint is created on the first interrupt of a run, overwritten if the run
//! pauses again later, and removed once a resumed run reaches the terminal node. Runs
//! that complete without pausing never touch the store. A resume for a run id that was
//! already consumed observes [`CheckpointError::NotFound`] - resume is not idempotent.
//!
//! ## Implementation Strategy
//!
//! This crate ships [`InMemorySaver`], a volatile reference implementation backed by
//! `Arc<RwLock<HashMap>>`. It is safe for concurrent pauses and resumes across many
//! runs, holds one live checkpoint per run id, applies no eviction, and loses
//! everything on process restart. Production deployments should implement
//! [`CheckpointSaver`] against a durable store and may attach an expiry policy for
//! abandoned runs; neither is provided here.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowgraph_checkpoint::{CheckpointSaver, InMemorySaver, RunCheckpoint};
//!
//! #[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
//! struct MyState { count: u32 }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let saver = InMemorySaver::new();
//!
//!     let checkpoint = RunCheckpoint::new("run-1", "approve", MyState { count: 3 });
//!     saver.put("run-1", checkpoint).await?;
//!
//!     if let Some(found) = saver.get("run-1").await? {
//!         println!("paused at {} since {}", found.node, found.created_at);
//!     }
//!
//!     saver.remove("run-1").await?;
//!     Ok(())
//! }
//! ```

pub mod checkpoint;
pub mod error;
pub mod memory;
pub mod traits;

pub use checkpoint::RunCheckpoint;
pub use error::{CheckpointError, Result};
pub use memory::InMemorySaver;
pub use traits::CheckpointSaver;
