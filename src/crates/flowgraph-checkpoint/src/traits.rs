//! The `CheckpointSaver` trait - persistence seam for paused runs
//!
//! Implementors provide keyed storage for [`RunCheckpoint`]s. The engine holds the
//! saver behind `Arc<dyn CheckpointSaver<S>>` so backends are swappable: the shipped
//! [`InMemorySaver`](crate::memory::InMemorySaver) for development and tests, a
//! database-backed saver for deployments that must survive restarts.
//!
//! The serde bounds on `S` exist for durable implementations; in-memory storage
//! ignores them.

use crate::checkpoint::RunCheckpoint;
use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Keyed persistence for paused runs.
///
/// Contract:
/// - `put` inserts or overwrites the single live checkpoint for a run id
/// - `get` returns `Ok(None)` when no checkpoint exists (unknown id, consumed
///   run, or a run that never paused) - it never fabricates a default
/// - `remove` is a no-op for absent ids
///
/// Implementations must tolerate concurrent calls from many runs pausing and
/// resuming at once; one run's write must never corrupt another's entry.
#[async_trait]
pub trait CheckpointSaver<S>: Send + Sync
where
    S: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    /// Save (or overwrite) the checkpoint for a run.
    async fn put(&self, run_id: &str, checkpoint: RunCheckpoint<S>) -> Result<()>;

    /// Fetch the checkpoint for a run, if one is stored.
    async fn get(&self, run_id: &str) -> Result<Option<RunCheckpoint<S>>>;

    /// Delete the checkpoint for a run once it has terminated.
    async fn remove(&self, run_id: &str) -> Result<()>;
}
