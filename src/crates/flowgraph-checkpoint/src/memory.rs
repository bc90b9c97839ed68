//! In-memory checkpoint storage for development and testing
//!
//! [`InMemorySaver`] keeps one live checkpoint per run id in a thread-safe HashMap.
//! All data is lost on process restart; the reference policy applies no eviction and
//! no expiry. For anything that must survive a restart, implement
//! [`CheckpointSaver`] against a durable backend instead - the engine never depends
//! on this concrete type.

use crate::checkpoint::RunCheckpoint;
use crate::error::Result;
use crate::traits::CheckpointSaver;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Volatile checkpoint saver backed by `Arc<RwLock<HashMap>>`.
///
/// Cloning is shallow: clones share the same underlying map, so a saver can be
/// handed to the run controller and still be inspected from tests.
#[derive(Debug)]
pub struct InMemorySaver<S> {
    runs: Arc<RwLock<HashMap<String, RunCheckpoint<S>>>>,
}

impl<S> InMemorySaver<S> {
    /// Create an empty saver.
    pub fn new() -> Self {
        Self {
            runs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of paused runs currently stored.
    pub async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    /// True when no run is paused.
    pub async fn is_empty(&self) -> bool {
        self.runs.read().await.is_empty()
    }

    /// Drop every stored checkpoint (useful for test isolation).
    pub async fn clear(&self) {
        self.runs.write().await.clear();
    }
}

impl<S> Default for InMemorySaver<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for InMemorySaver<S> {
    fn clone(&self) -> Self {
        Self {
            runs: Arc::clone(&self.runs),
        }
    }
}

#[async_trait]
impl<S> CheckpointSaver<S> for InMemorySaver<S>
where
    S: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    async fn put(&self, run_id: &str, checkpoint: RunCheckpoint<S>) -> Result<()> {
        self.runs
            .write()
            .await
            .insert(run_id.to_string(), checkpoint);
        Ok(())
    }

    async fn get(&self, run_id: &str) -> Result<Option<RunCheckpoint<S>>> {
        Ok(self.runs.read().await.get(run_id).cloned())
    }

    async fn remove(&self, run_id: &str) -> Result<()> {
        self.runs.write().await.remove(run_id);
        Ok(())
    }
}
