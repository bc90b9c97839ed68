//! The `GraphState` trait - typed state with shallow partial-update merge
//!
//! Every run threads a single state value through the graph. Node handlers return a
//! *partial* update (the associated [`Update`](GraphState::Update) type, typically a
//! struct of `Option` fields) and [`apply`](GraphState::apply) folds it in. The merge
//! is a shallow field-level overwrite: a field the update mentions replaces the whole
//! field, a field it leaves out is untouched. No deep merging, no reflection, no
//! runtime schema - just a hand-written `apply`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// State that flows through a graph, merged one partial update at a time.
///
/// The serde bounds make states checkpointable by durable
/// [`CheckpointSaver`](flowgraph_checkpoint::CheckpointSaver) backends.
///
/// # Example
///
/// ```rust
/// use flowgraph_core::GraphState;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct Draft {
///     title: String,
///     body: Option<String>,
/// }
///
/// #[derive(Default)]
/// struct DraftUpdate {
///     title: Option<String>,
///     body: Option<String>,
/// }
///
/// impl GraphState for Draft {
///     type Update = DraftUpdate;
///
///     fn apply(&mut self, update: DraftUpdate) {
///         if let Some(title) = update.title {
///             self.title = title;
///         }
///         if let Some(body) = update.body {
///             self.body = Some(body);
///         }
///     }
/// }
/// ```
pub trait GraphState:
    Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Partial update produced by a node handler.
    type Update: Send + 'static;

    /// Merge a partial update into this state (shallow, field-level overwrite).
    fn apply(&mut self, update: Self::Update);
}
