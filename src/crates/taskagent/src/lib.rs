//! Task-manager agent over the flowgraph engine
//!
//! A five-stage workflow that turns a free-form goal into an executed plan:
//! validate the goal, draft steps with a generative model, pause for human
//! approval, execute the approved steps, and finalize. The approval pause is a
//! real suspension - the run is checkpointed and resumed later with the user's
//! decision, possibly from a different request.
//!
//! Library users start at [`workflow::TaskRunner`]; the HTTP surface in
//! [`api`] and the `taskagent-server` binary wrap it.

pub mod api;
pub mod config;
pub mod llm;
pub mod nodes;
pub mod state;
pub mod workflow;

pub use config::{AgentConfig, ConfigError};
pub use llm::{LlmError, ModelConfig, OpenAiCompatModel, ScriptedModel, TaskModel};
pub use state::{RunStatus, StepResult, TaskState, TaskUpdate};
pub use workflow::{build_graph, AgentOutcome, TaskRunner};
