//! Generative collaborator for the plan and execute stages
//!
//! The engine never talks to a model; it only sees the [`TaskModel`] trait. The
//! shipped implementation, [`OpenAiCompatModel`], speaks the OpenAI-compatible
//! chat-completions protocol, which covers every provider the workflow targets -
//! point `LLM_API_BASE` at the provider of choice. Structured output is enforced by
//! prompting for JSON only and parsing the reply into a typed shape; a malformed
//! reply is an error, not something to retry (repair policies live in the nodes).
//!
//! [`ScriptedModel`] returns canned output for tests and offline runs.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from the generative collaborator.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Transport-level failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Reply did not contain the requested JSON shape
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// Required configuration is missing
    #[error("missing configuration: {0}")]
    MissingConfig(String),
}

/// What the workflow needs from a generative model.
#[async_trait]
pub trait TaskModel: Send + Sync {
    /// Draft an ordered list of short, actionable steps toward the goal.
    async fn plan_steps(&self, goal: &str) -> Result<Vec<String>, LlmError>;

    /// Write one short execution note per step.
    ///
    /// Implementations are not trusted to return exactly one note per step;
    /// the execute node clamps the pairing.
    async fn execution_notes(&self, steps: &[String]) -> Result<Vec<String>, LlmError>;
}

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl ModelConfig {
    /// Read `LLM_API_KEY`, `LLM_API_BASE`, and `LLM_MODEL` from the environment.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| LlmError::MissingConfig("LLM_API_KEY".to_string()))?;
        let api_base = std::env::var("LLM_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        Ok(Self {
            api_base,
            api_key,
            model,
            timeout: Duration::from_secs(30),
        })
    }
}

/// Chat-completions client for any OpenAI-compatible provider.
#[derive(Clone)]
pub struct OpenAiCompatModel {
    config: ModelConfig,
    client: Client,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlanOutput {
    steps: Vec<String>,
}

#[derive(Deserialize)]
struct NotesOutput {
    notes: Vec<String>,
}

impl OpenAiCompatModel {
    /// Create a client with the given configuration.
    pub fn new(config: ModelConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    async fn chat(&self, system: String, user: String) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.2,
        };

        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::MalformedOutput("empty completion".to_string()))
    }
}

/// Strip a ```json fenced block if the model wrapped its reply in one.
fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_json<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_fences(content))
        .map_err(|err| LlmError::MalformedOutput(format!("{err}: {content}")))
}

#[async_trait]
impl TaskModel for OpenAiCompatModel {
    async fn plan_steps(&self, goal: &str) -> Result<Vec<String>, LlmError> {
        let system = [
            "You are an expert task planner.",
            "You take a task description and break it down into a list of steps to accomplish the task.",
            "Each step should be concise and actionable.",
            r#"Respond only with JSON in the shape: {"steps": string[]}."#,
        ]
        .join("\n");
        let user = format!(
            "user goal: {goal}\n\
             draft a small plan with 3-5 steps to achieve the goal.\n\
             each step should be short, concise and actionable."
        );

        let content = self.chat(system, user).await?;
        let plan: PlanOutput = parse_json(&content)?;
        tracing::debug!(steps = plan.steps.len(), "planner returned steps");
        Ok(plan.steps)
    }

    async fn execution_notes(&self, steps: &[String]) -> Result<Vec<String>, LlmError> {
        let system = "Return only the valid JSON that matches the schema".to_string();
        let user = format!(
            "Given these steps, write one short note for each step.\n\
             Return only JSON in the shape: {{\"notes\": string[]}}.\n\
             Rules:\n\
             - notes.length must equal steps.length\n\
             - each note <= 300 characters\n\
             - plain text only (no markdown)\n\
             Steps: {}",
            serde_json::to_string(steps).unwrap_or_default()
        );

        let content = self.chat(system, user).await?;
        let output: NotesOutput = parse_json(&content)?;
        tracing::debug!(notes = output.notes.len(), "executor returned notes");
        Ok(output.notes)
    }
}

/// Deterministic model for tests and offline runs: hands back preset steps and
/// notes regardless of the prompt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedModel {
    steps: Vec<String>,
    notes: Vec<String>,
}

impl ScriptedModel {
    pub fn new(
        steps: impl IntoIterator<Item = impl Into<String>>,
        notes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
            notes: notes.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TaskModel for ScriptedModel {
    async fn plan_steps(&self, _goal: &str) -> Result<Vec<String>, LlmError> {
        Ok(self.steps.clone())
    }

    async fn execution_notes(&self, _steps: &[String]) -> Result<Vec<String>, LlmError> {
        Ok(self.notes.clone())
    }
}
