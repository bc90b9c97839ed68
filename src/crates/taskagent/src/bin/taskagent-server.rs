//! Task agent server binary
//!
//! Serves the task workflow over HTTP: start a run, receive the approval
//! request, deliver the decision.

use std::sync::Arc;
use taskagent::api::create_router;
use taskagent::{AgentConfig, ModelConfig, OpenAiCompatModel, TaskRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    let config = AgentConfig::from_env()?;
    let model_config = ModelConfig::from_env()?;
    tracing::info!(model = %model_config.model, "model configured");

    let model = Arc::new(OpenAiCompatModel::new(model_config));
    let runner = Arc::new(TaskRunner::new(model)?);

    let app = create_router(runner, &config);
    let addr = config.addr()?;

    tracing::info!("Starting task agent server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Task agent server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL-C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
