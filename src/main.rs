//! IMDB sentiment web app entry point.

use std::sync::Arc;

use imdb_sentiment::config::AppConfig;
use imdb_sentiment::error::{self, PipelineError};
use imdb_sentiment::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("imdb_sentiment=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!(artifacts = %config.artifacts, device = ?config.device, "loading sentiment model");

    let builder = config.pipeline_builder();
    let state = tokio::task::spawn_blocking(move || -> error::Result<AppState> {
        let pipeline = builder.build()?;
        AppState::new(pipeline)
    })
    .await
    .map_err(|e| PipelineError::Unexpected(format!("Model loading task failed: {e}")))??;

    let app = web::router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!("Serving IMDB sentiment classifier on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
