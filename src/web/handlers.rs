//! Request handlers for the classifier page.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use maud::Markup;
use serde::Deserialize;

use crate::sentiment::{is_separator, Prediction, SentimentModel};
use crate::web::templates;
use crate::web::AppState;

/// Form body of `POST /classify`.
#[derive(Debug, Deserialize)]
pub struct ClassifyForm {
    /// Review text as typed.
    #[serde(default)]
    pub review: String,
}

/// What happened to a submitted review.
#[derive(Debug, Clone)]
pub enum ClassifyOutcome {
    /// Blank input; nothing was classified.
    Empty,
    /// The model produced a prediction.
    Classified(Prediction),
    /// Inference failed.
    Failed(String),
}

/// Landing page: empty form plus example predictions.
pub async fn index<M>(State(state): State<Arc<AppState<M>>>) -> Markup
where
    M: SentimentModel + Send + Sync + 'static,
{
    templates::page(&state.samples, "", None)
}

/// Classify the submitted review and render the page with the result.
pub async fn classify<M>(
    State(state): State<Arc<AppState<M>>>,
    Form(form): Form<ClassifyForm>,
) -> (StatusCode, Markup)
where
    M: SentimentModel + Send + Sync + 'static,
{
    let outcome = classify_review(&state, &form.review).await;

    let status = match outcome {
        ClassifyOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    };

    (
        status,
        templates::page(&state.samples, &form.review, Some(&outcome)),
    )
}

async fn classify_review<M>(state: &AppState<M>, review: &str) -> ClassifyOutcome
where
    M: SentimentModel + Send + Sync + 'static,
{
    if review.trim_matches(is_separator).is_empty() {
        return ClassifyOutcome::Empty;
    }

    let pipeline = state.pipeline.clone();
    let text = review.to_string();

    match tokio::task::spawn_blocking(move || pipeline.run(&text)).await {
        Ok(Ok(output)) => ClassifyOutcome::Classified(output.prediction),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "review classification failed");
            ClassifyOutcome::Failed(e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "classification task panicked");
            ClassifyOutcome::Failed("Classification task failed".to_string())
        }
    }
}
