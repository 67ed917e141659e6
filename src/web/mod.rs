//! Single-page web UI.
//!
//! `GET /` shows the review form and the example predictions, `POST /classify`
//! classifies the submitted review and re-renders the page with the result.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::sentiment::{LstmSentimentModel, Prediction, SentimentModel, SentimentPipeline};

pub mod handlers;
pub mod templates;

/// Example reviews shown under the form.
pub const SAMPLE_REVIEWS: [&str; 5] = [
    "This movie was amazing! The storyline was strong and the acting was great.",
    "Absolutely terrible. Waste of time, the plot was horrible.",
    "Not bad, but not great. It was okay overall.",
    "What a beautiful movie. The visuals and music were stunning.",
    "I hated this film. It was boring and predictable.",
];

/// An example review with its precomputed prediction.
#[derive(Debug, Clone)]
pub struct SampleReview {
    /// 1-based position on the page.
    pub number: usize,
    /// Review text.
    pub text: &'static str,
    /// Prediction computed at startup.
    pub prediction: Prediction,
}

/// Shared, read-only state for all handlers.
pub struct AppState<M: SentimentModel = LstmSentimentModel> {
    /// The loaded pipeline.
    pub pipeline: SentimentPipeline<M>,
    /// Example reviews, classified once at startup.
    pub samples: Vec<SampleReview>,
}

impl<M: SentimentModel> AppState<M> {
    /// Classify the example reviews and wrap the pipeline for serving.
    pub fn new(pipeline: SentimentPipeline<M>) -> Result<Self> {
        let samples = SAMPLE_REVIEWS
            .iter()
            .enumerate()
            .map(|(i, &text)| {
                let output = pipeline.run(text)?;
                Ok(SampleReview {
                    number: i + 1,
                    text,
                    prediction: output.prediction,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(samples = samples.len(), "precomputed example predictions");

        Ok(Self { pipeline, samples })
    }
}

/// Create the web UI router.
pub fn router<M>(state: Arc<AppState<M>>) -> Router
where
    M: SentimentModel + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::index::<M>))
        .route("/classify", post(handlers::classify::<M>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
