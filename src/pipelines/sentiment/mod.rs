//! Movie review sentiment analysis.
//!
//! Classify a review as `Positive` or `Negative` with the IMDB LSTM.
//! Returns both the label and the raw model probability.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use imdb_sentiment::sentiment::SentimentPipelineBuilder;
//!
//! # fn main() -> imdb_sentiment::error::Result<()> {
//! let pipeline = SentimentPipelineBuilder::local("artifacts").build()?;
//!
//! let output = pipeline.run("I really loved this movie!")?;
//! println!(
//!     "sentiment: {} (confidence: {:.4})",
//!     output.prediction.label, output.prediction.probability
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Encoding
//!
//! Reviews are lower-cased, split on whitespace and looked up in the IMDB word
//! index. See [`encode`] and [`EncoderConfig::IMDB`] for the exact rules.

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod encoder;
pub(crate) mod model;
pub(crate) mod pipeline;

// ============ Public API ============

pub use crate::loaders::ArtifactSource;
pub use crate::models::{LstmConfig, LstmSentimentModel};
pub use crate::pipelines::stats::PipelineStats;
pub use crate::pipelines::utils::DeviceRequest;
pub use builder::SentimentPipelineBuilder;
pub use encoder::{encode, is_separator, EncoderConfig, Vocabulary};
pub use model::SentimentModel;
pub use pipeline::{Label, Output, Prediction, SentimentPipeline, POSITIVE_THRESHOLD};
