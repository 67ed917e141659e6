use std::fmt;
use std::sync::Arc;

use super::encoder::{encode, EncoderConfig, Vocabulary};
use super::model::SentimentModel;
use crate::error::Result;
use crate::models::LstmSentimentModel;
use crate::pipelines::stats::PipelineStats;

// ============ Output types ============

/// Probabilities at or above this value are classified as positive.
pub const POSITIVE_THRESHOLD: f32 = 0.5;

/// Sentiment of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Favourable review.
    Positive,
    /// Unfavourable review.
    Negative,
}

impl Label {
    /// Threshold a model probability. `0.5` itself is positive; NaN is negative.
    pub fn from_probability(probability: f32) -> Self {
        if probability >= POSITIVE_THRESHOLD {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Display name, `"Positive"` or `"Negative"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "Positive",
            Label::Negative => "Negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sentiment prediction with label and raw probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Thresholded sentiment.
    pub label: Label,
    /// Model output (0.0 to 1.0), not rounded.
    pub probability: f32,
}

impl Prediction {
    /// Label a raw model probability.
    pub fn from_probability(probability: f32) -> Self {
        Self {
            label: Label::from_probability(probability),
            probability,
        }
    }
}

/// Output from [`SentimentPipeline::run`].
#[derive(Debug, Clone)]
pub struct Output {
    /// Sentiment prediction.
    pub prediction: Prediction,
    /// Execution statistics.
    pub stats: PipelineStats,
}

// ============ Pipeline ============

/// Classifies movie reviews as positive or negative.
///
/// Construct with [`SentimentPipelineBuilder`](super::SentimentPipelineBuilder), or with
/// [`SentimentPipeline::new`] when the model is already in memory.
///
/// # Examples
///
/// ```rust,no_run
/// # use imdb_sentiment::sentiment::SentimentPipelineBuilder;
/// # fn main() -> imdb_sentiment::error::Result<()> {
/// let pipeline = SentimentPipelineBuilder::local("artifacts").build()?;
///
/// let output = pipeline.run("What a beautiful movie.")?;
/// println!("{}: {:.4}", output.prediction.label, output.prediction.probability);
/// # Ok(())
/// # }
/// ```
pub struct SentimentPipeline<M: SentimentModel = LstmSentimentModel> {
    pub(crate) model: Arc<M>,
    pub(crate) vocabulary: Arc<Vocabulary>,
    pub(crate) config: EncoderConfig,
}

impl<M: SentimentModel> SentimentPipeline<M> {
    /// Assemble a pipeline from a loaded model and vocabulary, using the IMDB constants.
    pub fn new(model: M, vocabulary: Vocabulary) -> Self {
        Self::from_shared(Arc::new(model), Arc::new(vocabulary))
    }

    pub(crate) fn from_shared(model: Arc<M>, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            model,
            vocabulary,
            config: EncoderConfig::IMDB,
        }
    }

    /// Classify one review.
    ///
    /// Any text is accepted; an empty review encodes to the start sentinel plus padding.
    pub fn run(&self, text: &str) -> Result<Output> {
        let stats_builder = PipelineStats::start();

        let input_ids = self.encode(text);
        let probability = self.model.probability(&input_ids)?;
        let prediction = Prediction::from_probability(probability);
        let stats = stats_builder.finish(1);

        tracing::debug!(
            label = %prediction.label,
            probability,
            elapsed_ms = stats.total_time.as_secs_f64() * 1000.0,
            "classified review"
        );

        Ok(Output { prediction, stats })
    }

    /// Encode a review exactly as [`run`](Self::run) feeds it to the model.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        encode(text, &self.vocabulary, &self.config)
    }

    /// The model behind this pipeline.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The vocabulary used for encoding.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}

impl<M: SentimentModel> Clone for SentimentPipeline<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            vocabulary: Arc::clone(&self.vocabulary),
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(Label::from_probability(0.5), Label::Positive);
        assert_eq!(Label::from_probability(0.4999), Label::Negative);
        assert_eq!(Label::from_probability(1.0), Label::Positive);
        assert_eq!(Label::from_probability(0.0), Label::Negative);
    }

    #[test]
    fn nan_is_negative() {
        assert_eq!(Label::from_probability(f32::NAN), Label::Negative);
    }

    #[test]
    fn prediction_keeps_raw_probability() {
        let prediction = Prediction::from_probability(0.873_21);
        assert_eq!(prediction.label, Label::Positive);
        assert_eq!(prediction.probability, 0.873_21);
        assert_eq!(prediction.label.to_string(), "Positive");
    }
}
