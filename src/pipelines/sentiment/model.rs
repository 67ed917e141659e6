use crate::error::Result;

/// A frozen binary sentiment model.
///
/// Implementations take an already encoded review and return the probability
/// that it is positive.
pub trait SentimentModel {
    /// Forward pass over one encoded sequence. Returns a probability in `[0, 1]`.
    fn probability(&self, input_ids: &[u32]) -> Result<f32>;

    /// Device the weights live on.
    fn device(&self) -> &candle_core::Device;
}
