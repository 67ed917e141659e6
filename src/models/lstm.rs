use candle_core::{Device, Module, Tensor, D};
use candle_nn::{embedding, linear, lstm, Embedding, LSTMConfig, Linear, VarBuilder, LSTM, RNN};
use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::loaders::{self, ArtifactFiles, ArtifactSource};
use crate::pipelines::sentiment::model::SentimentModel;
use crate::pipelines::sentiment::EncoderConfig;

/// Network dimensions and training-time encoder constants, read from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LstmConfig {
    /// Rows in the embedding table.
    pub vocab_size: usize,
    /// Sequence length the network was trained on.
    pub max_len: usize,
    /// Rank offset the training data was encoded with.
    pub index_offset: u32,
    /// Width of each word embedding.
    pub embedding_dim: usize,
    /// LSTM hidden state width.
    pub hidden_dim: usize,
    /// Stacked LSTM layers.
    #[serde(default = "default_num_layers")]
    pub num_layers: usize,
}

fn default_num_layers() -> usize {
    1
}

impl LstmConfig {
    /// Fail unless the network was trained with the same constants the encoder uses.
    pub fn check_consistency(&self, encoder: &EncoderConfig) -> Result<()> {
        let mut mismatches = Vec::new();

        if self.vocab_size != encoder.vocab_size as usize {
            mismatches.push(format!(
                "vocab_size {} (encoder ceiling {})",
                self.vocab_size, encoder.vocab_size
            ));
        }
        if self.max_len != encoder.max_len {
            mismatches.push(format!(
                "max_len {} (encoder {})",
                self.max_len, encoder.max_len
            ));
        }
        if self.index_offset != encoder.index_offset {
            mismatches.push(format!(
                "index_offset {} (encoder {})",
                self.index_offset, encoder.index_offset
            ));
        }
        if self.num_layers == 0 {
            mismatches.push("num_layers 0".to_string());
        }

        if mismatches.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::ArtifactMismatch(format!(
                "Model config disagrees with the encoder: {}",
                mismatches.join(", ")
            )))
        }
    }
}

/// Embedding → stacked LSTM → dense sigmoid head.
///
/// Weight names follow the PyTorch layout: `embedding.weight`,
/// `lstm.weight_ih_l{n}`, `lstm.weight_hh_l{n}`, `lstm.bias_ih_l{n}`,
/// `lstm.bias_hh_l{n}`, `classifier.weight`, `classifier.bias`.
#[derive(Debug, Clone)]
pub struct LstmSentimentModel {
    embedding: Embedding,
    layers: Vec<LSTM>,
    classifier: Linear,
    config: LstmConfig,
    device: Device,
}

impl LstmSentimentModel {
    /// Build the network from a var builder. Shapes are checked against `config`.
    pub fn load(config: LstmConfig, vb: VarBuilder, device: Device) -> Result<Self> {
        config.check_consistency(&EncoderConfig::IMDB)?;

        let embedding = embedding(config.vocab_size, config.embedding_dim, vb.pp("embedding"))
            .map_err(weight_error)?;

        let layers = (0..config.num_layers)
            .map(|layer_idx| {
                let in_dim = if layer_idx == 0 {
                    config.embedding_dim
                } else {
                    config.hidden_dim
                };
                let lstm_config = LSTMConfig {
                    layer_idx,
                    ..Default::default()
                };
                lstm(in_dim, config.hidden_dim, lstm_config, vb.pp("lstm")).map_err(weight_error)
            })
            .collect::<Result<Vec<_>>>()?;

        let classifier = linear(config.hidden_dim, 1, vb.pp("classifier")).map_err(weight_error)?;

        Ok(Self {
            embedding,
            layers,
            classifier,
            config,
            device,
        })
    }

    /// Load config, weights and check consistency from resolved artifacts.
    pub fn from_source(source: &ArtifactSource, device: Device) -> Result<Self> {
        Self::from_files(&source.resolve()?, device)
    }

    pub(crate) fn from_files(files: &ArtifactFiles, device: Device) -> Result<Self> {
        let config = loaders::load_model_config(&files.config)?;
        let vb = loaders::load_weights(&files.weights, &device)?;
        let model = Self::load(config, vb, device)?;

        tracing::info!(
            weights = %files.weights.display(),
            embedding_dim = model.config.embedding_dim,
            hidden_dim = model.config.hidden_dim,
            num_layers = model.config.num_layers,
            "loaded LSTM sentiment model"
        );

        Ok(model)
    }

    /// The configuration the weights were loaded with.
    pub fn config(&self) -> &LstmConfig {
        &self.config
    }

    /// Positive-class probability for a `(batch, seq_len)` tensor of indices.
    fn forward(&self, input_ids: &Tensor) -> Result<Tensor> {
        let mut hidden = self.embedding.forward(input_ids)?;

        for layer in &self.layers {
            let states = layer.seq(&hidden)?;
            hidden = layer.states_to_tensor(&states)?;
        }

        // (batch, seq_len, hidden) -> last time step
        let seq_len = hidden.dim(1)?;
        let last = hidden.narrow(1, seq_len - 1, 1)?.squeeze(1)?;
        let logits = self.classifier.forward(&last)?;

        Ok(candle_nn::ops::sigmoid(&logits)?.squeeze(D::Minus1)?)
    }
}

impl SentimentModel for LstmSentimentModel {
    fn probability(&self, input_ids: &[u32]) -> Result<f32> {
        if input_ids.is_empty() {
            return Err(PipelineError::Unexpected(
                "Cannot run the model on an empty sequence".into(),
            ));
        }

        let input = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        let probabilities = self.forward(&input)?.to_vec1::<f32>()?;

        probabilities
            .first()
            .copied()
            .ok_or_else(|| PipelineError::Unexpected("Model returned no output".into()))
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

fn weight_error(e: candle_core::Error) -> PipelineError {
    PipelineError::Artifact(format!("Model weights do not match config.json: {e}"))
}
