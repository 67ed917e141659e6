//! Artifact loading for the sentiment model.
//!
//! A deployment ships three files side by side:
//! - `config.json` - network dimensions and the encoder constants it was trained with
//! - `model.safetensors` - frozen weights (`model.pth` is accepted as a fallback)
//! - `word_index.json` - Keras-style `{"word": rank}` vocabulary
//!
//! They are read from a local directory or downloaded from a Hugging Face Hub
//! model repository.

use std::fmt;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::{api::sync::Api, Repo, RepoType};

use crate::error::{PipelineError, Result};
use crate::models::LstmConfig;
use crate::pipelines::cache::CacheKey;
use crate::pipelines::sentiment::Vocabulary;

pub(crate) const CONFIG_FILE: &str = "config.json";
pub(crate) const WEIGHTS_FILE: &str = "model.safetensors";
pub(crate) const PTH_WEIGHTS_FILE: &str = "model.pth";
pub(crate) const WORD_INDEX_FILE: &str = "word_index.json";

/// Where the model artifacts come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// A local directory holding the three artifact files.
    Local(PathBuf),
    /// A Hugging Face Hub model repository, e.g. `"someone/imdb-lstm"`.
    Hub {
        /// Repository id.
        repo: String,
    },
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactSource::Local(dir) => write!(f, "local:{}", dir.display()),
            ArtifactSource::Hub { repo } => write!(f, "hub:{repo}"),
        }
    }
}

impl CacheKey for ArtifactSource {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

/// Resolved on-disk paths of one deployment's artifacts.
#[derive(Debug, Clone)]
pub(crate) struct ArtifactFiles {
    pub config: PathBuf,
    pub weights: PathBuf,
    pub word_index: PathBuf,
}

impl ArtifactSource {
    pub(crate) fn resolve(&self) -> Result<ArtifactFiles> {
        match self {
            ArtifactSource::Local(dir) => resolve_local(dir),
            ArtifactSource::Hub { repo } => resolve_hub(repo),
        }
    }
}

// Existence is checked when each file is loaded.
fn resolve_local(dir: &Path) -> Result<ArtifactFiles> {
    let weights = [WEIGHTS_FILE, PTH_WEIGHTS_FILE]
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .unwrap_or_else(|| dir.join(WEIGHTS_FILE));

    Ok(ArtifactFiles {
        config: dir.join(CONFIG_FILE),
        weights,
        word_index: dir.join(WORD_INDEX_FILE),
    })
}

fn resolve_hub(repo_id: &str) -> Result<ArtifactFiles> {
    tracing::info!(repo = repo_id, "downloading model artifacts");

    let api = Api::new()?;
    let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

    let config = repo.get(CONFIG_FILE)?;
    let weights = repo
        .get(WEIGHTS_FILE)
        .or_else(|_| repo.get(PTH_WEIGHTS_FILE))?;
    let word_index = repo.get(WORD_INDEX_FILE)?;

    Ok(ArtifactFiles {
        config,
        weights,
        word_index,
    })
}

fn read_artifact(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Artifact(format!("Failed to read '{}': {e}", path.display()))
    })
}

pub(crate) fn load_model_config(path: &Path) -> Result<LstmConfig> {
    let raw = read_artifact(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        PipelineError::Artifact(format!("Invalid model config '{}': {e}", path.display()))
    })
}

pub(crate) fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    let raw = read_artifact(path)?;
    let vocabulary = Vocabulary::from_json(&raw).map_err(|e| {
        PipelineError::Artifact(format!("Failed to load '{}': {e}", path.display()))
    })?;

    tracing::info!(
        path = %path.display(),
        words = vocabulary.len(),
        "loaded word index"
    );

    Ok(vocabulary)
}

pub(crate) fn load_weights(path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    if !path.is_file() {
        return Err(PipelineError::Artifact(format!(
            "No model weights at '{}': expected {WEIGHTS_FILE} or {PTH_WEIGHTS_FILE}",
            path.display()
        )));
    }

    let vb = if path.extension().is_some_and(|e| e == "safetensors") {
        // SAFETY: the weights file is treated as immutable for the life of the process.
        unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device) }
    } else {
        VarBuilder::from_pth(path, DType::F32, device)
    };

    vb.map_err(|e| {
        PipelineError::Artifact(format!("Failed to load weights '{}': {e}", path.display()))
    })
}
