use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use super::pipeline::SentimentPipeline;
use crate::error::Result;
use crate::loaders::{self, ArtifactSource};
use crate::models::LstmSentimentModel;
use crate::pipelines::cache::global_cache;
use crate::pipelines::sentiment::Vocabulary;
use crate::pipelines::utils::{build_cache_key, DeviceRequest};

/// Builder for creating [`SentimentPipeline`] instances.
///
/// Use [`Self::local`] or [`Self::hub`] as the entry point. Artifacts are loaded
/// once per process: building a second pipeline for the same source and device
/// reuses the resident model and vocabulary.
///
/// # Examples
///
/// ```rust,no_run
/// # use imdb_sentiment::sentiment::SentimentPipelineBuilder;
/// # fn main() -> imdb_sentiment::error::Result<()> {
/// let pipeline = SentimentPipelineBuilder::local("artifacts")
///     .cpu()
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SentimentPipelineBuilder {
    pub(crate) source: ArtifactSource,
    pub(crate) device_request: DeviceRequest,
}

impl SentimentPipelineBuilder {
    /// Load artifacts from any [`ArtifactSource`].
    pub fn new(source: ArtifactSource) -> Self {
        Self {
            source,
            device_request: DeviceRequest::Cpu,
        }
    }

    /// Load artifacts from a local directory.
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self::new(ArtifactSource::Local(dir.into()))
    }

    /// Download artifacts from a Hugging Face Hub model repository.
    pub fn hub(repo: impl Into<String>) -> Self {
        Self::new(ArtifactSource::Hub { repo: repo.into() })
    }

    /// Use CPU for inference (default).
    pub fn cpu(mut self) -> Self {
        self.device_request = DeviceRequest::Cpu;
        self
    }

    /// Use a specific CUDA GPU for inference.
    pub fn cuda(mut self, index: usize) -> Self {
        self.device_request = DeviceRequest::Cuda(index);
        self
    }

    /// Use the given device request.
    pub fn device(mut self, request: DeviceRequest) -> Self {
        self.device_request = request;
        self
    }

    /// Builds the pipeline with configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if an artifact is missing or corrupt, if the model config
    /// disagrees with the encoder constants, or if device initialization fails.
    pub fn build(self) -> Result<SentimentPipeline> {
        let device = self.device_request.resolve()?;
        let key = build_cache_key(&self.source, &device);

        // Resolved on the first cache miss only, then shared by both loaders.
        let files = OnceCell::new();

        let model = global_cache().get_or_create(&key, || {
            let files = files.get_or_try_init(|| self.source.resolve())?;
            LstmSentimentModel::from_files(files, device.clone())
        })?;

        let vocabulary = global_cache().get_or_create::<Vocabulary, _>(&key, || {
            let files = files.get_or_try_init(|| self.source.resolve())?;
            loaders::load_vocabulary(&files.word_index)
        })?;

        Ok(SentimentPipeline::from_shared(model, vocabulary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn defaults_to_cpu() {
        let builder = SentimentPipelineBuilder::local("artifacts");
        assert_eq!(builder.device_request, DeviceRequest::Cpu);
        assert_eq!(builder.cuda(1).device_request, DeviceRequest::Cuda(1));
    }

    #[test]
    fn hub_source() {
        let builder = SentimentPipelineBuilder::hub("someone/imdb-lstm");
        assert_eq!(
            builder.source,
            ArtifactSource::Hub {
                repo: "someone/imdb-lstm".into()
            }
        );
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = SentimentPipelineBuilder::local(dir.path().join("absent")).build();
        assert!(matches!(result, Err(PipelineError::Artifact(_))));
    }
}
