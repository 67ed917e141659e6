//! Deployment configuration.
//!
//! Only deployment concerns are configurable: where to listen, where the
//! artifacts live, and which device runs the model. The encoder constants are
//! fixed by the trained model and never read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SENTIMENT_BIND_ADDR` | `127.0.0.1:8501` | Web server listen address |
//! | `SENTIMENT_MODEL_REPO` | unset | Hugging Face Hub repo; overrides the directory |
//! | `SENTIMENT_MODEL_DIR` | `artifacts` | Local artifact directory |
//! | `SENTIMENT_CUDA_DEVICE` | unset | GPU index; CPU when unset |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{PipelineError, Result};
use crate::sentiment::{ArtifactSource, DeviceRequest, SentimentPipelineBuilder};

/// Listen address environment variable.
pub const ENV_BIND_ADDR: &str = "SENTIMENT_BIND_ADDR";
/// Hub repository environment variable.
pub const ENV_MODEL_REPO: &str = "SENTIMENT_MODEL_REPO";
/// Local artifact directory environment variable.
pub const ENV_MODEL_DIR: &str = "SENTIMENT_MODEL_DIR";
/// CUDA device index environment variable.
pub const ENV_CUDA_DEVICE: &str = "SENTIMENT_CUDA_DEVICE";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";
const DEFAULT_MODEL_DIR: &str = "artifacts";

/// Settings for the web application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the web server binds to.
    pub bind_addr: SocketAddr,
    /// Where the model artifacts are loaded from.
    pub artifacts: ArtifactSource,
    /// Device for inference.
    pub device: DeviceRequest,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            artifacts: ArtifactSource::Local(PathBuf::from(DEFAULT_MODEL_DIR)),
            device: DeviceRequest::Cpu,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = value(ENV_BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| PipelineError::Config(format!("Invalid {ENV_BIND_ADDR}: {e}")))?;

        let artifacts = match value(ENV_MODEL_REPO) {
            Some(repo) => ArtifactSource::Hub {
                repo: repo.trim().to_string(),
            },
            None => ArtifactSource::Local(PathBuf::from(
                value(ENV_MODEL_DIR).unwrap_or_else(|| DEFAULT_MODEL_DIR.to_string()),
            )),
        };

        let device = match value(ENV_CUDA_DEVICE) {
            Some(index) => DeviceRequest::Cuda(index.trim().parse::<usize>().map_err(|e| {
                PipelineError::Config(format!("Invalid {ENV_CUDA_DEVICE} '{index}': {e}"))
            })?),
            None => DeviceRequest::Cpu,
        };

        Ok(Self {
            bind_addr,
            artifacts,
            device,
        })
    }

    /// A pipeline builder for the configured artifacts and device.
    pub fn pipeline_builder(&self) -> SentimentPipelineBuilder {
        SentimentPipelineBuilder::new(self.artifacts.clone()).device(self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr.port(), 8501);
    }

    #[test]
    fn local_directory_and_bind_addr() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_BIND_ADDR, "0.0.0.0:8080"),
            (ENV_MODEL_DIR, "/srv/imdb"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(
            config.artifacts,
            ArtifactSource::Local(PathBuf::from("/srv/imdb"))
        );
    }

    #[test]
    fn repo_overrides_directory() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_MODEL_DIR, "/srv/imdb"),
            (ENV_MODEL_REPO, "someone/imdb-lstm"),
        ]))
        .unwrap();

        assert_eq!(
            config.artifacts,
            ArtifactSource::Hub {
                repo: "someone/imdb-lstm".into()
            }
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_MODEL_REPO, "  "),
            (ENV_CUDA_DEVICE, ""),
        ]))
        .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn cuda_device() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_CUDA_DEVICE, "1")])).unwrap();
        assert_eq!(config.device, DeviceRequest::Cuda(1));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_BIND_ADDR, "nowhere")])).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));

        let err = AppConfig::from_lookup(lookup(&[(ENV_CUDA_DEVICE, "gpu0")])).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
