use super::cache::CacheKey;
use crate::error::{PipelineError, Result};
use candle_core::Device;

/// Where the model should run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceRequest {
    /// Run on CPU (default).
    #[default]
    Cpu,
    /// Run on the CUDA GPU with this index. Needs the `cuda` feature.
    Cuda(usize),
}

impl DeviceRequest {
    /// Resolve the request into an actual [`Device`].
    pub fn resolve(self) -> Result<Device> {
        match self {
            DeviceRequest::Cpu => Ok(Device::Cpu),
            DeviceRequest::Cuda(i) => Device::new_cuda(i).map_err(|e| {
                PipelineError::Device(format!(
                    "Failed to init CUDA device {i}: {e}. Try CPU as fallback."
                ))
            }),
        }
    }
}

/// Cache key combining the artifact source and the device location.
pub fn build_cache_key<K: CacheKey>(source: &K, device: &Device) -> String {
    format!("{}-{:?}", source.cache_key(), device.location())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Key(&'static str);

    impl CacheKey for Key {
        fn cache_key(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn cpu_resolves() {
        let device = DeviceRequest::default().resolve().unwrap();
        assert!(device.is_cpu());
    }

    #[test]
    fn key_includes_device() {
        let key = build_cache_key(&Key("artifacts"), &Device::Cpu);
        assert!(key.starts_with("artifacts-"));
        assert!(key.contains("Cpu"));
    }
}
