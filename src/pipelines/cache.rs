use crate::error::Result;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

pub trait CacheKey {
    fn cache_key(&self) -> String;
}

// Entries are strong references and are never evicted: loaded artifacts stay
// resident for the life of the process.
type CacheStorage = HashMap<(TypeId, String), Arc<dyn Any + Send + Sync>>;

pub struct ModelCache {
    cache: Mutex<CacheStorage>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, running `loader` on first access.
    ///
    /// The lock is held while loading so concurrent callers never load the same
    /// artifact twice. A failed load caches nothing.
    pub fn get_or_create<M, F>(&self, key: &str, loader: F) -> Result<Arc<M>>
    where
        M: Send + Sync + 'static,
        F: FnOnce() -> Result<M>,
    {
        let cache_key = (TypeId::of::<M>(), key.to_string());

        // A loader that panicked never inserted, so a poisoned map is still sound.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = cache.get(&cache_key) {
            if let Ok(value) = Arc::clone(entry).downcast::<M>() {
                return Ok(value);
            }
        }

        tracing::info!(key, "loading artifact into process cache");
        let value = Arc::new(loader()?);
        let entry: Arc<dyn Any + Send + Sync> = value.clone();
        cache.insert(cache_key, entry);

        Ok(value)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_MODEL_CACHE: once_cell::sync::Lazy<ModelCache> =
    once_cell::sync::Lazy::new(ModelCache::new);

pub fn global_cache() -> &'static ModelCache {
    &GLOBAL_MODEL_CACHE
}
