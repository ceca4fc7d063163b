use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;

/// Memoization for tag suggestions, keyed by the request text.
///
/// Uses ArcSwap for lock-free reads with infrequent writes: the same
/// title/description pair is re-queried every time the user reopens the
/// tag picker, and the suggestion for unchanged text does not change.
#[derive(Clone)]
pub struct SuggestionCache {
    cache: Arc<ArcSwap<HashMap<String, Vec<String>>>>,
}

impl SuggestionCache {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(ArcSwap::from_pointee(HashMap::new())),
        }
    }

    /// Lock-free read
    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        let cache = self.cache.load();
        let hit = cache.get(key).cloned();
        if hit.is_some() {
            tracing::debug!(key_len = key.len(), "Suggestion cache hit");
        }
        hit
    }

    /// Insert atomically
    pub fn insert(&self, key: String, tags: Vec<String>) {
        self.cache.rcu(|current| {
            let mut new_cache = (**current).clone();
            new_cache.insert(key.clone(), tags.clone());
            new_cache
        });
    }

    /// Get cache size
    pub fn len(&self) -> usize {
        self.cache.load().len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.load().is_empty()
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.cache.store(Arc::new(HashMap::new()));
    }
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new()
    }
}
