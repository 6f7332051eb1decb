//! Embedding cache
//!
//! An explicit memoization component keyed by (model id, text). Entries are
//! only ever a function of their key, so the cache is safe to share
//! read-mostly across concurrent searches.

use ahash::AHashMap;
use parking_lot::RwLock;
use schemax_core::Vector;

fn cache_key(model_id: &str, text: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    model_id.hash(&mut hasher);
    text.hash(&mut hasher);
    hasher.finish()
}

/// Hash the source text of an element, for change detection on upserts
#[must_use]
pub fn text_hash(text: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// In-memory cache of computed embeddings
#[derive(Default)]
pub struct EmbeddingCache {
    entries: RwLock<AHashMap<u64, Vector>>,
}

impl EmbeddingCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, model_id: &str, text: &str) -> Option<Vector> {
        self.entries.read().get(&cache_key(model_id, text)).cloned()
    }

    pub fn insert(&self, model_id: &str, text: &str, vector: Vector) {
        self.entries.write().insert(cache_key(model_id, text), vector);
    }

    /// Remove a single entry; returns whether it was present
    pub fn evict(&self, model_id: &str, text: &str) -> bool {
        self.entries
            .write()
            .remove(&cache_key(model_id, text))
            .is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
