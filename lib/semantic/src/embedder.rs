//! Text embedding
//!
//! Converts descriptive text into fixed-dimension vectors for cosine search.
//! The shipped [`HashEmbedder`] hashes trigrams and words into vector
//! positions, which keeps embedding deterministic and dependency-free while
//! leaving the trait seam open for ML-backed implementations.

use schemax_core::{Error, Result, Vector};
use std::collections::HashSet;

/// Default embedding dimension, matching the sentence-transformer models the
/// index was originally tuned against.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Maps text to a fixed-dimension vector.
///
/// Implementations must be deterministic for identical (model id, text)
/// pairs, and must reject empty input with [`Error::EmptyEmbeddingInput`]
/// rather than returning a zero vector. An implementation that delegates to
/// an external process must await it with a bounded timeout and map timeout
/// to [`Error::Embedding`] - partial results are never acceptable.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vector>;

    /// Output dimensionality, fixed per model configuration
    fn dimension(&self) -> usize;

    /// Identifier of the underlying model, used as a cache key component
    fn model_id(&self) -> &str;
}

/// Deterministic trigram + word hashing embedder
///
/// Trigrams capture fuzzy overlap between related names ("cust", "customer");
/// whole words are hashed with double weight so exact token matches dominate.
/// The result is normalized to unit length.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        if text.trim().is_empty() {
            return Err(Error::EmptyEmbeddingInput);
        }

        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut components = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        // Hash trigrams to vector positions
        for trigram in generate_trigrams(&normalized) {
            let mut hasher = DefaultHasher::new();
            trigram.hash(&mut hasher);
            let pos = (hasher.finish() as usize) % self.dim;
            components[pos] += 1.0;
        }

        // Word-level hashing; words contribute more
        for word in normalized.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let pos = (hasher.finish() as usize) % self.dim;
            components[pos] += 2.0;
        }

        let mut vector = Vector::new(components);
        vector.normalize();
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model_id(&self) -> &str {
        "hash-trigram-v1"
    }
}

/// Generate character trigrams from a string
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    if chars.len() < 3 {
        return HashSet::new();
    }

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}
