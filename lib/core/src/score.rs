//! Search hits and confidence normalization
//!
//! Raw cosine similarity clusters most real matches in the 0.3-0.8 band, so a
//! plain linear 0-100 scale makes everything look mediocre. Confidence uses a
//! piecewise stretch that widens the high-similarity bands instead.

use crate::element::ElementId;
use serde::{Deserialize, Serialize};

/// Linear slope below the 0.6 similarity breakpoint. Chosen so the low band
/// meets the middle band exactly at confidence 70.
const LOW_BAND_SLOPE: f32 = 70.0 / 0.6;

/// Map a raw similarity score in [0, 1] to a confidence percentage in [0, 100]
///
/// Piecewise:
/// - `sim >= 0.8` -> `90 + (sim - 0.8) * 50`, capped at 100
/// - `0.6 <= sim < 0.8` -> `70 + (sim - 0.6) * 100`
/// - `sim < 0.6` -> `sim * (70 / 0.6)`
///
/// The mapping is monotonic and continuous at both breakpoints. Input outside
/// [0, 1] is clamped first.
#[must_use]
pub fn confidence_from_similarity(similarity: f32) -> f32 {
    let s = similarity.clamp(0.0, 1.0);
    if s >= 0.8 {
        (90.0 + (s - 0.8) * 50.0).min(100.0)
    } else if s >= 0.6 {
        70.0 + (s - 0.6) * 100.0
    } else {
        s * LOW_BAND_SLOPE
    }
}

/// A single ranked result from a vector search
///
/// Transient: produced per query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ElementId,
    /// Raw cosine distance (1 - cosine similarity), before clamping
    pub distance: f32,
    /// Cosine similarity clamped to [0, 1]
    pub similarity: f32,
    /// Normalized confidence in [0, 100]
    pub confidence: f32,
    /// 1-based position in the result list
    pub rank: usize,
}

impl SearchHit {
    /// Build a hit from a raw cosine similarity. Rank is assigned later,
    /// once the full result list is sorted.
    #[must_use]
    pub fn from_similarity(id: ElementId, raw_similarity: f32) -> Self {
        let similarity = raw_similarity.clamp(0.0, 1.0);
        Self {
            id,
            distance: 1.0 - raw_similarity,
            similarity,
            confidence: confidence_from_similarity(similarity),
            rank: 0,
        }
    }
}
