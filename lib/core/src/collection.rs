//! Generation-swapped vector collections
//!
//! Writers build a complete new generation off-lock, then publish it with an
//! atomic pointer swap. Readers clone the current generation's `Arc` under a
//! brief read lock, so a search never observes a half-written collection and
//! an aborted rebuild leaves the previous generation intact.

use crate::element::ElementId;
use crate::error::{Error, Result};
use crate::score::SearchHit;
use crate::vector::Vector;
use ahash::AHashMap;
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use std::sync::Arc;

/// A stored embedding: element identity, vector, and the hash of the source
/// text the vector was computed from. The hash lets incremental updates skip
/// re-embedding unchanged elements.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRecord {
    pub id: ElementId,
    pub vector: Vector,
    pub text_hash: u64,
}

impl EmbeddingRecord {
    #[inline]
    #[must_use]
    pub fn new(id: ElementId, vector: Vector, text_hash: u64) -> Self {
        Self {
            id,
            vector,
            text_hash,
        }
    }
}

/// One complete, immutable snapshot of the collection contents
struct Generation {
    records: Vec<EmbeddingRecord>,
    by_id: AHashMap<ElementId, usize>,
}

impl Generation {
    fn build(records: Vec<EmbeddingRecord>) -> Self {
        let mut deduped: Vec<EmbeddingRecord> = Vec::with_capacity(records.len());
        let mut by_id: AHashMap<ElementId, usize> = AHashMap::with_capacity(records.len());

        // Last write wins on duplicate identities (upsert semantics)
        for record in records {
            match by_id.get(&record.id) {
                Some(&slot) => deduped[slot] = record,
                None => {
                    by_id.insert(record.id.clone(), deduped.len());
                    deduped.push(record);
                }
            }
        }

        Self {
            records: deduped,
            by_id,
        }
    }
}

/// A collection of embedding records searchable by cosine similarity
///
/// A collection starts unindexed; searching before the first publish is a
/// [`Error::CollectionNotFound`], distinct from searching an indexed but
/// empty collection, which is a valid zero-hit outcome.
pub struct VectorCollection {
    name: String,
    vector_dim: usize,
    current: RwLock<Option<Arc<Generation>>>,
}

impl VectorCollection {
    #[must_use]
    pub fn new(name: impl Into<String>, vector_dim: usize) -> Self {
        Self {
            name: name.into(),
            vector_dim,
            current: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vector_dim(&self) -> usize {
        self.vector_dim
    }

    pub fn is_indexed(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn len(&self) -> usize {
        self.current
            .read()
            .as_ref()
            .map_or(0, |gen| gen.records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the entire collection contents with a new generation
    pub fn publish(&self, records: Vec<EmbeddingRecord>) -> Result<()> {
        self.check_dimensions(&records)?;
        let generation = Arc::new(Generation::build(records));
        *self.current.write() = Some(generation);
        Ok(())
    }

    /// Upsert records into a copy of the current generation and publish it
    ///
    /// Records with an identity already present replace the stored record;
    /// new identities are appended. Works on an unindexed collection too,
    /// creating its first generation.
    pub fn upsert(&self, records: Vec<EmbeddingRecord>) -> Result<()> {
        self.check_dimensions(&records)?;

        let mut merged: Vec<EmbeddingRecord> = self
            .current
            .read()
            .as_ref()
            .map_or_else(Vec::new, |gen| gen.records.clone());
        merged.extend(records);

        let generation = Arc::new(Generation::build(merged));
        *self.current.write() = Some(generation);
        Ok(())
    }

    /// Look up the stored record for an element identity
    pub fn record(&self, id: &ElementId) -> Option<EmbeddingRecord> {
        let guard = self.current.read();
        let generation = guard.as_ref()?;
        generation
            .by_id
            .get(id)
            .map(|&slot| generation.records[slot].clone())
    }

    /// The stored source-text hash for an element, if indexed
    pub fn text_hash(&self, id: &ElementId) -> Option<u64> {
        let guard = self.current.read();
        let generation = guard.as_ref()?;
        generation
            .by_id
            .get(id)
            .map(|&slot| generation.records[slot].text_hash)
    }

    /// Search for the `k` most similar records
    ///
    /// Hits are sorted by descending similarity; ties break on the element
    /// identity's natural order so results are deterministic. Ranks are
    /// assigned 1-based after sorting.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<SearchHit>> {
        let generation = self
            .current
            .read()
            .clone()
            .ok_or_else(|| Error::CollectionNotFound(self.name.clone()))?;

        if query.dim() != self.vector_dim {
            return Err(Error::InvalidDimension {
                expected: self.vector_dim,
                actual: query.dim(),
            });
        }

        let mut hits: Vec<SearchHit> = generation
            .records
            .iter()
            .map(|record| {
                SearchHit::from_similarity(record.id.clone(), record.vector.cosine_similarity(query))
            })
            .collect();

        hits.sort_by(|a, b| {
            OrderedFloat(b.similarity)
                .cmp(&OrderedFloat(a.similarity))
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);

        for (i, hit) in hits.iter_mut().enumerate() {
            hit.rank = i + 1;
        }

        Ok(hits)
    }

    fn check_dimensions(&self, records: &[EmbeddingRecord]) -> Result<()> {
        for record in records {
            if record.vector.dim() != self.vector_dim {
                return Err(Error::InvalidDimension {
                    expected: self.vector_dim,
                    actual: record.vector.dim(),
                });
            }
        }
        Ok(())
    }
}
