//! The two-collection vector store
//!
//! Table and column retrieval have different precision needs: a handful of
//! coarse table candidates versus many fine-grained column candidates. The
//! store keeps them in separate collections so each search can use its own
//! result count.

use crate::collection::{EmbeddingRecord, VectorCollection};
use crate::error::Result;
use crate::score::SearchHit;
use crate::vector::Vector;
use serde::Serialize;

/// Logical partition of the vector index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Tables,
    Columns,
}

impl CollectionKind {
    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::Tables => "schema_tables",
            CollectionKind::Columns => "schema_columns",
        }
    }
}

/// Vector store partitioned into table and column collections
///
/// Both collections use cosine similarity; embeddings are directional, not
/// magnitude-meaningful.
pub struct VectorStore {
    tables: VectorCollection,
    columns: VectorCollection,
}

impl VectorStore {
    #[must_use]
    pub fn new(vector_dim: usize) -> Self {
        Self {
            tables: VectorCollection::new(CollectionKind::Tables.name(), vector_dim),
            columns: VectorCollection::new(CollectionKind::Columns.name(), vector_dim),
        }
    }

    pub fn vector_dim(&self) -> usize {
        self.tables.vector_dim()
    }

    pub fn collection(&self, kind: CollectionKind) -> &VectorCollection {
        match kind {
            CollectionKind::Tables => &self.tables,
            CollectionKind::Columns => &self.columns,
        }
    }

    /// Replace a collection's contents with a new generation
    pub fn publish(&self, kind: CollectionKind, records: Vec<EmbeddingRecord>) -> Result<()> {
        self.collection(kind).publish(records)
    }

    /// Upsert records into a collection
    pub fn upsert(&self, kind: CollectionKind, records: Vec<EmbeddingRecord>) -> Result<()> {
        self.collection(kind).upsert(records)
    }

    /// Search a collection for the `k` nearest records by cosine similarity
    pub fn search(&self, kind: CollectionKind, query: &Vector, k: usize) -> Result<Vec<SearchHit>> {
        self.collection(kind).search(query, k)
    }

    pub fn is_indexed(&self, kind: CollectionKind) -> bool {
        self.collection(kind).is_indexed()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            vector_dim: self.vector_dim(),
            tables: CollectionStats {
                name: self.tables.name().to_string(),
                indexed: self.tables.is_indexed(),
                count: self.tables.len(),
            },
            columns: CollectionStats {
                name: self.columns.name().to_string(),
                indexed: self.columns.is_indexed(),
                count: self.columns.len(),
            },
        }
    }
}

/// Snapshot of one collection's state, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub name: String,
    pub indexed: bool,
    pub count: usize,
}

/// Snapshot of the whole store, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub vector_dim: usize,
    pub tables: CollectionStats,
    pub columns: CollectionStats,
}
