//! Semantic search over the schema index
//!
//! Embeds the raw query text (through the shared cache) and searches the
//! table and column collections.

use crate::cache::EmbeddingCache;
use crate::embedder::Embedder;
use schemax_core::{CollectionKind, IndexStats, Result, SearchHit, Vector, VectorStore};
use std::sync::Arc;
use tracing::debug;

/// Default number of table candidates per query
pub const DEFAULT_TABLE_CANDIDATES: usize = 5;

/// Default number of column candidates per query
pub const DEFAULT_COLUMN_CANDIDATES: usize = 10;

/// Raw hits from both collections for one query
#[derive(Debug, Clone)]
pub struct SchemaHits {
    pub tables: Vec<SearchHit>,
    pub columns: Vec<SearchHit>,
}

/// Searches the schema index with embedded natural-language queries
pub struct SchemaSearcher {
    store: Arc<VectorStore>,
    embedder: Arc<dyn Embedder>,
    cache: Arc<EmbeddingCache>,
}

impl SchemaSearcher {
    #[must_use]
    pub fn new(
        store: Arc<VectorStore>,
        embedder: Arc<dyn Embedder>,
        cache: Arc<EmbeddingCache>,
    ) -> Self {
        Self {
            store,
            embedder,
            cache,
        }
    }

    /// Embed a query, consulting the shared embedding cache first
    pub fn embed_query(&self, query: &str) -> Result<Vector> {
        let model_id = self.embedder.model_id();
        if let Some(vector) = self.cache.get(model_id, query) {
            return Ok(vector);
        }
        let vector = self.embedder.embed(query)?;
        self.cache.insert(model_id, query, vector.clone());
        Ok(vector)
    }

    /// Search table-level elements
    pub fn search_tables(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let query_vector = self.embed_query(query)?;
        self.store.search(CollectionKind::Tables, &query_vector, k)
    }

    /// Search column-level elements
    pub fn search_columns(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let query_vector = self.embed_query(query)?;
        self.store.search(CollectionKind::Columns, &query_vector, k)
    }

    /// Search both collections with one query embedding
    pub fn search_schema(&self, query: &str, k_tables: usize, k_columns: usize) -> Result<SchemaHits> {
        let query_vector = self.embed_query(query)?;
        let tables = self.store.search(CollectionKind::Tables, &query_vector, k_tables)?;
        let columns = self
            .store
            .search(CollectionKind::Columns, &query_vector, k_columns)?;

        debug!(
            table_hits = tables.len(),
            column_hits = columns.len(),
            "schema search complete"
        );
        Ok(SchemaHits { tables, columns })
    }

    pub fn stats(&self) -> SearcherStats {
        SearcherStats {
            model_id: self.embedder.model_id().to_string(),
            cache_size: self.cache.len(),
            index: self.store.stats(),
        }
    }
}

/// Diagnostic snapshot of the searcher and its index
#[derive(Debug, Clone)]
pub struct SearcherStats {
    pub model_id: String,
    pub cache_size: usize,
    pub index: IndexStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashEmbedder;
    use crate::indexer::SchemaIndexer;
    use crate::schema::{ColumnDef, DatabaseSchema, TableDef};
    use schemax_core::Error;

    fn searcher_with_index() -> SchemaSearcher {
        let store = Arc::new(VectorStore::new(64));
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(64));
        let cache = Arc::new(EmbeddingCache::new());

        let schema = DatabaseSchema::new(vec![
            TableDef::new("cust")
                .description("registered customer accounts")
                .alias("customers")
                .column(ColumnDef::new("email").description("customer contact email address")),
            TableDef::new("emp_mstr")
                .description("employee master records")
                .column(ColumnDef::new("emp_id").description("employee identification number")),
        ]);
        SchemaIndexer::new(store.clone(), embedder.clone(), cache.clone())
            .rebuild(&schema)
            .unwrap();

        SchemaSearcher::new(store, embedder, cache)
    }

    #[test]
    fn test_search_ranks_relevant_table_first() {
        let searcher = searcher_with_index();
        let hits = searcher.search_tables("customer accounts", 2).unwrap();
        assert_eq!(hits[0].id.table, "cust");
    }

    #[test]
    fn test_search_before_index_fails() {
        let store = Arc::new(VectorStore::new(64));
        let searcher = SchemaSearcher::new(
            store,
            Arc::new(HashEmbedder::new(64)),
            Arc::new(EmbeddingCache::new()),
        );
        assert!(matches!(
            searcher.search_tables("anything", 5),
            Err(Error::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_empty_query_is_embedding_error() {
        let searcher = searcher_with_index();
        assert!(matches!(
            searcher.search_schema("", 5, 10),
            Err(Error::EmptyEmbeddingInput)
        ));
    }

    #[test]
    fn test_query_embedding_is_cached() {
        let searcher = searcher_with_index();
        let before = searcher.stats().cache_size;
        searcher.search_tables("customer email", 5).unwrap();
        searcher.search_tables("customer email", 5).unwrap();
        assert_eq!(searcher.stats().cache_size, before + 1);
    }
}
