//! The retrieval pipeline
//!
//! Wires the analyzer, searcher, and selector into the per-query call chain:
//! analyze the raw query, search both collections with its embedding, then
//! select bounded table and column sets. Each call is a pure function of its
//! inputs plus the configuration loaded at startup; only re-indexing mutates
//! state.

use serde::Serialize;

use schemax_core::{Result, SearchHit, VectorStore};
use schemax_query::{QueryAnalyzer, QueryContext, RetrievalConfig};
use schemax_select::{ColumnSelection, SchemaSelector, TableSelection};
use schemax_semantic::{
    DatabaseSchema, Embedder, EmbeddingCache, HashEmbedder, SchemaIndexer, SchemaSearcher,
    SearcherStats, DEFAULT_COLUMN_CANDIDATES, DEFAULT_TABLE_CANDIDATES,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Everything produced for one query
///
/// The selections feed the downstream prompt generator; the context and raw
/// hit lists are exposed for diagnostic and analysis modes.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalOutcome {
    pub context: QueryContext,
    pub table_hits: Vec<SearchHit>,
    pub column_hits: Vec<SearchHit>,
    pub tables: TableSelection,
    pub columns: ColumnSelection,
}

/// High-level interface: index once, retrieve per query
pub struct SchemaRetriever {
    available: BTreeSet<String>,
    indexer: SchemaIndexer,
    searcher: SchemaSearcher,
    analyzer: QueryAnalyzer,
    selector: SchemaSelector,
    table_candidates: usize,
    column_candidates: usize,
}

impl SchemaRetriever {
    /// Build a retriever with the default deterministic embedder and index
    /// the schema
    ///
    /// Configuration is validated against the schema's table names first;
    /// load-time errors abort construction entirely.
    pub fn new(schema: DatabaseSchema, config: RetrievalConfig) -> Result<Self> {
        Self::with_embedder(schema, config, Arc::new(HashEmbedder::default()))
    }

    /// Build a retriever around a caller-supplied embedder
    pub fn with_embedder(
        schema: DatabaseSchema,
        config: RetrievalConfig,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let available = schema.table_names();
        config.validate(&available)?;
        let config = Arc::new(config);

        let store = Arc::new(VectorStore::new(embedder.dimension()));
        let cache = Arc::new(EmbeddingCache::new());
        let indexer = SchemaIndexer::new(store.clone(), embedder.clone(), cache.clone());
        indexer.rebuild(&schema)?;

        Ok(Self {
            available,
            indexer,
            searcher: SchemaSearcher::new(store, embedder, cache),
            analyzer: QueryAnalyzer::new(config.clone()),
            selector: SchemaSelector::new(config),
            table_candidates: DEFAULT_TABLE_CANDIDATES,
            column_candidates: DEFAULT_COLUMN_CANDIDATES,
        })
    }

    /// Override how many raw candidates each search pulls before selection
    #[must_use]
    pub fn with_candidates(mut self, tables: usize, columns: usize) -> Self {
        self.table_candidates = tables;
        self.column_candidates = columns;
        self
    }

    /// Re-index after a schema change; replaces the availability snapshot
    pub fn reindex(&mut self, schema: DatabaseSchema) -> Result<()> {
        self.indexer.rebuild(&schema)?;
        self.available = schema.table_names();
        Ok(())
    }

    /// Run the full pipeline for one query
    ///
    /// Per-query failures (embedding, missing collection) abort only this
    /// query. An empty selection is a valid outcome - the caller decides
    /// whether to ask for clarification.
    pub fn retrieve(&self, query: &str) -> Result<RetrievalOutcome> {
        let context = self.analyzer.analyze(query);
        debug!(
            query_type = %context.query_type,
            suggested = context.suggested_tables.len(),
            excluded = context.excluded_tables.len(),
            "query analyzed"
        );

        let hits = self
            .searcher
            .search_schema(query, self.table_candidates, self.column_candidates)?;

        let tables = self
            .selector
            .select_tables(&hits.tables, &context, &self.available)?;
        let columns = self.selector.select_columns(&hits.columns, &tables, &context);

        Ok(RetrievalOutcome {
            context,
            table_hits: hits.tables,
            column_hits: hits.columns,
            tables,
            columns,
        })
    }

    /// Analyze a query without searching, for diagnostics
    pub fn analyze(&self, query: &str) -> QueryContext {
        self.analyzer.analyze(query)
    }

    pub fn available_tables(&self) -> &BTreeSet<String> {
        &self.available
    }

    pub fn stats(&self) -> SearcherStats {
        self.searcher.stats()
    }
}
