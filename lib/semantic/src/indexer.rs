//! Schema index build
//!
//! Embeds the schema corpus in batches and publishes the table and column
//! collections as complete generations. A rebuild can be cancelled between
//! batches; nothing is published until both corpora are fully embedded, so
//! cancellation leaves the previously published generations untouched.

use crate::cache::{text_hash, EmbeddingCache};
use crate::embedder::Embedder;
use crate::schema::DatabaseSchema;
use rayon::prelude::*;
use schemax_core::{
    CollectionKind, EmbeddingRecord, Error, Result, SchemaElement, Vector, VectorStore,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Elements embedded per batch; the cancel flag is checked between batches
const EMBED_BATCH_SIZE: usize = 64;

/// Builds and refreshes the vector index from a parsed schema
pub struct SchemaIndexer {
    store: Arc<VectorStore>,
    embedder: Arc<dyn Embedder>,
    cache: Arc<EmbeddingCache>,
}

impl SchemaIndexer {
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

    /// Full rebuild: embed every element and replace both collections
    pub fn rebuild(&self, schema: &DatabaseSchema) -> Result<()> {
        self.rebuild_with_cancel(schema, &AtomicBool::new(false))
    }

    /// Full rebuild with a cooperative cancel flag
    ///
    /// Returns [`Error::RebuildCancelled`] if the flag is raised between
    /// batches. The swap happens only after both corpora are complete, so an
    /// aborted rebuild never corrupts the published generations.
    pub fn rebuild_with_cancel(&self, schema: &DatabaseSchema, cancel: &AtomicBool) -> Result<()> {
        let table_records = self.embed_elements(schema.table_elements(), cancel)?;
        let column_records = self.embed_elements(schema.column_elements(), cancel)?;

        let table_count = table_records.len();
        let column_count = column_records.len();

        self.store.publish(CollectionKind::Tables, table_records)?;
        self.store.publish(CollectionKind::Columns, column_records)?;

        info!(
            tables = table_count,
            columns = column_count,
            model = self.embedder.model_id(),
            "schema index rebuilt"
        );
        Ok(())
    }

    /// Incremental update of a single collection
    ///
    /// Elements whose source text hash matches the stored record are skipped
    /// without re-embedding; the rest are embedded and merged into a new
    /// generation.
    pub fn upsert(&self, kind: CollectionKind, elements: Vec<SchemaElement>) -> Result<()> {
        let collection = self.store.collection(kind);

        let mut records = Vec::new();
        for element in elements {
            let hash = text_hash(&element.text);
            if collection.text_hash(&element.id) == Some(hash) {
                debug!(element = %element.id, "upsert skipped, source text unchanged");
                continue;
            }
            let vector = self.embed_cached(&element.text)?;
            records.push(EmbeddingRecord::new(element.id, vector, hash));
        }

        if records.is_empty() {
            return Ok(());
        }

        debug!(count = records.len(), collection = kind.name(), "upserting records");
        self.store.upsert(kind, records)
    }

    fn embed_elements(
        &self,
        elements: Vec<SchemaElement>,
        cancel: &AtomicBool,
    ) -> Result<Vec<EmbeddingRecord>> {
        let mut records = Vec::with_capacity(elements.len());

        for batch in elements.chunks(EMBED_BATCH_SIZE) {
            if cancel.load(Ordering::Acquire) {
                return Err(Error::RebuildCancelled);
            }

            let batch_records: Result<Vec<EmbeddingRecord>> = batch
                .par_iter()
                .map(|element| {
                    let vector = self.embed_cached(&element.text)?;
                    Ok(EmbeddingRecord::new(
                        element.id.clone(),
                        vector,
                        text_hash(&element.text),
                    ))
                })
                .collect();
            records.extend(batch_records?);
        }

        Ok(records)
    }

    fn embed_cached(&self, text: &str) -> Result<Vector> {
        let model_id = self.embedder.model_id();
        if let Some(vector) = self.cache.get(model_id, text) {
            return Ok(vector);
        }
        let vector = self.embedder.embed(text)?;
        self.cache.insert(model_id, text, vector.clone());
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashEmbedder;
    use crate::schema::{ColumnDef, TableDef};
    use schemax_core::ElementId;

    fn sample_schema() -> DatabaseSchema {
        DatabaseSchema::new(vec![
            TableDef::new("cust")
                .description("registered customers")
                .column(ColumnDef::new("ct_id").description("customer id"))
                .column(ColumnDef::new("email").description("email address")),
            TableDef::new("ord_hdr")
                .description("order headers")
                .column(ColumnDef::new("ord_id").description("order id")),
        ])
    }

    fn indexer() -> (Arc<VectorStore>, SchemaIndexer) {
        let store = Arc::new(VectorStore::new(64));
        let indexer = SchemaIndexer::new(
            store.clone(),
            Arc::new(HashEmbedder::new(64)),
            Arc::new(EmbeddingCache::new()),
        );
        (store, indexer)
    }

    #[test]
    fn test_rebuild_publishes_both_collections() {
        let (store, indexer) = indexer();
        indexer.rebuild(&sample_schema()).unwrap();

        let stats = store.stats();
        assert_eq!(stats.tables.count, 2);
        assert_eq!(stats.columns.count, 3);
    }

    #[test]
    fn test_cancelled_rebuild_keeps_previous_generation() {
        let (store, indexer) = indexer();
        indexer.rebuild(&sample_schema()).unwrap();

        let cancel = AtomicBool::new(true);
        let result = indexer.rebuild_with_cancel(&sample_schema(), &cancel);
        assert!(matches!(result, Err(Error::RebuildCancelled)));

        // Previous generation still fully searchable
        let stats = store.stats();
        assert_eq!(stats.tables.count, 2);
        assert_eq!(stats.columns.count, 3);
    }

    #[test]
    fn test_upsert_skips_unchanged_text() {
        let (store, indexer) = indexer();
        let schema = sample_schema();
        indexer.rebuild(&schema).unwrap();

        let before = store
            .collection(CollectionKind::Tables)
            .text_hash(&ElementId::table("cust"));

        // Re-upserting identical elements changes nothing
        indexer
            .upsert(CollectionKind::Tables, schema.table_elements())
            .unwrap();
        let after = store
            .collection(CollectionKind::Tables)
            .text_hash(&ElementId::table("cust"));
        assert_eq!(before, after);
        assert_eq!(store.stats().tables.count, 2);
    }

    #[test]
    fn test_upsert_replaces_changed_text() {
        let (store, indexer) = indexer();
        indexer.rebuild(&sample_schema()).unwrap();

        let changed = DatabaseSchema::new(vec![TableDef::new("cust")
            .description("archived customer accounts")
            .column(ColumnDef::new("ct_id"))]);
        indexer
            .upsert(CollectionKind::Tables, changed.table_elements())
            .unwrap();

        // Same element count, different stored hash
        assert_eq!(store.stats().tables.count, 2);
        let record = store
            .collection(CollectionKind::Tables)
            .record(&ElementId::table("cust"))
            .unwrap();
        assert_eq!(record.text_hash, text_hash(&changed.table_elements()[0].text));
    }
}
