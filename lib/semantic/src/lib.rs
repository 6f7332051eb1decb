//! # schemax Semantic
//!
//! Schema embedding and semantic search for the schemax retrieval engine.
//!
//! This crate turns a parsed relational schema into embedding collections and
//! answers natural-language searches against them:
//!
//! - [`Embedder`] - trait mapping text to a fixed-dimension vector, with the
//!   deterministic [`HashEmbedder`] as the shipped implementation
//! - [`EmbeddingCache`] - explicit cache keyed by (model id, text hash)
//! - [`DatabaseSchema`] - parsed-schema input types and corpus construction
//! - [`SchemaIndexer`] - batched embedding and generation publish
//! - [`SchemaSearcher`] - query embedding plus table/column search
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use schemax_core::VectorStore;
//! use schemax_semantic::{
//!     ColumnDef, DatabaseSchema, EmbeddingCache, HashEmbedder, SchemaIndexer,
//!     SchemaSearcher, TableDef, DEFAULT_EMBEDDING_DIM,
//! };
//!
//! let schema = DatabaseSchema::new(vec![TableDef::new("customers")
//!     .description("registered customers")
//!     .column(ColumnDef::new("email").description("contact email address"))]);
//!
//! let store = Arc::new(VectorStore::new(DEFAULT_EMBEDDING_DIM));
//! let embedder = Arc::new(HashEmbedder::default());
//! let cache = Arc::new(EmbeddingCache::new());
//!
//! let indexer = SchemaIndexer::new(store.clone(), embedder.clone(), cache.clone());
//! indexer.rebuild(&schema).unwrap();
//!
//! let searcher = SchemaSearcher::new(store, embedder, cache);
//! let hits = searcher.search_tables("customer email", 5).unwrap();
//! assert!(!hits.is_empty());
//! ```

pub mod cache;
pub mod embedder;
pub mod indexer;
pub mod schema;
pub mod searcher;

pub use cache::EmbeddingCache;
pub use embedder::{Embedder, HashEmbedder, DEFAULT_EMBEDDING_DIM};
pub use indexer::SchemaIndexer;
pub use schema::{ColumnDef, DatabaseSchema, TableDef};
pub use searcher::{
    SchemaHits, SchemaSearcher, SearcherStats, DEFAULT_COLUMN_CANDIDATES, DEFAULT_TABLE_CANDIDATES,
};
