//! # schemax
//!
//! Semantic schema retrieval for natural-language query interfaces.
//!
//! Given a natural-language query and a relational schema, schemax ranks and
//! selects the most relevant tables and columns using vector similarity,
//! filters them through confidence thresholds and domain-configurable
//! pattern rules, and hands a curated, justified subset to a downstream
//! prompt/SQL generator. It is a retrieval layer, not a query planner: the
//! output is a ranked, filtered selection of schema elements, never SQL.
//!
//! ## Quick Start
//!
//! ```rust
//! use schemax::prelude::*;
//!
//! // Parsed inputs arrive from the schema/config loader
//! let schema = DatabaseSchema::new(vec![
//!     TableDef::new("cust")
//!         .description("registered customer accounts")
//!         .column(ColumnDef::new("email").description("contact email address")),
//!     TableDef::new("ord_hdr")
//!         .description("one row per customer order")
//!         .column(ColumnDef::new("ord_id").description("order identifier")),
//! ]);
//! let config = RetrievalConfig::default();
//!
//! // Build the retriever and index the schema once
//! let retriever = SchemaRetriever::new(schema, config).unwrap();
//!
//! // Retrieve per query
//! let outcome = retriever.retrieve("which customers placed orders").unwrap();
//! println!("tables: {:?}", outcome.tables.table_names());
//! for line in &outcome.tables.reasoning {
//!     println!("  {}", line);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! schemax is composed of several crates:
//!
//! - [`schemax-core`](https://docs.rs/schemax-core) - vectors, search hits, confidence scoring, generation-swapped collections
//! - [`schemax-semantic`](https://docs.rs/schemax-semantic) - embedder, embedding cache, corpus construction, index build
//! - [`schemax-query`](https://docs.rs/schemax-query) - typed pattern configuration and query analysis
//! - [`schemax-select`](https://docs.rs/schemax-select) - confidence filtering, relationship inference, bounded selection

pub mod retriever;

// Re-export core types
pub use schemax_core::{
    confidence_from_similarity, CollectionKind, ElementId, ElementKind, ElementMeta,
    EmbeddingRecord, Error, IndexStats, Result, SchemaElement, SearchHit, Vector, VectorStore,
};

// Re-export semantic layer
pub use schemax_semantic::{
    ColumnDef, DatabaseSchema, Embedder, EmbeddingCache, HashEmbedder, SchemaHits, SchemaIndexer,
    SchemaSearcher, TableDef, DEFAULT_EMBEDDING_DIM,
};

// Re-export query analysis
pub use schemax_query::{
    DomainConfig, QueryAnalyzer, QueryContext, QueryPattern, RetrievalConfig, TablePattern,
};

// Re-export selection
pub use schemax_select::{
    ColumnSelection, Origin, RelationshipGraph, SchemaSelector, SelectedColumn, SelectedTable,
    TableSelection,
};

pub use retriever::{RetrievalOutcome, SchemaRetriever};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ColumnDef, ColumnSelection, DatabaseSchema, DomainConfig, ElementId, Embedder, Error,
        HashEmbedder, QueryContext, QueryPattern, Result, RetrievalConfig, RetrievalOutcome,
        SchemaRetriever, SearchHit, TableDef, TablePattern, TableSelection, Vector,
    };
}
