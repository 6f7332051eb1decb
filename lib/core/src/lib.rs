//! # schemax Core
//!
//! Core library for the schemax schema retrieval engine.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Vector`] - Dense vector representation with cosine similarity
//! - [`SchemaElement`] - A table- or column-level schema element with identity
//! - [`VectorCollection`] - Generation-swapped store of embedding records
//! - [`VectorStore`] - The two fixed collections (tables, columns)
//! - [`SearchHit`] - A ranked search result with normalized confidence
//!
//! ## Example
//!
//! ```rust
//! use schemax_core::{CollectionKind, ElementId, EmbeddingRecord, Vector, VectorStore};
//!
//! // Create a store for 3-dimensional embeddings
//! let store = VectorStore::new(3);
//!
//! // Publish a table collection
//! let record = EmbeddingRecord::new(
//!     ElementId::table("customers"),
//!     Vector::new(vec![1.0, 0.0, 0.0]),
//!     42,
//! );
//! store.publish(CollectionKind::Tables, vec![record]).unwrap();
//!
//! // Search
//! let query = Vector::new(vec![1.0, 0.0, 0.0]);
//! let hits = store.search(CollectionKind::Tables, &query, 10).unwrap();
//! assert_eq!(hits[0].id.table, "customers");
//! ```

pub mod collection;
pub mod element;
pub mod error;
pub mod score;
pub mod store;
pub mod vector;

pub use collection::{EmbeddingRecord, VectorCollection};
pub use element::{ElementId, ElementKind, ElementMeta, SchemaElement};
pub use error::{Error, Result};
pub use score::{confidence_from_similarity, SearchHit};
pub use store::{CollectionKind, CollectionStats, IndexStats, VectorStore};
pub use vector::Vector;
