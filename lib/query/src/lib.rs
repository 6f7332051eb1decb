//! # schemax Query
//!
//! Query analysis for the schemax retrieval engine.
//!
//! Domain knowledge lives in configuration, not code: [`TablePattern`] and
//! [`QueryPattern`] records describe which keywords pull tables in or veto
//! them, and [`QueryAnalyzer`] evaluates a raw query against those records to
//! produce a [`QueryContext`] - suggested tables, excluded tables, a detected
//! query type, and an accumulated confidence boost.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use schemax_query::{QueryAnalyzer, QueryPattern, RetrievalConfig, TablePattern};
//!
//! let config = RetrievalConfig {
//!     table_patterns: vec![TablePattern {
//!         table_name: "cust".to_string(),
//!         keywords: vec!["customer".to_string()],
//!         aliases: vec!["customers".to_string()],
//!         relationships: vec![],
//!         exclusion_patterns: vec!["employee".to_string()],
//!     }],
//!     query_patterns: vec![],
//!     domain: Default::default(),
//! };
//!
//! let analyzer = QueryAnalyzer::new(Arc::new(config));
//! let context = analyzer.analyze("find all customer orders");
//! assert!(context.suggested_tables.contains("cust"));
//! ```

pub mod analyzer;
pub mod config;

pub use analyzer::{tokenize, QueryAnalyzer, QueryContext, UNKNOWN_QUERY_TYPE};
pub use config::{relationship_target, DomainConfig, QueryPattern, RetrievalConfig, TablePattern};
