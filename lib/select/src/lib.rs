//! # schemax Select
//!
//! Final schema selection for the schemax retrieval engine.
//!
//! Combines ranked vector-search hits with the analyzed query context to
//! produce bounded, justified table and column selections:
//!
//! - [`SchemaSelector`] - confidence filtering, pattern overrides, absolute
//!   exclusions, relationship inference, and result bounds
//! - [`RelationshipGraph`] - declared table relationships with bridge-path
//!   discovery
//! - [`TableSelection`] / [`ColumnSelection`] - ordered results with
//!   per-decision reasoning for auditability

pub mod relationship;
pub mod result;
pub mod selector;

pub use relationship::RelationshipGraph;
pub use result::{ColumnSelection, Origin, SelectedColumn, SelectedTable, TableSelection};
pub use selector::SchemaSelector;
