//! Selection results
//!
//! Bounded, ordered selections handed to the downstream prompt generator.
//! Every decision taken along the way - inclusion, exclusion, drop - leaves
//! one reasoning entry, in evaluation order, so a selection can be audited
//! after the fact.

use serde::Serialize;
use std::collections::BTreeMap;

/// How a table or column entered the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Direct vector-similarity match above the confidence threshold
    Vector,
    /// Suggested by a matched keyword or query pattern
    Pattern,
    /// Pulled in through a declared relationship to a selected table
    Relationship,
}

/// One selected table with its confidence and provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedTable {
    pub name: String,
    /// Normalized confidence in [0, 100]
    pub confidence: f32,
    pub origin: Origin,
}

/// One selected column with its confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedColumn {
    pub table: String,
    pub column: String,
    pub confidence: f32,
}

/// Result of table selection, bounded by `max_tables_per_query`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableSelection {
    pub tables: Vec<SelectedTable>,
    /// Tables the query context ruled out
    pub excluded: Vec<String>,
    /// Directly related pairs among the selected tables, as join hints
    pub relationships: Vec<(String, String)>,
    /// One entry per decision, in evaluation order
    pub reasoning: Vec<String>,
}

impl TableSelection {
    /// Selected table names, in selection order
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.iter().any(|t| t.name == table)
    }
}

/// Result of column selection, bounded per table by `max_columns_per_table`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnSelection {
    pub columns: Vec<SelectedColumn>,
    /// Selected column count per table
    pub distribution: BTreeMap<String, usize>,
    /// One entry per decision, in evaluation order
    pub reasoning: Vec<String>,
}
