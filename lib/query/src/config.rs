//! Typed pattern configuration
//!
//! Loaded once from the collaborator's parsed JSON and validated before any
//! query runs. Read-only during query processing; components receive it as an
//! `Arc` and never mutate it.

use schemax_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Pattern identifying when a table is relevant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePattern {
    pub table_name: String,
    /// Tokens that pull the table into the suggestion set
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Alternate names treated like keywords
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Declared references in "table.column" form
    #[serde(default)]
    pub relationships: Vec<String>,
    /// Tokens that veto the table outright
    #[serde(default)]
    pub exclusion_patterns: Vec<String>,
}

/// Pattern detecting a query type with its table consequences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPattern {
    pub pattern_id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub required_tables: Vec<String>,
    #[serde(default)]
    pub optional_tables: Vec<String>,
    #[serde(default)]
    pub excluded_tables: Vec<String>,
    #[serde(default)]
    pub confidence_boost: f32,
}

/// Domain-level thresholds and switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Minimum confidence on a 0-1 scale; compared as `threshold * 100`
    /// against normalized hit confidence
    pub min_confidence_threshold: f32,
    pub max_tables_per_query: usize,
    pub max_columns_per_table: usize,
    pub enable_relationship_inference: bool,
    /// When set, stale search hits abort the query instead of being dropped
    pub strict_mode: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            min_confidence_threshold: 0.5,
            max_tables_per_query: 5,
            max_columns_per_table: 3,
            enable_relationship_inference: true,
            strict_mode: false,
        }
    }
}

/// Complete retrieval configuration as handed over by the config loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default)]
    pub table_patterns: Vec<TablePattern>,
    #[serde(default)]
    pub query_patterns: Vec<QueryPattern>,
    #[serde(default, rename = "domain_config")]
    pub domain: DomainConfig,
}

impl RetrievalConfig {
    /// Validate the configuration against the set of known table names
    ///
    /// Load-time errors abort startup entirely; the engine never runs with a
    /// partially valid configuration.
    pub fn validate(&self, known_tables: &BTreeSet<String>) -> Result<()> {
        let domain = &self.domain;
        if !(0.0..=1.0).contains(&domain.min_confidence_threshold) {
            return Err(Error::Configuration(format!(
                "min_confidence_threshold must be in [0, 1], got {}",
                domain.min_confidence_threshold
            )));
        }
        if domain.max_tables_per_query == 0 {
            return Err(Error::Configuration(
                "max_tables_per_query must be at least 1".to_string(),
            ));
        }
        if domain.max_columns_per_table == 0 {
            return Err(Error::Configuration(
                "max_columns_per_table must be at least 1".to_string(),
            ));
        }

        let mut seen_tables = HashSet::new();
        for pattern in &self.table_patterns {
            if pattern.table_name.is_empty() {
                return Err(Error::Configuration(
                    "table pattern with empty table_name".to_string(),
                ));
            }
            if !seen_tables.insert(pattern.table_name.as_str()) {
                return Err(Error::Configuration(format!(
                    "duplicate table pattern for '{}'",
                    pattern.table_name
                )));
            }
            check_table_known(&pattern.table_name, known_tables, "table pattern")?;
            for reference in &pattern.relationships {
                let target = relationship_target(reference);
                check_table_known(target, known_tables, &format!(
                    "relationship '{}' of table pattern '{}'",
                    reference, pattern.table_name
                ))?;
            }
        }

        let mut seen_patterns = HashSet::new();
        for pattern in &self.query_patterns {
            if pattern.pattern_id.is_empty() {
                return Err(Error::Configuration(
                    "query pattern with empty pattern_id".to_string(),
                ));
            }
            if !seen_patterns.insert(pattern.pattern_id.as_str()) {
                return Err(Error::Configuration(format!(
                    "duplicate query pattern id '{}'",
                    pattern.pattern_id
                )));
            }
            for table in pattern
                .required_tables
                .iter()
                .chain(&pattern.optional_tables)
                .chain(&pattern.excluded_tables)
            {
                check_table_known(table, known_tables, &format!(
                    "query pattern '{}'",
                    pattern.pattern_id
                ))?;
            }
        }

        Ok(())
    }

    /// Look up a table pattern by table name
    pub fn table_pattern(&self, table_name: &str) -> Option<&TablePattern> {
        self.table_patterns
            .iter()
            .find(|p| p.table_name == table_name)
    }
}

/// Table component of a "table.column" reference
#[must_use]
pub fn relationship_target(reference: &str) -> &str {
    reference.split('.').next().unwrap_or(reference)
}

fn check_table_known(table: &str, known_tables: &BTreeSet<String>, context: &str) -> Result<()> {
    if known_tables.contains(table) {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "{} references undefined table '{}'",
            context, table
        )))
    }
}
