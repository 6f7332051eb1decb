//! Declared table relationships
//!
//! Relationships come from the table-pattern configuration as "table.column"
//! references and are treated as bidirectional: a foreign key is evidence of
//! relatedness in either direction.

use schemax_query::{relationship_target, RetrievalConfig};
use std::collections::{BTreeMap, BTreeSet};

/// Bidirectional adjacency over declared table relationships
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl RelationshipGraph {
    /// Build the graph from every relationship declared in the configuration
    #[must_use]
    pub fn from_config(config: &RetrievalConfig) -> Self {
        let mut graph = Self::default();
        for pattern in &config.table_patterns {
            for reference in &pattern.relationships {
                graph.add(&pattern.table_name, relationship_target(reference));
            }
        }
        graph
    }

    pub fn add(&mut self, table1: &str, table2: &str) {
        if table1 == table2 {
            return;
        }
        self.adjacency
            .entry(table1.to_string())
            .or_default()
            .insert(table2.to_string());
        self.adjacency
            .entry(table2.to_string())
            .or_default()
            .insert(table1.to_string());
    }

    /// Tables directly related to `table`, in lexical order
    pub fn neighbors(&self, table: &str) -> impl Iterator<Item = &String> {
        self.adjacency.get(table).into_iter().flatten()
    }

    pub fn contains(&self, table: &str) -> bool {
        self.adjacency.contains_key(table)
    }

    pub fn is_related(&self, table1: &str, table2: &str) -> bool {
        self.adjacency
            .get(table1)
            .is_some_and(|neighbors| neighbors.contains(table2))
    }

    /// Directly related pairs among `tables`, as join hints for the
    /// downstream SQL generator
    ///
    /// Each unordered pair appears once, in the order the tables were given.
    #[must_use]
    pub fn direct_pairs(&self, tables: &[String]) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (i, table1) in tables.iter().enumerate() {
            for table2 in &tables[i + 1..] {
                if self.is_related(table1, table2) {
                    pairs.push((table1.clone(), table2.clone()));
                }
            }
        }
        pairs
    }
}
