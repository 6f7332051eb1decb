//! Table and column selection
//!
//! Combines ranked vector hits with the query context. Filtering order
//! matters: availability, then exclusion, then the confidence threshold
//! (which pattern suggestions override), then pattern additions, then
//! relationship inference, then the result bound. Exclusion is absolute and
//! relationship-derived tables can never displace direct matches.

use crate::relationship::RelationshipGraph;
use crate::result::{
    ColumnSelection, Origin, SelectedColumn, SelectedTable, TableSelection,
};
use ordered_float::OrderedFloat;
use schemax_core::{Error, Result, SearchHit};
use schemax_query::{QueryContext, RetrievalConfig};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Relationship-derived inclusions land at this fraction of the confidence
/// threshold, strictly below every direct match.
const RELATIONSHIP_CONFIDENCE_FACTOR: f32 = 0.8;

/// Sort rank for synthesized hits; ties against real vector ranks lose.
const SYNTHETIC_RANK: usize = usize::MAX;

struct Candidate {
    name: String,
    confidence: f32,
    rank: usize,
    origin: Origin,
}

/// Selects the final bounded table and column sets for one query
pub struct SchemaSelector {
    config: Arc<RetrievalConfig>,
    graph: RelationshipGraph,
}

impl SchemaSelector {
    #[must_use]
    pub fn new(config: Arc<RetrievalConfig>) -> Self {
        let graph = RelationshipGraph::from_config(&config);
        Self { config, graph }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Confidence threshold on the normalized 0-100 scale
    fn threshold(&self) -> f32 {
        self.config.domain.min_confidence_threshold * 100.0
    }

    /// Select tables from ranked hits and the analyzed query context
    ///
    /// Only hits for tables in `available` are considered; a stale hit is
    /// dropped with a reasoning entry, or aborts the query in strict mode.
    /// Zero selected tables is a valid outcome, not an error.
    pub fn select_tables(
        &self,
        hits: &[SearchHit],
        context: &QueryContext,
        available: &BTreeSet<String>,
    ) -> Result<TableSelection> {
        let threshold = self.threshold();
        let mut reasoning: Vec<String> = Vec::new();
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut decided: BTreeSet<String> = BTreeSet::new();

        for hit in hits {
            let table = hit.id.table.as_str();
            if decided.contains(table) {
                continue;
            }
            decided.insert(table.to_string());

            if !available.contains(table) {
                self.stale_hit(table, &mut reasoning)?;
                continue;
            }

            if context.excluded_tables.contains(table) {
                debug!(table, "table excluded by query context");
                reasoning.push(format!(
                    "excluded-by-pattern: table '{}' removed by query analysis",
                    table
                ));
                continue;
            }

            let suggested = context.suggested_tables.contains(table);
            if hit.confidence < threshold && !suggested {
                reasoning.push(format!(
                    "dropped-by-threshold: table '{}' at {:.1}% below {:.1}%",
                    table, hit.confidence, threshold
                ));
                continue;
            }

            if hit.confidence < threshold {
                // Pattern-derived inclusion overrides low vector confidence
                reasoning.push(format!(
                    "included-by-pattern: table '{}' suggested by query analysis, confidence floored at {:.1}%",
                    table, threshold
                ));
                candidates.push(Candidate {
                    name: table.to_string(),
                    confidence: threshold,
                    rank: hit.rank,
                    origin: Origin::Pattern,
                });
            } else {
                reasoning.push(format!(
                    "included-by-vector: table '{}' at {:.1}% confidence",
                    table, hit.confidence
                ));
                candidates.push(Candidate {
                    name: table.to_string(),
                    confidence: hit.confidence,
                    rank: hit.rank,
                    origin: Origin::Vector,
                });
            }
        }

        // Suggested tables the vector search never surfaced. Exclusion wins
        // over suggestion even if a caller hands over an inconsistent context.
        for table in &context.suggested_tables {
            if decided.contains(table.as_str()) || context.excluded_tables.contains(table) {
                continue;
            }
            decided.insert(table.clone());

            if !available.contains(table) {
                self.stale_hit(table, &mut reasoning)?;
                continue;
            }

            reasoning.push(format!(
                "included-by-pattern: table '{}' suggested by query analysis at {:.1}% confidence",
                table, threshold
            ));
            candidates.push(Candidate {
                name: table.clone(),
                confidence: threshold,
                rank: SYNTHETIC_RANK,
                origin: Origin::Pattern,
            });
        }

        if self.config.domain.enable_relationship_inference {
            self.expand_relationships(&mut candidates, context, available, &mut reasoning);
        }

        // Confidence descending, ties by original vector rank, then by name
        candidates.sort_by(|a, b| {
            OrderedFloat(b.confidence)
                .cmp(&OrderedFloat(a.confidence))
                .then_with(|| a.rank.cmp(&b.rank))
                .then_with(|| a.name.cmp(&b.name))
        });

        let max_tables = self.config.domain.max_tables_per_query;
        for dropped in candidates.iter().skip(max_tables) {
            reasoning.push(format!(
                "dropped-by-limit: table '{}' beyond the {} table maximum",
                dropped.name, max_tables
            ));
        }
        candidates.truncate(max_tables);

        let tables: Vec<SelectedTable> = candidates
            .into_iter()
            .map(|c| SelectedTable {
                name: c.name,
                confidence: c.confidence,
                origin: c.origin,
            })
            .collect();
        let names: Vec<String> = tables.iter().map(|t| t.name.clone()).collect();

        Ok(TableSelection {
            relationships: self.graph.direct_pairs(&names),
            tables,
            excluded: context.excluded_tables.iter().cloned().collect(),
            reasoning,
        })
    }

    /// Select columns for the already-selected tables
    ///
    /// Columns are filtered by the confidence threshold, restricted to the
    /// selected tables, then distributed so no table exceeds
    /// `max_columns_per_table`. Ranking is table-local: every selected table
    /// keeps its own best columns rather than competing globally.
    pub fn select_columns(
        &self,
        hits: &[SearchHit],
        selection: &TableSelection,
        context: &QueryContext,
    ) -> ColumnSelection {
        let threshold = self.threshold();
        let max_per_table = self.config.domain.max_columns_per_table;

        let mut reasoning: Vec<String> = Vec::new();
        let mut eligible: Vec<&SearchHit> = Vec::new();

        for hit in hits {
            let table = hit.id.table.as_str();
            let Some(column) = hit.id.column.as_deref() else {
                continue;
            };

            if context.excluded_tables.contains(table) || !selection.contains(table) {
                continue;
            }
            if hit.confidence < threshold {
                reasoning.push(format!(
                    "dropped-by-threshold: column '{}.{}' at {:.1}% below {:.1}%",
                    table, column, hit.confidence, threshold
                ));
                continue;
            }
            eligible.push(hit);
        }

        // Highest confidence first; each table keeps its local top columns
        eligible.sort_by(|a, b| {
            OrderedFloat(b.confidence)
                .cmp(&OrderedFloat(a.confidence))
                .then_with(|| a.rank.cmp(&b.rank))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut columns: Vec<SelectedColumn> = Vec::new();
        let mut distribution: BTreeMap<String, usize> = BTreeMap::new();

        for hit in eligible {
            let table = hit.id.table.clone();
            let Some(column) = hit.id.column.clone() else {
                continue;
            };

            let count = distribution.entry(table.clone()).or_insert(0);
            if *count >= max_per_table {
                reasoning.push(format!(
                    "dropped-by-limit: column '{}.{}' beyond {} columns for table '{}'",
                    table, column, max_per_table, table
                ));
                continue;
            }
            *count += 1;

            reasoning.push(format!(
                "included-by-vector: column '{}.{}' at {:.1}% confidence",
                table, column, hit.confidence
            ));
            columns.push(SelectedColumn {
                table,
                column,
                confidence: hit.confidence,
            });
        }

        ColumnSelection {
            columns,
            distribution,
            reasoning,
        }
    }

    /// One-pass relationship inference over the direct candidates
    ///
    /// Newly added tables are not expanded further; relationship evidence is
    /// always weaker than direct evidence, so it never compounds.
    fn expand_relationships(
        &self,
        candidates: &mut Vec<Candidate>,
        context: &QueryContext,
        available: &BTreeSet<String>,
        reasoning: &mut Vec<String>,
    ) {
        let related_confidence = self.threshold() * RELATIONSHIP_CONFIDENCE_FACTOR;
        let direct: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
        let mut present: BTreeSet<String> = direct.iter().cloned().collect();

        for source in &direct {
            for neighbor in self.graph.neighbors(source) {
                if present.contains(neighbor)
                    || context.excluded_tables.contains(neighbor)
                    || !available.contains(neighbor)
                {
                    continue;
                }
                present.insert(neighbor.clone());

                debug!(table = %neighbor, via = %source, "table added by relationship inference");
                reasoning.push(format!(
                    "included-by-relationship: table '{}' linked from '{}' at {:.1}% confidence",
                    neighbor, source, related_confidence
                ));
                candidates.push(Candidate {
                    name: neighbor.clone(),
                    confidence: related_confidence,
                    rank: SYNTHETIC_RANK,
                    origin: Origin::Relationship,
                });
            }
        }
    }

    /// A hit referencing a table absent from the live schema: dropped with a
    /// reasoning entry by default, fatal in strict mode.
    fn stale_hit(&self, table: &str, reasoning: &mut Vec<String>) -> Result<()> {
        if self.config.domain.strict_mode {
            return Err(Error::SchemaInconsistency(format!(
                "search hit references table '{}' absent from the live schema",
                table
            )));
        }
        debug!(table, "dropping stale search hit");
        reasoning.push(format!(
            "dropped-by-inconsistency: table '{}' not present in live schema",
            table
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemax_core::ElementId;
    use schemax_query::{DomainConfig, QueryPattern, TablePattern};

    fn config() -> RetrievalConfig {
        RetrievalConfig {
            table_patterns: vec![
                TablePattern {
                    table_name: "cust".to_string(),
                    keywords: vec!["customer".to_string()],
                    aliases: vec![],
                    relationships: vec!["ord_hdr.ct_id".to_string()],
                    exclusion_patterns: vec!["employee".to_string()],
                },
                TablePattern {
                    table_name: "ord_hdr".to_string(),
                    keywords: vec!["order".to_string()],
                    aliases: vec![],
                    relationships: vec!["ord_ln.ord_id".to_string()],
                    exclusion_patterns: vec![],
                },
            ],
            query_patterns: vec![QueryPattern {
                pattern_id: "customer_purchase".to_string(),
                keywords: vec!["purchased".to_string()],
                required_tables: vec!["cust".to_string(), "ord_hdr".to_string()],
                optional_tables: vec![],
                excluded_tables: vec![],
                confidence_boost: 0.3,
            }],
            domain: DomainConfig {
                min_confidence_threshold: 0.5,
                max_tables_per_query: 4,
                max_columns_per_table: 2,
                enable_relationship_inference: true,
                strict_mode: false,
            },
        }
    }

    fn selector() -> SchemaSelector {
        SchemaSelector::new(Arc::new(config()))
    }

    fn table_hit(table: &str, similarity: f32, rank: usize) -> SearchHit {
        let mut hit = SearchHit::from_similarity(ElementId::table(table), similarity);
        hit.rank = rank;
        hit
    }

    fn column_hit(table: &str, column: &str, similarity: f32, rank: usize) -> SearchHit {
        let mut hit = SearchHit::from_similarity(ElementId::column(table, column), similarity);
        hit.rank = rank;
        hit
    }

    fn available() -> BTreeSet<String> {
        ["cust", "ord_hdr", "ord_ln", "emp_mstr"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_vector_hits_above_threshold_selected() {
        let hits = vec![table_hit("cust", 0.9, 1), table_hit("emp_mstr", 0.7, 2)];
        let selection = selector()
            .select_tables(&hits, &QueryContext::empty(), &available())
            .unwrap();

        assert!(selection.contains("cust"));
        assert!(selection.contains("emp_mstr"));
        assert_eq!(selection.tables[0].name, "cust");
        assert_eq!(selection.tables[0].origin, Origin::Vector);
    }

    #[test]
    fn test_threshold_drops_weak_hits() {
        // similarity 0.25 -> confidence ~29.2, below the 50.0 threshold
        let hits = vec![table_hit("emp_mstr", 0.25, 1)];
        let selection = selector()
            .select_tables(&hits, &QueryContext::empty(), &available())
            .unwrap();

        assert!(selection.tables.is_empty());
        assert!(selection
            .reasoning
            .iter()
            .any(|r| r.starts_with("dropped-by-threshold")));
    }

    #[test]
    fn test_suggested_table_overrides_threshold() {
        let mut context = QueryContext::empty();
        context.suggested_tables.insert("cust".to_string());

        let hits = vec![table_hit("cust", 0.25, 1)];
        let selection = selector()
            .select_tables(&hits, &context, &available())
            .unwrap();

        assert!(selection.contains("cust"));
        let cust = &selection.tables[0];
        assert_eq!(cust.origin, Origin::Pattern);
        assert!((cust.confidence - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_exclusion_is_absolute() {
        let mut context = QueryContext::empty();
        context.excluded_tables.insert("cust".to_string());

        // Top-ranked, high-similarity hit is still removed
        let hits = vec![table_hit("cust", 0.99, 1)];
        let selection = selector()
            .select_tables(&hits, &context, &available())
            .unwrap();

        assert!(!selection.contains("cust"));
        assert_eq!(selection.excluded, vec!["cust".to_string()]);
        assert!(selection
            .reasoning
            .iter()
            .any(|r| r.starts_with("excluded-by-pattern")));
    }

    #[test]
    fn test_suggested_table_without_hit_is_synthesized() {
        let mut context = QueryContext::empty();
        context.suggested_tables.insert("ord_hdr".to_string());

        let selection = selector()
            .select_tables(&[], &context, &available())
            .unwrap();

        assert!(selection.contains("ord_hdr"));
        assert!((selection.tables[0].confidence - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_exclusion_wins_over_suggestion_in_same_context() {
        let mut context = QueryContext::empty();
        context.suggested_tables.insert("cust".to_string());
        context.excluded_tables.insert("cust".to_string());

        let selection = selector()
            .select_tables(&[], &context, &available())
            .unwrap();
        assert!(!selection.contains("cust"));
    }

    #[test]
    fn test_stale_hit_dropped_with_reasoning() {
        let hits = vec![table_hit("retired_tbl", 0.95, 1)];
        let selection = selector()
            .select_tables(&hits, &QueryContext::empty(), &available())
            .unwrap();

        assert!(selection.tables.is_empty());
        assert!(selection
            .reasoning
            .iter()
            .any(|r| r.starts_with("dropped-by-inconsistency")));
    }

    #[test]
    fn test_stale_hit_fatal_in_strict_mode() {
        let mut strict = config();
        strict.domain.strict_mode = true;
        let selector = SchemaSelector::new(Arc::new(strict));

        let hits = vec![table_hit("retired_tbl", 0.95, 1)];
        let result = selector.select_tables(&hits, &QueryContext::empty(), &available());
        assert!(matches!(result, Err(Error::SchemaInconsistency(_))));
    }

    #[test]
    fn test_relationship_inference_adds_weaker_neighbor() {
        // ord_hdr selected directly; ord_ln linked via ord_hdr.ord_ln
        let hits = vec![table_hit("ord_hdr", 0.9, 1)];
        let selection = selector()
            .select_tables(&hits, &QueryContext::empty(), &available())
            .unwrap();

        assert!(selection.contains("ord_ln"));
        let ord_hdr = selection.tables.iter().find(|t| t.name == "ord_hdr").unwrap();
        let ord_ln = selection.tables.iter().find(|t| t.name == "ord_ln").unwrap();
        assert_eq!(ord_ln.origin, Origin::Relationship);
        assert!(ord_ln.confidence < ord_hdr.confidence);
    }

    #[test]
    fn test_relationship_inference_respects_exclusion() {
        let mut context = QueryContext::empty();
        context.excluded_tables.insert("ord_ln".to_string());

        let hits = vec![table_hit("ord_hdr", 0.9, 1)];
        let selection = selector()
            .select_tables(&hits, &context, &available())
            .unwrap();

        assert!(!selection.contains("ord_ln"));
    }

    #[test]
    fn test_relationship_inference_can_be_disabled() {
        let mut no_inference = config();
        no_inference.domain.enable_relationship_inference = false;
        let selector = SchemaSelector::new(Arc::new(no_inference));

        let hits = vec![table_hit("ord_hdr", 0.9, 1)];
        let selection = selector
            .select_tables(&hits, &QueryContext::empty(), &available())
            .unwrap();

        assert!(!selection.contains("ord_ln"));
    }

    #[test]
    fn test_limit_respected_and_direct_matches_kept() {
        let mut tight = config();
        tight.domain.max_tables_per_query = 2;
        let selector = SchemaSelector::new(Arc::new(tight));

        let hits = vec![
            table_hit("cust", 0.9, 1),
            table_hit("emp_mstr", 0.85, 2),
            table_hit("ord_hdr", 0.8, 3),
        ];
        let selection = selector
            .select_tables(&hits, &QueryContext::empty(), &available())
            .unwrap();

        assert_eq!(selection.tables.len(), 2);
        // Highest-confidence direct matches survive; relationship-derived
        // candidates never displace them
        assert!(selection.contains("cust"));
        assert!(selection.contains("emp_mstr"));
        assert!(selection
            .reasoning
            .iter()
            .any(|r| r.starts_with("dropped-by-limit")));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let hits = vec![
            table_hit("cust", 0.9, 1),
            table_hit("ord_hdr", 0.9, 2),
            table_hit("emp_mstr", 0.3, 3),
        ];
        let mut context = QueryContext::empty();
        context.suggested_tables.insert("emp_mstr".to_string());

        let a = selector().select_tables(&hits, &context, &available()).unwrap();
        let b = selector().select_tables(&hits, &context, &available()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_relationship_pairs_reported() {
        let hits = vec![table_hit("cust", 0.9, 1), table_hit("ord_hdr", 0.85, 2)];
        let selection = selector()
            .select_tables(&hits, &QueryContext::empty(), &available())
            .unwrap();

        assert!(selection
            .relationships
            .contains(&("cust".to_string(), "ord_hdr".to_string())));
    }

    #[test]
    fn test_column_distribution_caps_per_table() {
        let hits = vec![
            column_hit("cust", "ct_id", 0.95, 1),
            column_hit("cust", "email", 0.9, 2),
            column_hit("cust", "phone", 0.85, 3),
            column_hit("ord_hdr", "ord_id", 0.7, 4),
        ];
        let table_selection = selector()
            .select_tables(
                &[table_hit("cust", 0.9, 1), table_hit("ord_hdr", 0.8, 2)],
                &QueryContext::empty(),
                &available(),
            )
            .unwrap();

        let columns = selector().select_columns(&hits, &table_selection, &QueryContext::empty());

        // cust capped at 2 columns, ord_hdr still represented
        assert_eq!(columns.distribution.get("cust"), Some(&2));
        assert_eq!(columns.distribution.get("ord_hdr"), Some(&1));
        assert!(!columns
            .columns
            .iter()
            .any(|c| c.table == "cust" && c.column == "phone"));
        assert!(columns
            .reasoning
            .iter()
            .any(|r| r.starts_with("dropped-by-limit")));
    }

    #[test]
    fn test_columns_restricted_to_selected_tables() {
        let hits = vec![
            column_hit("cust", "ct_id", 0.95, 1),
            column_hit("emp_mstr", "emp_id", 0.9, 2),
        ];
        let table_selection = selector()
            .select_tables(
                &[table_hit("cust", 0.9, 1)],
                &QueryContext::empty(),
                &available(),
            )
            .unwrap();

        let columns = selector().select_columns(&hits, &table_selection, &QueryContext::empty());
        assert!(columns.columns.iter().all(|c| c.table != "emp_mstr"));
    }

    #[test]
    fn test_columns_below_threshold_dropped() {
        let hits = vec![column_hit("cust", "notes", 0.2, 1)];
        let table_selection = selector()
            .select_tables(
                &[table_hit("cust", 0.9, 1)],
                &QueryContext::empty(),
                &available(),
            )
            .unwrap();

        let columns = selector().select_columns(&hits, &table_selection, &QueryContext::empty());
        assert!(columns.columns.is_empty());
        assert!(columns
            .reasoning
            .iter()
            .any(|r| r.starts_with("dropped-by-threshold")));
    }
}
