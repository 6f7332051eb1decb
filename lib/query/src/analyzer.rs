//! Query analysis
//!
//! Matches the raw query text against the configured patterns to derive a
//! [`QueryContext`]. Matching is word-boundary based: the query is tokenized
//! into a word set and a pattern token must equal a query token, so "cat"
//! never matches "category".

use crate::config::{QueryPattern, RetrievalConfig};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Query type reported when no query pattern matched
pub const UNKNOWN_QUERY_TYPE: &str = "unknown";

/// The structured interpretation of one query
///
/// Built fresh per query; immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryContext {
    pub suggested_tables: BTreeSet<String>,
    pub excluded_tables: BTreeSet<String>,
    /// pattern_id of the highest-boost matching query pattern, or "unknown"
    pub query_type: String,
    /// Sum of confidence boosts across all matched query patterns
    pub confidence_boost: f32,
    /// Matched query pattern ids, in configuration order
    pub matched_patterns: Vec<String>,
}

impl QueryContext {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            suggested_tables: BTreeSet::new(),
            excluded_tables: BTreeSet::new(),
            query_type: UNKNOWN_QUERY_TYPE.to_string(),
            confidence_boost: 0.0,
            matched_patterns: Vec::new(),
        }
    }
}

/// Split text into a lowercase word set
///
/// Word characters are alphanumerics and underscore, so schema-style names
/// like `ord_hdr` survive as single tokens.
#[must_use]
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when every token of the (possibly multi-word) pattern appears in the
/// query token set
fn phrase_matches(pattern: &str, query_tokens: &BTreeSet<String>) -> bool {
    let pattern_tokens = tokenize(pattern);
    !pattern_tokens.is_empty() && pattern_tokens.iter().all(|t| query_tokens.contains(t))
}

/// Evaluates queries against the configured table and query patterns
pub struct QueryAnalyzer {
    config: Arc<RetrievalConfig>,
}

impl QueryAnalyzer {
    #[must_use]
    pub fn new(config: Arc<RetrievalConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Analyze a query into its context
    ///
    /// An empty query, or one with no recognizable tokens, yields an empty
    /// context with query type "unknown" - never an error.
    pub fn analyze(&self, query: &str) -> QueryContext {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return QueryContext::empty();
        }

        let mut context = QueryContext::empty();

        // Table patterns: an exclusion match is a hard veto and the strongest
        // signal; inclusion is only considered when no exclusion fired.
        for pattern in &self.config.table_patterns {
            let vetoed = pattern
                .exclusion_patterns
                .iter()
                .any(|p| phrase_matches(p, &query_tokens));
            if vetoed {
                debug!(table = %pattern.table_name, "table vetoed by exclusion pattern");
                context.excluded_tables.insert(pattern.table_name.clone());
                continue;
            }

            let matched = pattern
                .keywords
                .iter()
                .chain(pattern.aliases.iter())
                .any(|k| phrase_matches(k, &query_tokens));
            if matched {
                context.suggested_tables.insert(pattern.table_name.clone());
            }
        }

        // Query patterns: boosts compound across every match; multiple weak
        // signals add up rather than taking the best one.
        let mut best: Option<&QueryPattern> = None;
        for pattern in &self.config.query_patterns {
            let matched = pattern
                .keywords
                .iter()
                .any(|k| phrase_matches(k, &query_tokens));
            if !matched {
                continue;
            }

            debug!(pattern = %pattern.pattern_id, "query pattern matched");
            context.matched_patterns.push(pattern.pattern_id.clone());
            context.confidence_boost += pattern.confidence_boost;

            context
                .suggested_tables
                .extend(pattern.required_tables.iter().cloned());
            context
                .suggested_tables
                .extend(pattern.optional_tables.iter().cloned());
            context
                .excluded_tables
                .extend(pattern.excluded_tables.iter().cloned());

            // Ties keep the earlier pattern in configuration order
            if best.map_or(true, |b| pattern.confidence_boost > b.confidence_boost) {
                best = Some(pattern);
            }
        }

        if let Some(pattern) = best {
            context.query_type = pattern.pattern_id.clone();
        }

        // Exclusion always wins over suggestion
        let excluded = context.excluded_tables.clone();
        context.suggested_tables.retain(|t| !excluded.contains(t));

        context
    }
}
