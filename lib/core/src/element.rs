use serde::{Deserialize, Serialize};

/// Level of a schema element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Table,
    Column,
}

/// Identity of a schema element: (kind, table, column)
///
/// Column is `None` for table-level elements. The derived total order
/// (kind, then table, then column) is used to break similarity ties
/// deterministically during search.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId {
    pub kind: ElementKind,
    pub table: String,
    pub column: Option<String>,
}

impl ElementId {
    #[inline]
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Table,
            table: name.into(),
            column: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Column,
            table: table.into(),
            column: Some(column.into()),
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.column {
            Some(column) => write!(f, "{}.{}", self.table, column),
            None => write!(f, "{}", self.table),
        }
    }
}

/// Raw metadata carried alongside a schema element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Declared references in "table.column" form
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<String>,
}

/// A schema element prepared for indexing
///
/// `text` is the normalized descriptive text the embedding is built from.
/// Elements are immutable once indexed; a schema change re-indexes wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaElement {
    pub id: ElementId,
    pub text: String,
    #[serde(default)]
    pub meta: ElementMeta,
}

impl SchemaElement {
    #[inline]
    #[must_use]
    pub fn new(id: ElementId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            meta: ElementMeta::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_meta(mut self, meta: ElementMeta) -> Self {
        self.meta = meta;
        self
    }
}
