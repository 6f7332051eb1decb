//! Parsed schema input and corpus construction
//!
//! The schema/config loader is an external collaborator; these types are the
//! already-validated shape it hands over. Corpus construction flattens the
//! schema into normalized descriptive text per element - that text is what
//! the embeddings are built from.

use schemax_core::{ElementId, ElementMeta, SchemaElement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A parsed relational schema: an ordered list of table definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub tables: Vec<TableDef>,
}

/// One table definition from the schema loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Declared references in "table.column" form
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnDef>,
}

/// One column definition from the schema loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl DatabaseSchema {
    #[must_use]
    pub fn new(tables: Vec<TableDef>) -> Self {
        Self { tables }
    }

    /// Names of all live tables, for availability checks during selection
    #[must_use]
    pub fn table_names(&self) -> BTreeSet<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    /// Flatten tables into a semantic corpus of table-level elements
    #[must_use]
    pub fn table_elements(&self) -> Vec<SchemaElement> {
        self.tables
            .iter()
            .map(|table| {
                let mut phrases: Vec<&str> = Vec::new();
                if let Some(display) = &table.display_name {
                    phrases.push(display);
                }
                phrases.push(&table.description);
                phrases.push(&table.name);
                for column in &table.columns {
                    phrases.push(&column.name);
                }
                for column in &table.columns {
                    phrases.push(&column.description);
                }
                for alias in &table.aliases {
                    phrases.push(alias);
                }

                SchemaElement::new(ElementId::table(&table.name), join_normalized(&phrases))
                    .with_meta(ElementMeta {
                        data_type: None,
                        nullable: None,
                        aliases: table.aliases.clone(),
                        relationships: table.relationships.clone(),
                    })
            })
            .collect()
    }

    /// Flatten all columns into a semantic corpus of column-level elements
    #[must_use]
    pub fn column_elements(&self) -> Vec<SchemaElement> {
        let mut corpus = Vec::new();
        for table in &self.tables {
            for column in &table.columns {
                let mut phrases: Vec<&str> = vec![&column.name, &column.description, &table.name];
                if let Some(display) = &table.display_name {
                    phrases.push(display);
                }
                for alias in &column.aliases {
                    phrases.push(alias);
                }

                corpus.push(
                    SchemaElement::new(
                        ElementId::column(&table.name, &column.name),
                        join_normalized(&phrases),
                    )
                    .with_meta(ElementMeta {
                        data_type: column.data_type.clone(),
                        nullable: column.nullable,
                        aliases: column.aliases.clone(),
                        relationships: Vec::new(),
                    }),
                );
            }
        }
        corpus
    }
}

impl TableDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn relationship(mut self, reference: impl Into<String>) -> Self {
        self.relationships.push(reference.into());
        self
    }

    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Lowercase and collapse whitespace
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_normalized(phrases: &[&str]) -> String {
    let joined = phrases
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    normalize(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemax_core::ElementKind;

    fn sample_schema() -> DatabaseSchema {
        DatabaseSchema::new(vec![
            TableDef::new("cust")
                .display_name("Customers")
                .description("Registered customer accounts")
                .alias("customers")
                .relationship("ord_hdr.ct_id")
                .column(
                    ColumnDef::new("ct_id")
                        .description("customer identification number")
                        .data_type("integer")
                        .nullable(false),
                )
                .column(ColumnDef::new("email").description("contact email address")),
            TableDef::new("ord_hdr")
                .display_name("Order Header")
                .description("One row per customer order"),
        ])
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Customer   Email\tAddress "), "customer email address");
    }

    #[test]
    fn test_table_names() {
        let names = sample_schema().table_names();
        assert!(names.contains("cust"));
        assert!(names.contains("ord_hdr"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_table_corpus_includes_columns_and_aliases() {
        let elements = sample_schema().table_elements();
        assert_eq!(elements.len(), 2);

        let cust = &elements[0];
        assert_eq!(cust.id, ElementId::table("cust"));
        assert!(cust.text.contains("customers"));
        assert!(cust.text.contains("ct_id"));
        assert!(cust.text.contains("contact email address"));
        assert_eq!(cust.meta.relationships, vec!["ord_hdr.ct_id".to_string()]);
    }

    #[test]
    fn test_column_corpus() {
        let elements = sample_schema().column_elements();
        assert_eq!(elements.len(), 2);

        let ct_id = &elements[0];
        assert_eq!(ct_id.id, ElementId::column("cust", "ct_id"));
        assert_eq!(ct_id.id.kind, ElementKind::Column);
        assert!(ct_id.text.contains("customer identification number"));
        assert!(ct_id.text.contains("cust"));
        assert_eq!(ct_id.meta.data_type.as_deref(), Some("integer"));
        assert_eq!(ct_id.meta.nullable, Some(false));
    }

    #[test]
    fn test_corpus_text_is_normalized() {
        for element in sample_schema().table_elements() {
            assert_eq!(element.text, normalize(&element.text));
        }
    }

    #[test]
    fn test_deserialize_from_collaborator_shape() {
        let json = r#"{
            "tables": [
                {
                    "name": "cust",
                    "display_name": "Customers",
                    "description": "registered customer accounts",
                    "aliases": ["customers"],
                    "relationships": ["ord_hdr.ct_id"],
                    "columns": [
                        {
                            "name": "ct_id",
                            "description": "customer identification number",
                            "data_type": "integer",
                            "nullable": false
                        }
                    ]
                }
            ]
        }"#;

        let schema: DatabaseSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.tables.len(), 1);
        assert_eq!(schema.tables[0].columns[0].data_type.as_deref(), Some("integer"));
        assert_eq!(schema.tables[0].relationships, vec!["ord_hdr.ct_id"]);
    }
}
