//! JSON dump and import

use schemalint_core::{Relationship, Table};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::ExportOptions;

/// Top-level JSON document
///
/// Property names match the core model's serde names, so the document
/// parses straight back into tables and relationships.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub tables: Vec<Table>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl SchemaDocument {
    /// Snapshot of the graph with columns in `order_index` order and the
    /// sections the options leave out removed
    pub fn from_graph(tables: &[Table], relationships: &[Relationship], options: &ExportOptions) -> Self {
        let tables = tables
            .iter()
            .map(|table| {
                let mut table = table.clone();
                table.columns.sort_by_key(|c| c.order_index);
                if !options.include_comments {
                    table.description.clear();
                    for column in &mut table.columns {
                        column.description.clear();
                    }
                }
                if !options.include_indexes {
                    table.indexes.clear();
                }
                table
            })
            .collect();

        let relationships = if options.include_constraints {
            relationships.to_vec()
        } else {
            Vec::new()
        };

        Self { tables, relationships }
    }
}

pub fn render(tables: &[Table], relationships: &[Relationship], options: &ExportOptions) -> Result<String, ExportError> {
    let document = SchemaDocument::from_graph(tables, relationships, options);
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse a document produced by the JSON exporter
pub fn import_json(json: &str) -> Result<SchemaDocument, ExportError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalint_core::{Column, DataType, Index, IndexType};

    fn table() -> Table {
        Table::new("USER")
            .with_description("사용자")
            .with_column(Column::new("NAME", DataType::NVarChar).with_length(50).with_order(2))
            .with_column(Column::new("USER_ID", DataType::Int).primary_key().with_order(1))
            .with_index(Index::new("IDX__USER__NAME", IndexType::Nonclustered, false).with_column("NAME"))
    }

    #[test]
    fn round_trip_keeps_sorted_columns() {
        let relationships = [Relationship::new("USER", "USER_ID", "USER", "USER_ID")];
        let json = render(&[table()], &relationships, &ExportOptions::default()).unwrap();
        let document = import_json(&json).unwrap();

        assert_eq!(document.tables.len(), 1);
        assert_eq!(document.tables[0].column_names(), vec!["USER_ID", "NAME"]);
        let stored: Vec<_> = document.tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(stored, vec!["USER_ID", "NAME"]);
        assert_eq!(document.tables[0].columns[1].max_length, Some(50));
        assert_eq!(document.relationships, relationships.to_vec());
    }

    #[test]
    fn stable_property_names() {
        let json = render(&[table()], &[], &ExportOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let column = &value["tables"][0]["columns"][0];
        assert_eq!(column["name"], "USER_ID");
        assert_eq!(column["data_type"], "INT");
        assert_eq!(column["primary_key"], true);
        assert_eq!(column["order_index"], 1);
        assert_eq!(value["tables"][0]["indexes"][0]["index_type"], "NONCLUSTERED");
    }

    #[test]
    fn toggles_strip_sections() {
        let options = ExportOptions {
            include_comments: false,
            include_indexes: false,
            include_constraints: false,
            ..ExportOptions::default()
        };
        let relationships = [Relationship::new("USER", "USER_ID", "USER", "USER_ID")];
        let document = import_json(&render(&[table()], &relationships, &options).unwrap()).unwrap();
        assert!(document.tables[0].description.is_empty());
        assert!(document.tables[0].indexes.is_empty());
        assert!(document.relationships.is_empty());
    }

    #[test]
    fn unknown_data_type_is_rejected() {
        let json = r#"{"tables":[{"name":"T","columns":[{"name":"A","data_type":"VARCHAR2"}]}]}"#;
        assert!(matches!(import_json(json), Err(ExportError::Json(_))));
    }
}
