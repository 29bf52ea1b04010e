//! schemalint export - render a schema as DDL or documentation
//!
//! One entity graph, five formats:
//! - SQL Server DDL
//! - JSON (readable back with [`import_json`])
//! - Markdown
//! - HTML
//! - CSV
//!
//! Every format lists the same tables in the same order, with columns by
//! `order_index`. Rendering is pure: the only time-dependent part of the
//! output is the filename timestamp, and the caller supplies it.

pub mod csv;
pub mod error;
pub mod html;
pub mod json;
pub mod markdown;
pub mod sql;

pub use error::ExportError;
pub use json::{import_json, SchemaDocument};

use schemalint_core::{ExportDefaults, ExportFormat, Project, Relationship, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_NAME: &str = "schema";

/// What to render and how to name it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ExportFormat,

    /// Descriptions (extended properties in SQL)
    pub include_comments: bool,

    pub include_indexes: bool,

    /// Foreign keys from relationships
    pub include_constraints: bool,

    /// Filename stem and document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,

    /// Caller-supplied filename suffix, e.g. `20240101_120000`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_defaults(&ExportDefaults::default())
    }
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Options seeded from the `[export]` config section
    pub fn from_defaults(defaults: &ExportDefaults) -> Self {
        Self {
            format: defaults.format,
            include_comments: defaults.include_comments,
            include_indexes: defaults.include_indexes,
            include_constraints: defaults.include_constraints,
            base_name: None,
            timestamp: None,
        }
    }

    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = Some(base_name.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Document title
    pub fn title(&self) -> &str {
        self.base_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_BASE_NAME)
    }

    /// `{base_name}[_{timestamp}].{ext}`
    pub fn filename(&self) -> String {
        let stem: String = self
            .title()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();

        match self.timestamp.as_deref().filter(|t| !t.is_empty()) {
            Some(timestamp) => format!("{}_{}.{}", stem, timestamp, self.format.extension()),
            None => format!("{}.{}", stem, self.format.extension()),
        }
    }
}

/// Rendered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutput {
    pub content: String,
    pub filename: String,
    pub mime_type: String,
}

/// Render `tables` and `relationships` in the requested format
pub fn export(
    tables: &[Table],
    relationships: &[Relationship],
    options: &ExportOptions,
) -> Result<ExportOutput, ExportError> {
    debug!("Exporting {} table(s) as {}", tables.len(), options.format);

    let content = match options.format {
        ExportFormat::Sql => sql::render(tables, relationships, options)?,
        ExportFormat::Json => json::render(tables, relationships, options)?,
        ExportFormat::Markdown => markdown::render(tables, relationships, options)?,
        ExportFormat::Html => html::render(tables, relationships, options)?,
        ExportFormat::Csv => csv::render(tables, options),
    };

    Ok(ExportOutput {
        content,
        filename: options.filename(),
        mime_type: options.format.mime_type().to_string(),
    })
}

/// Render a whole project; the project name is the default title
pub fn export_project(project: &Project, options: &ExportOptions) -> Result<ExportOutput, ExportError> {
    let mut options = options.clone();
    if options.base_name.is_none() && !project.name.trim().is_empty() {
        options.base_name = Some(project.name.clone());
    }
    export(&project.tables, &project.relationships, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalint_core::{Column, DataType};

    #[test]
    fn filenames() {
        assert_eq!(ExportOptions::new(ExportFormat::Sql).filename(), "schema.sql");
        assert_eq!(
            ExportOptions::new(ExportFormat::Markdown)
                .with_base_name("쇼핑몰 DB")
                .with_timestamp("20240101_120000")
                .filename(),
            "쇼핑몰_DB_20240101_120000.md"
        );
    }

    #[test]
    fn output_carries_mime_type() {
        let tables = [Table::new("T").with_column(Column::new("ID", DataType::Int).primary_key())];
        for format in [
            ExportFormat::Sql,
            ExportFormat::Json,
            ExportFormat::Markdown,
            ExportFormat::Html,
            ExportFormat::Csv,
        ] {
            let output = export(&tables, &[], &ExportOptions::new(format)).unwrap();
            assert_eq!(output.mime_type, format.mime_type());
            assert!(output.filename.ends_with(format.extension()));
            assert!(output.content.contains('T'));
        }
    }

    #[test]
    fn only_sql_refuses_unrepresentable_columns() {
        let tables = [Table::new("T")
            .with_column(Column::new("ID", DataType::Int).primary_key())
            .with_column(Column::new("MEMO", DataType::NVarChar).with_length(5000))];

        assert!(matches!(
            export(&tables, &[], &ExportOptions::new(ExportFormat::Sql)),
            Err(ExportError::LengthOutOfRange { .. })
        ));
        for format in [ExportFormat::Json, ExportFormat::Markdown, ExportFormat::Html, ExportFormat::Csv] {
            let output = export(&tables, &[], &ExportOptions::new(format)).unwrap();
            assert!(output.content.contains("MEMO"), "{format} dropped the column");
        }
    }

    #[test]
    fn project_name_is_default_title() {
        let project = Project::new("shop");
        let output = export_project(&project, &ExportOptions::new(ExportFormat::Markdown)).unwrap();
        assert_eq!(output.filename, "shop.md");
        assert!(output.content.starts_with("# shop\n"));
    }

    #[test]
    fn options_from_config_defaults() {
        let defaults = ExportDefaults {
            format: ExportFormat::Csv,
            include_comments: false,
            ..ExportDefaults::default()
        };
        let options = ExportOptions::from_defaults(&defaults);
        assert_eq!(options.format, ExportFormat::Csv);
        assert!(!options.include_comments);
        assert!(options.include_indexes);
    }
}
