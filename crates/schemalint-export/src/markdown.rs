//! Markdown table documentation

use schemalint_core::{Relationship, Table};
use std::fmt::{self, Write};

use crate::sql::type_display;
use crate::{ExportError, ExportOptions};

/// Escape text for a pipe-table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Y"
    } else {
        "N"
    }
}

fn write_table(out: &mut String, table: &Table, options: &ExportOptions) -> fmt::Result {
    writeln!(out, "## {}", table.name)?;
    out.push('\n');

    if options.include_comments && !table.description.trim().is_empty() {
        writeln!(out, "{}", table.description.trim())?;
        out.push('\n');
    }

    if options.include_comments {
        out.push_str("| Column | Type | Nullable | PK | Description |\n");
        out.push_str("|--------|------|----------|----|-------------|\n");
    } else {
        out.push_str("| Column | Type | Nullable | PK |\n");
        out.push_str("|--------|------|----------|----|\n");
    }

    for column in table.ordered_columns() {
        write!(
            out,
            "| {} | {} | {} | {} |",
            cell(&column.name),
            type_display(column),
            yes_no(column.nullable),
            yes_no(column.primary_key)
        )?;
        if options.include_comments {
            write!(out, " {} |", cell(&column.description))?;
        }
        out.push('\n');
    }

    if options.include_indexes && !table.indexes.is_empty() {
        out.push_str("\n### Indexes\n\n");
        out.push_str("| Name | Type | Unique | Columns |\n");
        out.push_str("|------|------|--------|---------|\n");
        for index in &table.indexes {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                cell(&index.name),
                index.index_type,
                yes_no(index.unique),
                cell(&index.column_names().join(", "))
            )?;
        }
    }

    out.push('\n');
    Ok(())
}

pub fn render(tables: &[Table], relationships: &[Relationship], options: &ExportOptions) -> Result<String, ExportError> {
    let mut out = String::new();
    writeln!(out, "# {}", options.title())?;
    out.push('\n');

    for table in tables {
        write_table(&mut out, table, options)?;
    }

    if options.include_constraints && !relationships.is_empty() {
        out.push_str("## Relationships\n\n");
        out.push_str("| Name | From | To |\n");
        out.push_str("|------|------|----|\n");
        for relationship in relationships {
            writeln!(
                out,
                "| {} | {}.{} | {}.{} |",
                cell(&relationship.constraint_name()),
                cell(&relationship.from_table),
                cell(&relationship.from_column),
                cell(&relationship.to_table),
                cell(&relationship.to_column)
            )?;
        }
        out.push('\n');
    }

    Ok(out)
}
