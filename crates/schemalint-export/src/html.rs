//! Standalone HTML documentation page

use schemalint_core::{Relationship, Table};
use std::fmt::{self, Write};

use crate::sql::type_display;
use crate::{ExportError, ExportOptions};

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse;margin-bottom:1.5em}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
th{background:#f4f4f4}";

/// Escape text for element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn row(out: &mut String, tag: &str, cells: &[String]) -> fmt::Result {
    out.push_str("<tr>");
    for cell in cells {
        write!(out, "<{tag}>{cell}</{tag}>")?;
    }
    out.push_str("</tr>\n");
    Ok(())
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Y" } else { "N" };
    text.to_string()
}

fn write_table(out: &mut String, table: &Table, options: &ExportOptions) -> fmt::Result {
    writeln!(out, "<section id=\"{}\">", escape(&table.name))?;
    writeln!(out, "<h2>{}</h2>", escape(&table.name))?;

    if options.include_comments && !table.description.trim().is_empty() {
        writeln!(out, "<p>{}</p>", escape(table.description.trim()))?;
    }

    out.push_str("<table>\n");
    let mut header: Vec<String> = ["Column", "Type", "Nullable", "PK"].iter().map(|s| s.to_string()).collect();
    if options.include_comments {
        header.push("Description".to_string());
    }
    row(out, "th", &header)?;

    for column in table.ordered_columns() {
        let mut cells = vec![
            escape(&column.name),
            escape(&type_display(column)),
            yes_no(column.nullable),
            yes_no(column.primary_key),
        ];
        if options.include_comments {
            cells.push(escape(&column.description));
        }
        row(out, "td", &cells)?;
    }
    out.push_str("</table>\n");

    if options.include_indexes && !table.indexes.is_empty() {
        out.push_str("<h3>Indexes</h3>\n<table>\n");
        row(out, "th", &["Name", "Type", "Unique", "Columns"].map(String::from))?;
        for index in &table.indexes {
            row(
                out,
                "td",
                &[
                    escape(&index.name),
                    index.index_type.to_string(),
                    yes_no(index.unique),
                    escape(&index.column_names().join(", ")),
                ],
            )?;
        }
        out.push_str("</table>\n");
    }

    out.push_str("</section>\n");
    Ok(())
}

pub fn render(tables: &[Table], relationships: &[Relationship], options: &ExportOptions) -> Result<String, ExportError> {
    let title = escape(options.title());
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(out, "<title>{}</title>", title)?;
    writeln!(out, "<style>{}</style>", STYLE)?;
    out.push_str("</head>\n<body>\n");
    writeln!(out, "<h1>{}</h1>", title)?;

    for table in tables {
        write_table(&mut out, table, options)?;
    }

    if options.include_constraints && !relationships.is_empty() {
        out.push_str("<section id=\"relationships\">\n<h2>Relationships</h2>\n<table>\n");
        row(&mut out, "th", &["Name", "From", "To"].map(String::from))?;
        for relationship in relationships {
            row(
                &mut out,
                "td",
                &[
                    escape(&relationship.constraint_name()),
                    escape(&format!("{}.{}", relationship.from_table, relationship.from_column)),
                    escape(&format!("{}.{}", relationship.to_table, relationship.to_column)),
                ],
            )?;
        }
        out.push_str("</table>\n</section>\n");
    }

    out.push_str("</body>\n</html>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalint_core::{Column, DataType};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn renders_document() {
        let tables = [Table::new("USER")
            .with_description("<회원>")
            .with_column(Column::new("USER_ID", DataType::Int).primary_key())];
        let html = render(&tables, &[], &ExportOptions::default().with_base_name("shop")).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>shop</title>"));
        assert!(html.contains("<h2>USER</h2>"));
        assert!(html.contains("<p>&lt;회원&gt;</p>"));
        assert!(html.contains("<tr><td>USER_ID</td><td>INT</td><td>N</td><td>Y</td><td></td></tr>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn comments_off_drops_description_column() {
        let tables = [Table::new("USER").with_description("회원")];
        let options = ExportOptions {
            include_comments: false,
            ..ExportOptions::default()
        };
        let html = render(&tables, &[], &options).unwrap();
        assert!(!html.contains("Description"));
        assert!(!html.contains("회원"));
    }
}
