//! Column inventory as CSV (RFC 4180, CRLF line endings)

use schemalint_core::Table;

use crate::ExportOptions;

pub const HEADER: [&str; 10] = [
    "table",
    "column",
    "type",
    "length",
    "precision",
    "scale",
    "nullable",
    "primaryKey",
    "identity",
    "description",
];

/// Quote a field when it contains a delimiter, quote or line break
pub fn field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn record(out: &mut String, fields: &[String]) {
    let line: Vec<String> = fields.iter().map(|f| field(f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

/// One record per column, tables in input order and columns by `order_index`
///
/// The column set is fixed; `include_comments` only decides whether
/// descriptions are filled in.
pub fn render(tables: &[Table], options: &ExportOptions) -> String {
    let mut out = String::new();
    record(&mut out, &HEADER.map(String::from));

    for table in tables {
        for column in table.ordered_columns() {
            let description = if options.include_comments {
                column.description.clone()
            } else {
                String::new()
            };
            record(
                &mut out,
                &[
                    table.name.clone(),
                    column.name.clone(),
                    column.data_type.to_string(),
                    optional(column.max_length),
                    optional(column.precision),
                    optional(column.scale),
                    column.nullable.to_string(),
                    column.primary_key.to_string(),
                    column.identity.to_string(),
                    description,
                ],
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalint_core::{Column, DataType};

    #[test]
    fn quoting() {
        assert_eq!(field("plain"), "plain");
        assert_eq!(field("a,b"), "\"a,b\"");
        assert_eq!(field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn records() {
        let tables = [Table::new("USER")
            .with_column(Column::new("USER_ID", DataType::Int).primary_key().with_identity(1, 1))
            .with_column(
                Column::new("NAME", DataType::NVarChar)
                    .with_length(50)
                    .with_description("이름, 표시용"),
            )];
        let csv = render(&tables, &ExportOptions::default());
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(
            lines[0],
            "table,column,type,length,precision,scale,nullable,primaryKey,identity,description"
        );
        assert_eq!(lines[1], "USER,USER_ID,INT,,,,false,true,true,");
        assert_eq!(lines[2], "USER,NAME,NVARCHAR,50,,,true,false,false,\"이름, 표시용\"");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn comments_off_keeps_header() {
        let tables = [Table::new("T").with_column(Column::new("A", DataType::Int).with_description("설명"))];
        let options = ExportOptions {
            include_comments: false,
            ..ExportOptions::default()
        };
        let csv = render(&tables, &options);
        assert!(csv.starts_with("table,column,"));
        assert!(!csv.contains("설명"));
    }
}
