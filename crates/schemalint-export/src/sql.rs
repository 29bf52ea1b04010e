//! MSSQL DDL renderer
//!
//! Layout: every `CREATE TABLE` (each followed by its extended properties),
//! then every index, then every foreign key. Batches are separated by `GO`.
//!
//! Naming findings never stop an export. A column definition SQL Server
//! would refuse, or would read differently from the model, always does:
//!
//! - length-bearing type without a length, or a length outside `1..=limit`
//! - DECIMAL/NUMERIC without precision, precision outside `1..=38`, or
//!   scale above precision
//! - IDENTITY on a non-integer type, with a zero increment, or on a column
//!   that would be rendered `NULL`
//!
//! The same conditions are errors in the column validators, so a project
//! without validation errors at default severities always renders.

use schemalint_core::{Column, Index, IndexType, Relationship, Table, MAX_DECIMAL_PRECISION};

use crate::error::ExportError;
use crate::ExportOptions;

const SCHEMA: &str = "dbo";

/// `[name]`, with `]` doubled
pub fn quote_ident(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// `N'text'`, with `'` doubled
pub fn quote_unicode(text: &str) -> String {
    format!("N'{}'", text.replace('\'', "''"))
}

fn qualified(table: &str) -> String {
    format!("{}.{}", quote_ident(SCHEMA), quote_ident(table))
}

/// Type with its length or precision, as far as the column specifies it
pub fn type_display(column: &Column) -> String {
    let name = column.data_type.as_str();
    match (column.data_type.is_length_bearing(), column.max_length, column.precision) {
        (true, Some(length), _) => format!("{}({})", name, length),
        (false, _, Some(precision)) if column.data_type.is_decimal() => {
            format!("{}({},{})", name, precision, column.scale.unwrap_or(0))
        }
        _ => name.to_string(),
    }
}

/// Reject a column whose definition cannot be rendered faithfully
fn check_column(table: &Table, column: &Column) -> Result<(), ExportError> {
    let table_name = || table.name.clone();
    let column_name = || column.name.clone();
    let data_type = column.data_type;

    if let Some(limit) = data_type.max_length_limit() {
        match column.max_length {
            None => {
                return Err(ExportError::MissingLength {
                    table: table_name(),
                    column: column_name(),
                    data_type: data_type.to_string(),
                })
            }
            Some(length) if length == 0 || length > limit => {
                return Err(ExportError::LengthOutOfRange {
                    table: table_name(),
                    column: column_name(),
                    data_type: data_type.to_string(),
                    length,
                    limit,
                })
            }
            Some(_) => {}
        }
    }

    if data_type.is_decimal() {
        let precision = column.precision.ok_or_else(|| ExportError::MissingPrecision {
            table: table_name(),
            column: column_name(),
            data_type: data_type.to_string(),
        })?;
        if !(1..=MAX_DECIMAL_PRECISION).contains(&precision) {
            return Err(ExportError::PrecisionOutOfRange {
                table: table_name(),
                column: column_name(),
                precision,
            });
        }
        if let Some(scale) = column.scale.filter(|scale| *scale > precision) {
            return Err(ExportError::ScaleExceedsPrecision {
                table: table_name(),
                column: column_name(),
                precision,
                scale,
            });
        }
    }

    if column.identity {
        let reason = if !data_type.is_integer() {
            Some(format!("type {} is not an integer type", data_type))
        } else if column.identity_increment == Some(0) {
            Some("increment is 0".to_string())
        } else if column.nullable && !column.primary_key {
            Some("column is nullable".to_string())
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ExportError::InvalidIdentity {
                table: table_name(),
                column: column_name(),
                reason,
            });
        }
    }

    Ok(())
}

fn column_definition(table: &Table, column: &Column, inline_key: Option<&str>) -> Result<String, ExportError> {
    check_column(table, column)?;
    let mut line = format!("    {} {}", quote_ident(&column.name), type_display(column));

    if column.identity {
        line.push_str(&format!(
            " IDENTITY({},{})",
            column.identity_seed.unwrap_or(1),
            column.identity_increment.unwrap_or(1)
        ));
    }

    line.push_str(if column.nullable && !column.primary_key { " NULL" } else { " NOT NULL" });

    if let Some(default) = column.default_value.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        line.push_str(&format!(" DEFAULT {}", default));
    }

    if let Some(key) = inline_key {
        line.push(' ');
        line.push_str(key);
    }

    Ok(line)
}

fn create_table(table: &Table, options: &ExportOptions) -> Result<String, ExportError> {
    let columns = table.ordered_columns();
    let keys = table.primary_key_columns();

    // A clustered index we are about to create would clash with a clustered key
    let key_clause = if options.include_indexes
        && table.indexes.iter().any(|i| i.index_type == IndexType::Clustered)
    {
        "PRIMARY KEY NONCLUSTERED"
    } else {
        "PRIMARY KEY"
    };

    let mut lines = Vec::with_capacity(columns.len() + 1);
    for column in &columns {
        let inline = (keys.len() == 1 && column.primary_key).then_some(key_clause);
        lines.push(column_definition(table, column, inline)?);
    }

    if keys.len() > 1 {
        let names: Vec<String> = keys.iter().map(|c| quote_ident(&c.name)).collect();
        lines.push(format!("    {} ({})", key_clause, names.join(", ")));
    }

    Ok(format!(
        "CREATE TABLE {} (\n{}\n);\nGO\n",
        qualified(&table.name),
        lines.join(",\n")
    ))
}

fn description_property(description: &str, table: &str, column: Option<&str>) -> String {
    let mut statement = format!(
        "EXEC sp_addextendedproperty @name = N'MS_Description', @value = {}, \
         @level0type = N'SCHEMA', @level0name = {}, @level1type = N'TABLE', @level1name = {}",
        quote_unicode(description),
        quote_unicode(SCHEMA),
        quote_unicode(table)
    );
    if let Some(column) = column {
        statement.push_str(&format!(", @level2type = N'COLUMN', @level2name = {}", quote_unicode(column)));
    }
    statement.push_str(";\n");
    statement
}

fn table_comments(table: &Table) -> String {
    let mut out = String::new();

    if !table.description.trim().is_empty() {
        out.push_str(&description_property(table.description.trim(), &table.name, None));
    }
    for column in table.ordered_columns() {
        if !column.description.trim().is_empty() {
            out.push_str(&description_property(column.description.trim(), &table.name, Some(&column.name)));
        }
    }

    if !out.is_empty() {
        out.push_str("GO\n");
    }
    out
}

fn create_index(table: &Table, index: &Index) -> Result<String, ExportError> {
    if index.columns.is_empty() {
        return Err(ExportError::IndexWithoutColumns {
            table: table.name.clone(),
            index: index.name.clone(),
        });
    }

    let mut keys = Vec::with_capacity(index.columns.len());
    for key in &index.columns {
        let column = table
            .find_column(&key.column_name)
            .ok_or_else(|| ExportError::UnknownIndexColumn {
                table: table.name.clone(),
                index: index.name.clone(),
                column: key.column_name.clone(),
            })?;
        keys.push(format!("{} {}", quote_ident(&column.name), key.order.as_str()));
    }

    Ok(format!(
        "CREATE {}{} INDEX {} ON {} ({});\nGO\n",
        if index.unique { "UNIQUE " } else { "" },
        index.index_type.as_str(),
        quote_ident(&index.name),
        qualified(&table.name),
        keys.join(", ")
    ))
}

fn resolve<'t>(
    tables: &'t [Table],
    relationship: &Relationship,
    table_name: &str,
    column_name: &str,
) -> Result<(&'t Table, &'t Column), ExportError> {
    let unknown = |target: String| ExportError::UnknownRelationshipTarget {
        name: relationship.constraint_name(),
        target,
    };

    let table = tables
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(table_name))
        .ok_or_else(|| unknown(format!("table {}", table_name)))?;
    let column = table
        .find_column(column_name)
        .ok_or_else(|| unknown(format!("column {}.{}", table_name, column_name)))?;

    Ok((table, column))
}

fn add_foreign_key(tables: &[Table], relationship: &Relationship) -> Result<String, ExportError> {
    let (from_table, from_column) = resolve(tables, relationship, &relationship.from_table, &relationship.from_column)?;
    let (to_table, to_column) = resolve(tables, relationship, &relationship.to_table, &relationship.to_column)?;

    let mut statement = format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        qualified(&from_table.name),
        quote_ident(&relationship.constraint_name()),
        quote_ident(&from_column.name),
        qualified(&to_table.name),
        quote_ident(&to_column.name)
    );
    if let Some(action) = relationship.on_delete {
        statement.push_str(&format!(" ON DELETE {}", action.as_sql()));
    }
    if let Some(action) = relationship.on_update {
        statement.push_str(&format!(" ON UPDATE {}", action.as_sql()));
    }
    statement.push_str(";\nGO\n");

    Ok(statement)
}

/// Render the full DDL script
pub fn render(tables: &[Table], relationships: &[Relationship], options: &ExportOptions) -> Result<String, ExportError> {
    let mut sections = Vec::new();

    for table in tables {
        let mut section = create_table(table, options)?;
        if options.include_comments {
            let comments = table_comments(table);
            if !comments.is_empty() {
                section.push('\n');
                section.push_str(&comments);
            }
        }
        sections.push(section);
    }

    if options.include_indexes {
        let mut indexes = String::new();
        for table in tables {
            for index in &table.indexes {
                indexes.push_str(&create_index(table, index)?);
            }
        }
        if !indexes.is_empty() {
            sections.push(indexes);
        }
    }

    if options.include_constraints && !relationships.is_empty() {
        let mut constraints = String::new();
        for relationship in relationships {
            constraints.push_str(&add_foreign_key(tables, relationship)?);
        }
        sections.push(constraints);
    }

    Ok(sections.join("\n"))
}
