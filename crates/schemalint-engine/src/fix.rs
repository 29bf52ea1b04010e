//! Batch auto-fix
//!
//! [`plan_fixes`] proposes renames for rejected names. [`apply_fixes`]
//! produces a new project with the renames applied and every reference to a
//! renamed table or column rewritten. Nothing is changed in place.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use schemalint_core::{EntityKind, NamingRules, Project, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::column::validate_column_name;
use crate::error::RuleError;
use crate::index::{generate_index_name, validate_index_name};
use crate::table::validate_table_name;

/// One proposed rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub entity: EntityKind,

    /// Owning table, by its name before any rename
    pub table: String,

    pub from: String,

    pub to: String,
}

impl fmt::Display for Rename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity {
            EntityKind::Table => write!(f, "{} {} -> {}", self.entity, self.from, self.to),
            _ => write!(f, "{} {}.{} -> {}", self.entity, self.table, self.from, self.to),
        }
    }
}

/// Renames for every rejected table, column and index name
///
/// A rename is only proposed when its target passes the same validator and
/// does not collide with another name in the same scope. Column and index
/// names are judged against the table's new name.
pub fn plan_fixes(project: &Project, rules: Option<&NamingRules>) -> Result<Vec<Rename>, RuleError> {
    let mut renames = Vec::new();

    let mut planned = BTreeSet::new();
    let mut new_table_names = Vec::with_capacity(project.tables.len());

    for (position, table) in project.tables.iter().enumerate() {
        let target = passing_suggestion(&table.name, validate_table_name(&table.name, rules)?, |candidate| {
            Ok(validate_table_name(candidate, rules)?.is_valid)
        })?;
        let others = project.tables.iter().map(|t| t.name.as_str());

        match target {
            Some(to) if is_free(&to, position, others, &mut planned) => {
                renames.push(Rename {
                    entity: EntityKind::Table,
                    table: table.name.clone(),
                    from: table.name.clone(),
                    to: to.clone(),
                });
                new_table_names.push(to);
            }
            _ => new_table_names.push(table.name.clone()),
        }
    }

    for (table, new_table) in project.tables.iter().zip(&new_table_names) {
        let column_renames = plan_column_fixes(table, new_table, rules)?;
        let renamed_columns: BTreeMap<String, String> = column_renames
            .iter()
            .map(|r| (r.from.to_uppercase(), r.to.clone()))
            .collect();
        renames.extend(column_renames);
        renames.extend(plan_index_fixes(table, new_table, &renamed_columns, rules)?);
    }

    debug!("Planned {} rename(s) for project {}", renames.len(), project.name);
    Ok(renames)
}

/// Whether `to` clashes with neither another entity's current name nor an
/// earlier planned rename; claims it when free
fn is_free<'a>(
    to: &str,
    position: usize,
    names: impl Iterator<Item = &'a str>,
    planned: &mut BTreeSet<String>,
) -> bool {
    let clashes = names
        .enumerate()
        .any(|(other, name)| other != position && name.eq_ignore_ascii_case(to));

    !clashes && planned.insert(to.to_uppercase())
}

/// The validator's suggestion, when it differs from `current` and passes
fn passing_suggestion<F>(
    current: &str,
    result: schemalint_core::ValidationResult,
    mut passes: F,
) -> Result<Option<String>, RuleError>
where
    F: FnMut(&str) -> Result<bool, RuleError>,
{
    if result.is_valid {
        return Ok(None);
    }
    match result.suggestion {
        Some(suggestion) if suggestion != current && passes(&suggestion)? => Ok(Some(suggestion)),
        _ => Ok(None),
    }
}

fn plan_column_fixes(table: &Table, new_table: &str, rules: Option<&NamingRules>) -> Result<Vec<Rename>, RuleError> {
    let mut renames = Vec::new();
    let mut planned = BTreeSet::new();

    for (position, column) in table.columns.iter().enumerate() {
        let result = validate_column_name(&column.name, new_table, column.primary_key, rules)?;
        let target = passing_suggestion(&column.name, result, |candidate| {
            Ok(validate_column_name(candidate, new_table, column.primary_key, rules)?.is_valid)
        })?;

        if let Some(to) = target {
            if is_free(&to, position, table.columns.iter().map(|c| c.name.as_str()), &mut planned) {
                renames.push(Rename {
                    entity: EntityKind::Column,
                    table: table.name.clone(),
                    from: column.name.clone(),
                    to,
                });
            }
        }
    }

    Ok(renames)
}

fn plan_index_fixes(
    table: &Table,
    new_table: &str,
    renamed_columns: &BTreeMap<String, String>,
    rules: Option<&NamingRules>,
) -> Result<Vec<Rename>, RuleError> {
    let mut renames = Vec::new();
    let mut planned = BTreeSet::new();

    for (position, index) in table.indexes.iter().enumerate() {
        let columns: Vec<&str> = index
            .columns
            .iter()
            .map(|c| {
                renamed_columns
                    .get(&c.column_name.to_uppercase())
                    .map(String::as_str)
                    .unwrap_or(c.column_name.as_str())
            })
            .collect();

        let current = validate_index_name(&index.name, new_table, index.index_type, index.unique, &columns, rules)?;
        if current.is_valid {
            continue;
        }

        let to = generate_index_name(new_table, &columns, index.index_type, index.unique);
        let passes = validate_index_name(&to, new_table, index.index_type, index.unique, &columns, rules)?.is_valid;

        if passes
            && to != index.name
            && is_free(&to, position, table.indexes.iter().map(|i| i.name.as_str()), &mut planned)
        {
            renames.push(Rename {
                entity: EntityKind::Index,
                table: table.name.clone(),
                from: index.name.clone(),
                to,
            });
        }
    }

    Ok(renames)
}

/// A copy of `project` with `renames` applied
///
/// Column and index renames are applied before table renames, since they
/// name their table by its old name. Index keys and relationships follow
/// renamed tables and columns.
pub fn apply_fixes(project: &Project, renames: &[Rename]) -> Project {
    let mut fixed = project.clone();

    for rename in renames.iter().filter(|r| r.entity != EntityKind::Table) {
        let Some(table) = fixed
            .tables
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(&rename.table))
        else {
            continue;
        };

        match rename.entity {
            EntityKind::Column => {
                for column in table.columns.iter_mut().filter(|c| c.name == rename.from) {
                    column.name = rename.to.clone();
                }
                for key in table.indexes.iter_mut().flat_map(|i| i.columns.iter_mut()) {
                    if key.column_name.eq_ignore_ascii_case(&rename.from) {
                        key.column_name = rename.to.clone();
                    }
                }
                for relationship in &mut fixed.relationships {
                    if relationship.from_table.eq_ignore_ascii_case(&rename.table)
                        && relationship.from_column.eq_ignore_ascii_case(&rename.from)
                    {
                        relationship.from_column = rename.to.clone();
                    }
                    if relationship.to_table.eq_ignore_ascii_case(&rename.table)
                        && relationship.to_column.eq_ignore_ascii_case(&rename.from)
                    {
                        relationship.to_column = rename.to.clone();
                    }
                }
            }
            EntityKind::Index => {
                for index in table.indexes.iter_mut().filter(|i| i.name == rename.from) {
                    index.name = rename.to.clone();
                }
            }
            _ => {}
        }
    }

    for rename in renames.iter().filter(|r| r.entity == EntityKind::Table) {
        for table in fixed.tables.iter_mut().filter(|t| t.name == rename.from) {
            table.name = rename.to.clone();
        }
        for relationship in &mut fixed.relationships {
            if relationship.from_table.eq_ignore_ascii_case(&rename.from) {
                relationship.from_table = rename.to.clone();
            }
            if relationship.to_table.eq_ignore_ascii_case(&rename.from) {
                relationship.to_table = rename.to.clone();
            }
        }
    }

    fixed
}
