//! Suggestion generator
//!
//! Proposes a corrected identifier for a rejected one. Steps run in a fixed
//! order:
//!
//! 1. case conversion (`enforce_upper_case` wins over `enforce_case`)
//! 2. table prefix/suffix insertion (tables only)
//! 3. standalone name rewrite to `{table}_{name}` (columns only, with
//!    `enforce_table_column_naming`)
//!
//! Feeding the output back in returns it unchanged, except where the case
//! conversion itself is lossy.

use schemalint_core::{EntityKind, NamingRules};

use crate::case::convert_case;
use crate::column::is_forbidden_standalone_name;
use crate::error::RuleError;
use crate::primitives::{default_naming_suggestion, strip_affixes, validate_default_naming};

/// Suggest a name for `current` under `rules`
///
/// With no rules, the default PascalCase/UPPER_SNAKE_CASE convention's fix is
/// used. `table_name` is only consulted for columns.
pub fn suggest_name(
    current: &str,
    kind: EntityKind,
    rules: Option<&NamingRules>,
    table_name: Option<&str>,
) -> String {
    let Some(rules) = rules else {
        return if validate_default_naming(current).is_valid {
            current.to_string()
        } else {
            default_naming_suggestion(current)
        };
    };

    match kind {
        EntityKind::Table => suggest_table_name(current, rules),
        EntityKind::Column => suggest_column_name(current, rules, table_name),
        _ => apply_case(current, rules),
    }
}

fn apply_case(name: &str, rules: &NamingRules) -> String {
    match rules.effective_case() {
        Some(style) => convert_case(name, style),
        None => name.to_string(),
    }
}

fn suggest_table_name(current: &str, rules: &NamingRules) -> String {
    let prefix = rules.table_prefix();
    let suffix = rules.table_suffix();

    // Case the core only, so the affixes keep their configured spelling
    let cased = apply_case(strip_affixes(current, prefix, suffix), rules);
    let core = strip_affixes(&cased, prefix, suffix);

    format!("{}{}{}", prefix.unwrap_or(""), core, suffix.unwrap_or(""))
}

fn suggest_column_name(current: &str, rules: &NamingRules, table_name: Option<&str>) -> String {
    let cased = apply_case(current, rules);

    match table_name {
        Some(table)
            if rules.enforce_table_column_naming
                && !table.is_empty()
                && (is_forbidden_standalone_name(current) || is_forbidden_standalone_name(&cased)) =>
        {
            apply_case(&format!("{}_{}", table, cased), rules)
        }
        _ => cased,
    }
}

/// First candidate that passes `passes`, skipping blanks and repeats
pub(crate) fn first_passing<F>(
    candidates: impl IntoIterator<Item = String>,
    mut passes: F,
) -> Result<Option<String>, RuleError>
where
    F: FnMut(&str) -> Result<bool, RuleError>,
{
    let mut tried: Vec<String> = Vec::new();
    for candidate in candidates {
        if candidate.trim().is_empty() || tried.contains(&candidate) {
            continue;
        }
        if passes(&candidate)? {
            return Ok(Some(candidate));
        }
        tried.push(candidate);
    }
    Ok(None)
}
