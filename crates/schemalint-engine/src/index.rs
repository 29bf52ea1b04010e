//! Index validators

use std::collections::BTreeSet;

use schemalint_core::{index_prefix, EntityKind, Index, IndexType, NamingRules, RuleCode, Table, ValidationResult};

use crate::error::RuleError;
use crate::primitives::{validate_identifier, validate_pattern};

/// Canonical index name: `{prefix}{TABLE}__{COL1}__{COL2}...`
///
/// ```
/// use schemalint_core::IndexType;
/// use schemalint_engine::generate_index_name;
///
/// assert_eq!(
///     generate_index_name("USER", &["USER_ID"], IndexType::Clustered, true),
///     "PK__USER__USER_ID"
/// );
/// ```
pub fn generate_index_name<S: AsRef<str>>(
    table_name: &str,
    columns: &[S],
    index_type: IndexType,
    unique: bool,
) -> String {
    let mut name = format!("{}{}", index_prefix(index_type, unique), table_name);
    for column in columns {
        name.push_str("__");
        name.push_str(column.as_ref());
    }
    name
}

fn index_name_failure(
    name: &str,
    table_name: &str,
    index_type: IndexType,
    unique: bool,
    rules: Option<&NamingRules>,
) -> Result<Option<ValidationResult>, RuleError> {
    let result = validate_identifier(name);
    if !result.is_valid {
        return Ok(Some(result));
    }

    let prefix = index_prefix(index_type, unique);
    if !name.starts_with(prefix) {
        return Ok(Some(ValidationResult::fail(
            RuleCode::IndexPrefixMismatch,
            format!("{} 인덱스명은 '{}'(으)로 시작해야 합니다", index_type, prefix),
        )));
    }

    if !name.to_lowercase().contains(&table_name.to_lowercase()) {
        return Ok(Some(ValidationResult::fail(
            RuleCode::IndexMissingTableName,
            format!("인덱스명에 테이블명 '{}'이(가) 포함되어야 합니다", table_name),
        )));
    }

    if let Some(pattern) = rules.and_then(|r| r.index_pattern.as_deref()) {
        let result = validate_pattern(name, pattern, EntityKind::Index)?;
        if !result.is_valid {
            return Ok(Some(result));
        }
    }

    Ok(None)
}

/// Index name validator
///
/// Checks the prefix required by `(index_type, unique)`, then that the table
/// name appears, then `index_pattern`. The suggestion is the generated
/// canonical name; for pattern failures it is only offered when it matches
/// the pattern itself.
pub fn validate_index_name<S: AsRef<str>>(
    name: &str,
    table_name: &str,
    index_type: IndexType,
    unique: bool,
    columns: &[S],
    rules: Option<&NamingRules>,
) -> Result<ValidationResult, RuleError> {
    let Some(failure) = index_name_failure(name, table_name, index_type, unique, rules)? else {
        return Ok(ValidationResult::ok());
    };

    let generated = generate_index_name(table_name, columns, index_type, unique);

    if failure.rule == Some(RuleCode::PatternMismatch)
        && index_name_failure(&generated, table_name, index_type, unique, rules)?.is_some()
    {
        return Ok(failure);
    }

    Ok(failure.with_suggestion(generated))
}

/// Index key checks against the owning table
///
/// Zero columns, unknown columns and repeated columns are each reported.
pub fn validate_index_columns(index: &Index, table: &Table) -> Vec<ValidationResult> {
    if index.columns.is_empty() {
        return vec![ValidationResult::fail(
            RuleCode::IndexNoColumns,
            "인덱스에는 최소 1개의 컬럼이 필요합니다",
        )];
    }

    let mut failures = Vec::new();
    let mut seen = BTreeSet::new();

    for key in &index.columns {
        if table.find_column(&key.column_name).is_none() {
            failures.push(ValidationResult::fail(
                RuleCode::IndexUnknownColumn,
                format!(
                    "인덱스 컬럼 '{}'이(가) 테이블 '{}'에 없습니다",
                    key.column_name, table.name
                ),
            ));
        }

        if !seen.insert(key.column_name.to_uppercase()) {
            failures.push(ValidationResult::fail(
                RuleCode::IndexDuplicateColumn,
                format!("인덱스 컬럼 '{}'이(가) 중복되었습니다", key.column_name),
            ));
        }
    }

    failures
}
