//! Column validators

use schemalint_core::{Column, EntityKind, Field, NamingRules, RuleCode, ValidationResult};

use crate::case::validate_case;
use crate::error::RuleError;
use crate::primitives::{validate_default_naming, validate_identifier, validate_pattern, validate_reserved};
use crate::suggest::{first_passing, suggest_name};
use crate::table::validate_localized_description;

/// Names that carry no meaning without their table
pub const FORBIDDEN_STANDALONE_NAMES: [&str; 5] = ["ID", "SEQ_NO", "HIST_NO", "NO", "KEY"];

/// Descriptions longer than this should use the `한글명 || 상세설명` form
pub const DESCRIPTION_FORMAT_THRESHOLD: usize = 20;

/// Suggested layout for long column descriptions
pub const DESCRIPTION_FORMAT_HINT: &str = "한글명 || 상세설명";

pub fn is_forbidden_standalone_name(name: &str) -> bool {
    let name = name.trim();
    FORBIDDEN_STANDALONE_NAMES
        .iter()
        .any(|forbidden| forbidden.eq_ignore_ascii_case(name))
}

/// Primary-key naming
///
/// A key column must not be a bare generic name and must mention its table.
/// The suggestion is `{TABLE}_{NAME}` in both cases.
pub fn validate_primary_key_name(name: &str, table_name: &str) -> ValidationResult {
    let suggestion = format!("{}_{}", table_name, name);

    if is_forbidden_standalone_name(name) {
        return ValidationResult::fail(
            RuleCode::PrimaryKeyForbiddenName,
            format!(
                "기본키 컬럼명으로 '{}'을(를) 단독으로 사용할 수 없습니다. 테이블명을 포함해주세요",
                name
            ),
        )
        .with_suggestion(suggestion);
    }

    if !name.to_lowercase().contains(&table_name.to_lowercase()) {
        return ValidationResult::fail(
            RuleCode::PrimaryKeyMissingTableName,
            format!("기본키 컬럼명에 테이블명 '{}'이(가) 포함되어야 합니다", table_name),
        )
        .with_suggestion(suggestion);
    }

    ValidationResult::ok()
}

fn column_name_failure(
    name: &str,
    table_name: &str,
    primary_key: bool,
    rules: Option<&NamingRules>,
) -> Result<Option<ValidationResult>, RuleError> {
    let result = validate_identifier(name);
    if !result.is_valid {
        return Ok(Some(result));
    }

    if let Some(rules) = rules {
        let result = validate_reserved(name, rules);
        if !result.is_valid {
            return Ok(Some(result));
        }
    }

    if primary_key {
        let result = validate_primary_key_name(name, table_name);
        if !result.is_valid {
            return Ok(Some(result));
        }
    }

    let Some(rules) = rules else {
        let result = validate_default_naming(name);
        return Ok((!result.is_valid).then_some(result));
    };

    if rules.enforce_table_column_naming && !primary_key && is_forbidden_standalone_name(name) {
        return Ok(Some(
            ValidationResult::fail(
                RuleCode::ForbiddenStandaloneName,
                format!("'{}'은(는) 단독으로 사용할 수 없습니다. 테이블명을 접두로 붙여주세요", name),
            )
            .with_suggestion(format!("{}_{}", table_name, name)),
        ));
    }

    if let Some(style) = rules.effective_case() {
        let result = validate_case(name, style);
        if !result.is_valid {
            return Ok(Some(result));
        }
    }

    if let Some(pattern) = rules.column_pattern.as_deref() {
        let result = validate_pattern(name, pattern, EntityKind::Column)?;
        if !result.is_valid {
            return Ok(Some(result));
        }
    }

    Ok(None)
}

/// Column name validator
///
/// Fail-fast: identifier length, reserved words, key naming (key columns),
/// forbidden standalone names, case, then `column_pattern`. Without rules
/// the key naming check still applies, followed by the default convention.
pub fn validate_column_name(
    name: &str,
    table_name: &str,
    primary_key: bool,
    rules: Option<&NamingRules>,
) -> Result<ValidationResult, RuleError> {
    let Some(failure) = column_name_failure(name, table_name, primary_key, rules)? else {
        return Ok(ValidationResult::ok());
    };

    let generate = |current: &str| suggest_name(current, EntityKind::Column, rules, Some(table_name));
    let generated = generate(name);

    let mut candidates = vec![generated.clone()];
    if let Some(own) = &failure.suggestion {
        candidates.push(own.clone());
        candidates.push(generate(own));
    }
    if matches!(
        failure.rule,
        Some(RuleCode::PrimaryKeyForbiddenName)
            | Some(RuleCode::PrimaryKeyMissingTableName)
            | Some(RuleCode::ForbiddenStandaloneName)
            | Some(RuleCode::ReservedWord)
    ) {
        candidates.push(generate(&format!("{}_{}", table_name, generated)));
    }

    let upgraded = first_passing(candidates, |candidate| {
        Ok(column_name_failure(candidate, table_name, primary_key, rules)?.is_none())
    })?;

    Ok(match upgraded {
        Some(suggestion) => failure.with_suggestion(suggestion),
        None => failure,
    })
}

/// Column description validator
///
/// Same hard rules as table descriptions. A long description without the
/// `||` separator still passes but carries a format hint.
pub fn validate_column_description(name: &str, description: &str) -> ValidationResult {
    let result = validate_localized_description("컬럼", name, description);
    if !result.is_valid {
        return result;
    }

    let trimmed = description.trim();
    if trimmed.chars().count() > DESCRIPTION_FORMAT_THRESHOLD && !trimmed.contains("||") {
        return ValidationResult::annotated(
            RuleCode::DescriptionFormat,
            format!(
                "{}자를 넘는 설명은 '{}' 형식을 권장합니다",
                DESCRIPTION_FORMAT_THRESHOLD, DESCRIPTION_FORMAT_HINT
            ),
            DESCRIPTION_FORMAT_HINT,
        );
    }

    result
}

/// Column property consistency: identity and nullability
///
/// Returns only the failures, each tagged with the field it concerns.
pub fn validate_column_structure(column: &Column) -> Vec<(Field, ValidationResult)> {
    let mut failures = Vec::new();

    if column.identity {
        if !column.data_type.is_integer() {
            failures.push((
                Field::Identity,
                ValidationResult::fail(
                    RuleCode::IdentityRequiresInteger,
                    format!("IDENTITY는 정수 타입에만 사용할 수 있습니다 (현재 {})", column.data_type),
                ),
            ));
        }

        if column.identity_increment == Some(0) {
            failures.push((
                Field::Identity,
                ValidationResult::fail(RuleCode::IdentityIncrementZero, "IDENTITY 증가값은 0일 수 없습니다")
                    .with_suggestion("1"),
            ));
        }

        if column.nullable {
            failures.push((
                Field::Nullable,
                ValidationResult::fail(RuleCode::IdentityNullable, "IDENTITY 컬럼은 NULL을 허용할 수 없습니다")
                    .with_suggestion("NOT NULL"),
            ));
        }
    }

    if column.primary_key && column.nullable {
        failures.push((
            Field::Nullable,
            ValidationResult::fail(RuleCode::PrimaryKeyNullable, "기본키 컬럼은 NULL을 허용할 수 없습니다")
                .with_suggestion("NOT NULL"),
        ));
    }

    failures
}
