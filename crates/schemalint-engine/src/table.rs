//! Table validators

use schemalint_core::{EntityKind, NamingRules, RuleCode, ValidationResult};

use crate::case::validate_case;
use crate::error::RuleError;
use crate::primitives::{
    contains_hangul, strip_affixes, validate_affixes, validate_default_naming, validate_identifier,
    validate_pattern, validate_reserved,
};
use crate::suggest::{first_passing, suggest_name};

/// First failing table-name check, without suggestion upgrading
fn table_name_failure(name: &str, rules: Option<&NamingRules>) -> Result<Option<ValidationResult>, RuleError> {
    let result = validate_identifier(name);
    if !result.is_valid {
        return Ok(Some(result));
    }

    let Some(rules) = rules else {
        let result = validate_default_naming(name);
        return Ok((!result.is_valid).then_some(result));
    };

    let result = validate_reserved(name, rules);
    if !result.is_valid {
        return Ok(Some(result));
    }

    let prefix = rules.table_prefix();
    let suffix = rules.table_suffix();

    if let Some(style) = rules.effective_case() {
        // Configured affixes are exempt from the case convention
        let result = validate_case(strip_affixes(name, prefix, suffix), style);
        if !result.is_valid {
            return Ok(Some(match result.suggestion {
                Some(core) => ValidationResult {
                    suggestion: Some(format!(
                        "{}{}{}",
                        if name.starts_with(prefix.unwrap_or("")) { prefix.unwrap_or("") } else { "" },
                        core,
                        if name.ends_with(suffix.unwrap_or("")) { suffix.unwrap_or("") } else { "" },
                    )),
                    ..result
                },
                None => result,
            }));
        }
    }

    if let Some(pattern) = rules.table_pattern.as_deref() {
        let result = validate_pattern(name, pattern, EntityKind::Table)?;
        if !result.is_valid {
            return Ok(Some(result));
        }
    }

    let result = validate_affixes(name, prefix, suffix);
    if !result.is_valid {
        return Ok(Some(result));
    }

    Ok(None)
}

/// Table name validator
///
/// Fail-fast: identifier length, reserved words, case, pattern, then
/// prefix/suffix. Without rules the default PascalCase/UPPER_SNAKE_CASE
/// convention applies. When the suggestion generator's output passes every
/// check it replaces the failing check's own suggestion.
pub fn validate_table_name(name: &str, rules: Option<&NamingRules>) -> Result<ValidationResult, RuleError> {
    let Some(failure) = table_name_failure(name, rules)? else {
        return Ok(ValidationResult::ok());
    };

    let generated = suggest_name(name, EntityKind::Table, rules, None);
    let mut candidates = vec![generated];
    if let Some(own) = &failure.suggestion {
        candidates.push(own.clone());
        candidates.push(suggest_name(own, EntityKind::Table, rules, None));
    }

    let upgraded = first_passing(candidates, |candidate| {
        Ok(table_name_failure(candidate, rules)?.is_none())
    })?;

    Ok(match upgraded {
        Some(suggestion) => failure.with_suggestion(suggestion),
        None => failure,
    })
}

/// Shared description rules for tables and columns
///
/// Rejects empty text, text that just repeats the identifier, and text with
/// no Hangul.
pub(crate) fn validate_localized_description(subject: &str, name: &str, description: &str) -> ValidationResult {
    let trimmed = description.trim();

    if trimmed.is_empty() {
        return ValidationResult::fail(
            RuleCode::DescriptionRequired,
            format!("{} 설명을 입력해주세요", subject),
        );
    }

    if trimmed.to_lowercase() == name.trim().to_lowercase() {
        return ValidationResult::fail(
            RuleCode::DescriptionCopiesName,
            format!("{} 설명이 이름과 같습니다. 의미를 설명해주세요", subject),
        );
    }

    if !contains_hangul(trimmed) {
        return ValidationResult::fail(
            RuleCode::DescriptionNotLocalized,
            format!("{} 설명은 한글로 작성해야 합니다", subject),
        );
    }

    ValidationResult::ok()
}

/// Table description validator
pub fn validate_table_description(name: &str, description: &str) -> ValidationResult {
    validate_localized_description("테이블", name, description)
}
