//! Rule primitives over a single identifier

use regex::Regex;
use schemalint_core::{EntityKind, NamingRules, RuleCode, ValidationResult};
use std::sync::LazyLock;

use crate::error::RuleError;

/// SQL Server's `sysname` limit
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

static DEFAULT_PASCAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());

static DEFAULT_UPPER_SNAKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$").unwrap());

static HANGUL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Hangul}").unwrap());

/// Non-empty and within the identifier length limit
pub fn validate_identifier(name: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return ValidationResult::fail(RuleCode::NameRequired, "이름을 입력해주세요");
    }

    let length = name.chars().count();
    if length > MAX_IDENTIFIER_LENGTH {
        return ValidationResult::fail(
            RuleCode::NameTooLong,
            format!("이름은 {}자 이하여야 합니다 (현재 {}자)", MAX_IDENTIFIER_LENGTH, length),
        );
    }

    ValidationResult::ok()
}

/// Reject configured reserved words
pub fn validate_reserved(name: &str, rules: &NamingRules) -> ValidationResult {
    if rules.is_reserved(name) {
        ValidationResult::fail(
            RuleCode::ReservedWord,
            format!("'{}'은(는) 예약어이므로 사용할 수 없습니다", name),
        )
    } else {
        ValidationResult::ok()
    }
}

/// Compile a rule pattern anchored to the whole identifier
pub fn compile_pattern(pattern: &str, entity: EntityKind) -> Result<Regex, RuleError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| RuleError::InvalidPattern {
        entity,
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Pattern validator
///
/// Compiles `pattern` for this check and requires a full match. A pattern
/// that does not compile is a configuration error, not a failed check.
pub fn validate_pattern(name: &str, pattern: &str, entity: EntityKind) -> Result<ValidationResult, RuleError> {
    let regex = compile_pattern(pattern, entity)?;

    if regex.is_match(name) {
        Ok(ValidationResult::ok())
    } else {
        Ok(ValidationResult::fail(
            RuleCode::PatternMismatch,
            format!("'{}'이(가) 명명 패턴 {}과(와) 일치하지 않습니다", name, pattern),
        ))
    }
}

/// Prefix/suffix validator
///
/// The suggestion is the minimal concatenation that satisfies both.
pub fn validate_affixes(name: &str, prefix: Option<&str>, suffix: Option<&str>) -> ValidationResult {
    let prefix = prefix.filter(|p| !p.is_empty());
    let suffix = suffix.filter(|s| !s.is_empty());

    let missing_prefix = prefix.filter(|p| !name.starts_with(p));
    let missing_suffix = suffix.filter(|s| !name.ends_with(s));

    if missing_prefix.is_none() && missing_suffix.is_none() {
        return ValidationResult::ok();
    }

    let message = match (missing_prefix, missing_suffix) {
        (Some(p), Some(s)) => format!("'{}' 접두사와 '{}' 접미사가 필요합니다", p, s),
        (Some(p), None) => format!("'{}' 접두사로 시작해야 합니다", p),
        (None, Some(s)) => format!("'{}' 접미사로 끝나야 합니다", s),
        (None, None) => unreachable!(),
    };

    let suggestion = format!(
        "{}{}{}",
        missing_prefix.unwrap_or(""),
        name,
        missing_suffix.unwrap_or("")
    );

    ValidationResult::fail(RuleCode::AffixMismatch, message).with_suggestion(suggestion)
}

/// `name` without the prefix/suffix it already carries
pub fn strip_affixes<'a>(name: &'a str, prefix: Option<&str>, suffix: Option<&str>) -> &'a str {
    let mut core = name;
    if let Some(p) = prefix.filter(|p| !p.is_empty()) {
        core = core.strip_prefix(p).unwrap_or(core);
    }
    if let Some(s) = suffix.filter(|s| !s.is_empty()) {
        core = core.strip_suffix(s).unwrap_or(core);
    }
    core
}

/// `_` before each uppercase letter that follows a lowercase letter or digit,
/// then everything uppercased: `userName` -> `USER_NAME`
pub fn default_naming_suggestion(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;

    for c in name.chars() {
        if c.is_ascii_uppercase()
            && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push('_');
        }
        out.push(c);
        previous = Some(c);
    }

    out.to_uppercase()
}

/// Default convention when a project has no naming rules:
/// PascalCase or UPPER_SNAKE_CASE
pub fn validate_default_naming(name: &str) -> ValidationResult {
    if DEFAULT_PASCAL_RE.is_match(name) || DEFAULT_UPPER_SNAKE_RE.is_match(name) {
        return ValidationResult::ok();
    }

    let converted = default_naming_suggestion(name);
    let suggestion = DEFAULT_UPPER_SNAKE_RE.is_match(&converted).then_some(converted);

    ValidationResult::fail(
        RuleCode::NamingConvention,
        format!("'{}'은(는) PascalCase 또는 UPPER_SNAKE_CASE 형식이어야 합니다", name),
    )
    .with_optional_suggestion(suggestion)
}

/// Whether `text` has at least one Hangul character
pub fn contains_hangul(text: &str) -> bool {
    HANGUL_RE.is_match(text)
}
