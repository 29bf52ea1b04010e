//! Case conventions: checks and best-effort conversions
//!
//! The conversions are plain character-class transforms. They are not
//! dictionary-aware and not inverses of each other: `USER` becomes
//! `u_s_e_r` in snake case, and `USER_ID` becomes `USERID` in Pascal case.
//! Suggestion consumers depend on this exact output, so changing it is a
//! behavior change.

use regex::Regex;
use schemalint_core::{CaseStyle, RuleCode, ValidationResult};
use std::sync::LazyLock;

static PASCAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());

static SNAKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$").unwrap());

fn is_segment_delimiter(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// Capitalize the first letter of each `_`/`-`/whitespace separated segment
/// and drop the delimiters. The rest of each segment is left untouched.
pub fn to_pascal_case(name: &str) -> String {
    name.split(is_segment_delimiter)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Lowercase, with `_` inserted before every uppercase ASCII letter and one
/// leading `_` removed.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    match out.strip_prefix('_') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

/// Convert `name` to `style`
pub fn convert_case(name: &str, style: CaseStyle) -> String {
    match style {
        CaseStyle::Upper => name.to_uppercase(),
        CaseStyle::Lower => name.to_lowercase(),
        CaseStyle::Pascal => to_pascal_case(name),
        CaseStyle::Snake => to_snake_case(name),
    }
}

/// Whether `name` already follows `style`
pub fn conforms_to_case(name: &str, style: CaseStyle) -> bool {
    match style {
        CaseStyle::Upper => name == name.to_uppercase(),
        CaseStyle::Lower => name == name.to_lowercase(),
        CaseStyle::Pascal => PASCAL_RE.is_match(name),
        CaseStyle::Snake => SNAKE_RE.is_match(name),
    }
}

fn describe(style: CaseStyle) -> &'static str {
    match style {
        CaseStyle::Upper => "대문자(UPPER)",
        CaseStyle::Lower => "소문자(lower)",
        CaseStyle::Pascal => "PascalCase",
        CaseStyle::Snake => "snake_case",
    }
}

/// Case validator
///
/// The converted name is offered as a suggestion only when it passes this
/// same check; some inputs (`User_Name` in snake case) have no such fix.
pub fn validate_case(name: &str, style: CaseStyle) -> ValidationResult {
    if conforms_to_case(name, style) {
        return ValidationResult::ok();
    }

    let converted = convert_case(name, style);
    let suggestion = conforms_to_case(&converted, style).then_some(converted);

    ValidationResult::fail(
        RuleCode::CaseMismatch,
        format!("'{}'은(는) {} 형식이어야 합니다", name, describe(style)),
    )
    .with_optional_suggestion(suggestion)
}
