//! Naming rule configuration

use serde::{Deserialize, Serialize};

/// Case convention an identifier must follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseStyle {
    /// `USER_ACCOUNT`
    Upper,

    /// `user_account`
    Lower,

    /// `UserAccount`
    Pascal,

    /// `user_account`, with underscores before each former capital
    Snake,
}

impl std::fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upper => write!(f, "UPPER"),
            Self::Lower => write!(f, "LOWER"),
            Self::Pascal => write!(f, "PASCAL"),
            Self::Snake => write!(f, "SNAKE"),
        }
    }
}

/// Identifier rule set owned by a project
///
/// Immutable for the duration of a validation pass. Every field is optional;
/// an empty rule set only enables the checks that do not depend on
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingRules {
    /// Regex every table name must match in full
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_pattern: Option<String>,

    /// Regex every column name must match in full
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_pattern: Option<String>,

    /// Regex every index name must match in full
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_suffix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_case: Option<CaseStyle>,

    /// MSSQL house style; wins over `enforce_case`
    pub enforce_upper_case: bool,

    /// Standalone names such as `ID` must be qualified with the table name
    pub enforce_table_column_naming: bool,

    /// Words no identifier may be (case-insensitive)
    pub reserved_words: Vec<String>,
}

impl NamingRules {
    /// Case convention in force, honouring the uppercase override
    pub fn effective_case(&self) -> Option<CaseStyle> {
        if self.enforce_upper_case {
            Some(CaseStyle::Upper)
        } else {
            self.enforce_case
        }
    }

    /// Configured table prefix, ignoring blank strings
    pub fn table_prefix(&self) -> Option<&str> {
        self.table_prefix.as_deref().filter(|p| !p.is_empty())
    }

    /// Configured table suffix, ignoring blank strings
    pub fn table_suffix(&self) -> Option<&str> {
        self.table_suffix.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether `word` is reserved (case-insensitive)
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved_words
            .iter()
            .any(|reserved| reserved.trim().eq_ignore_ascii_case(word.trim()))
    }

    pub fn with_case(mut self, case: CaseStyle) -> Self {
        self.enforce_case = Some(case);
        self
    }

    pub fn with_table_affixes(mut self, prefix: Option<&str>, suffix: Option<&str>) -> Self {
        self.table_prefix = prefix.map(str::to_string);
        self.table_suffix = suffix.map(str::to_string);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_override_wins() {
        let rules = NamingRules {
            enforce_case: Some(CaseStyle::Pascal),
            enforce_upper_case: true,
            ..Default::default()
        };
        assert_eq!(rules.effective_case(), Some(CaseStyle::Upper));
    }

    #[test]
    fn blank_affixes_are_ignored() {
        let rules = NamingRules::default().with_table_affixes(Some(""), Some("_M"));
        assert_eq!(rules.table_prefix(), None);
        assert_eq!(rules.table_suffix(), Some("_M"));
    }

    #[test]
    fn reserved_words_match_case_insensitively() {
        let rules = NamingRules {
            reserved_words: vec!["ORDER".to_string(), "user".to_string()],
            ..Default::default()
        };
        assert!(rules.is_reserved("order"));
        assert!(rules.is_reserved("USER"));
        assert!(!rules.is_reserved("ORDERS"));
    }

    #[test]
    fn rules_deserialize_from_partial_toml() {
        let rules: NamingRules = toml::from_str(
            r#"
            enforce_case = "SNAKE"
            table_prefix = "TB_"
            "#,
        )
        .unwrap();

        assert_eq!(rules.enforce_case, Some(CaseStyle::Snake));
        assert_eq!(rules.table_prefix(), Some("TB_"));
        assert!(!rules.enforce_upper_case);
    }
}
