//! Configuration schema (schemalint.toml)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::diagnostic::{RuleCode, Severity};
use crate::rules::NamingRules;

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// MSSQL DDL script
    #[default]
    Sql,

    /// Structural JSON dump
    Json,

    /// Markdown documentation
    Markdown,

    /// Standalone HTML documentation
    Html,

    /// Flat row-per-column CSV
    Csv,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Html => "html",
            Self::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Sql => "application/sql",
            Self::Json => "application/json",
            Self::Markdown => "text/markdown",
            Self::Html => "text/html",
            Self::Csv => "text/csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sql => write!(f, "sql"),
            Self::Json => write!(f, "json"),
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Severity overrides for specific rule codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of rule code to severity override
    #[serde(default)]
    pub overrides: BTreeMap<String, Severity>,
}

impl SeverityThreshold {
    /// Get severity for a rule code, or default
    pub fn get_severity(&self, code: RuleCode, default: Severity) -> Severity {
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or(default)
    }

    /// Set severity override for a code
    pub fn set_override(&mut self, code: RuleCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }
}

/// Allowlist rules for specific tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowlistRules {
    /// Completely skip checks for these tables (glob patterns)
    #[serde(default)]
    pub skip_tables: Vec<String>,

    /// Tables exempt from the REG_ID/REG_DT/CHG_ID/CHG_DT requirement (glob patterns)
    #[serde(default)]
    pub allow_missing_system_columns: Vec<String>,
}

impl AllowlistRules {
    /// Check if a table matches any pattern in the list
    fn matches_pattern(table: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, table)
            } else {
                pattern.eq_ignore_ascii_case(table)
            }
        })
    }

    /// Check if a table should be skipped
    pub fn is_table_skipped(&self, table: &str) -> bool {
        Self::matches_pattern(table, &self.skip_tables)
    }

    /// Check if a table may omit system columns
    pub fn are_system_columns_optional(&self, table: &str) -> bool {
        Self::matches_pattern(table, &self.allow_missing_system_columns)
    }
}

/// Default export toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    pub format: ExportFormat,
    pub include_comments: bool,
    pub include_indexes: bool,
    pub include_constraints: bool,
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            format: ExportFormat::Sql,
            include_comments: true,
            include_indexes: true,
            include_constraints: true,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Naming rules; overrides the project's own rules when present
    #[serde(default)]
    pub naming: Option<NamingRules>,

    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Allowlist rules
    #[serde(default)]
    pub allowlist: AllowlistRules,

    /// Export defaults
    #[serde(default)]
    pub export: ExportDefaults,

    /// Directory the config was loaded from
    #[serde(skip)]
    pub project_root: std::path::PathBuf,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Rules in force for a project: config first, then the project's own
    pub fn resolve_rules<'a>(&'a self, project_rules: Option<&'a NamingRules>) -> Option<&'a NamingRules> {
        self.naming.as_ref().or(project_rules)
    }
}

/// Simple glob matching (single `*` wildcard, case-insensitive)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    let pattern = pattern.to_ascii_uppercase();
    let text = text.to_ascii_uppercase();

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::CaseStyle;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.naming.is_none());
        assert_eq!(config.export.format, ExportFormat::Sql);
        assert!(config.export.include_indexes);
    }

    #[test]
    fn severity_override() {
        let mut threshold = SeverityThreshold::default();
        threshold.set_override(RuleCode::SystemColumnMissing, Severity::Warn);

        assert_eq!(
            threshold.get_severity(RuleCode::SystemColumnMissing, Severity::Error),
            Severity::Warn
        );
        assert_eq!(
            threshold.get_severity(RuleCode::CaseMismatch, Severity::Error),
            Severity::Error
        );
    }

    #[test]
    fn allowlist_pattern_matching() {
        let rules = AllowlistRules {
            skip_tables: vec!["TMP_*".to_string(), "LEGACY".to_string()],
            allow_missing_system_columns: vec!["*_CODE".to_string()],
        };

        assert!(rules.is_table_skipped("TMP_IMPORT"));
        assert!(rules.is_table_skipped("legacy"));
        assert!(!rules.is_table_skipped("USER"));
        assert!(rules.are_system_columns_optional("COMMON_CODE"));
        assert!(!rules.are_system_columns_optional("CODE_GROUP"));
    }

    #[test]
    fn full_toml_document() {
        let config = Config::from_toml(
            r#"
            [naming]
            enforce_upper_case = true
            table_prefix = "TB_"
            reserved_words = ["USER", "ORDER"]

            [severity.overrides]
            SYSTEM_COLUMN_DEFAULT = "warn"

            [allowlist]
            skip_tables = ["TMP_*"]

            [export]
            format = "markdown"
            include_constraints = false
            "#,
        )
        .unwrap();

        let naming = config.naming.as_ref().unwrap();
        assert_eq!(naming.effective_case(), Some(CaseStyle::Upper));
        assert_eq!(naming.reserved_words.len(), 2);
        assert_eq!(
            config.severity.get_severity(RuleCode::SystemColumnDefault, Severity::Error),
            Severity::Warn
        );
        assert_eq!(config.export.format, ExportFormat::Markdown);
        assert!(config.export.include_comments);
        assert!(!config.export.include_constraints);
    }

    #[test]
    fn config_rules_override_project_rules() {
        let project_rules = NamingRules::default().with_case(CaseStyle::Snake);
        let config = Config::default();
        assert_eq!(config.resolve_rules(Some(&project_rules)), Some(&project_rules));

        let config = Config {
            naming: Some(NamingRules::default().with_case(CaseStyle::Pascal)),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_rules(Some(&project_rules)).and_then(|r| r.enforce_case),
            Some(CaseStyle::Pascal)
        );
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.export, parsed.export);
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("TMP_*", "tmp_users"));
        assert!(glob_match("*_HIST", "ORDER_HIST"));
        assert!(!glob_match("TMP_*", "USERS"));
    }
}
