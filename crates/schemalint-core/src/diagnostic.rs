//! Rule codes, validation results and report findings
//!
//! IMPORTANT: Rule codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Rule code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCode {
    // Identifier rules
    /// Name is empty or whitespace
    NameRequired,

    /// Name exceeds the 128 character MSSQL identifier limit
    NameTooLong,

    /// Name is in the configured reserved word list
    ReservedWord,

    /// Name does not follow the enforced case convention
    CaseMismatch,

    /// Name does not match the configured regex
    PatternMismatch,

    /// Table name lacks the configured prefix and/or suffix
    AffixMismatch,

    /// Name is neither PascalCase nor UPPER_SNAKE_CASE (no rules configured)
    NamingConvention,

    /// Column name is a forbidden standalone name such as `ID`
    ForbiddenStandaloneName,

    /// Primary key column uses a forbidden standalone name
    PrimaryKeyForbiddenName,

    /// Primary key column name does not contain the table name
    PrimaryKeyMissingTableName,

    // Description rules
    /// Description is empty
    DescriptionRequired,

    /// Description just repeats the identifier
    DescriptionCopiesName,

    /// Description has no Korean text
    DescriptionNotLocalized,

    /// Long description without the `label || detail` convention
    DescriptionFormat,

    // Data type rules
    /// Length-bearing type without `max_length`
    LengthRequired,

    /// `max_length` is zero or above the type's ceiling
    LengthOutOfRange,

    /// DECIMAL/NUMERIC without precision
    PrecisionRequired,

    /// Precision outside 1..=38
    PrecisionOutOfRange,

    /// Scale above precision
    ScaleOutOfRange,

    /// IDENTITY on a non-integer column
    IdentityRequiresInteger,

    /// IDENTITY increment of zero
    IdentityIncrementZero,

    /// IDENTITY column marked nullable
    IdentityNullable,

    /// Primary key column marked nullable
    PrimaryKeyNullable,

    // Index rules
    /// Index name lacks the prefix derived from its type
    IndexPrefixMismatch,

    /// Index name does not contain the table name
    IndexMissingTableName,

    /// Index references no columns
    IndexNoColumns,

    /// Index references a column the table does not have
    IndexUnknownColumn,

    /// Index lists the same column twice
    IndexDuplicateColumn,

    /// Two indexes on one table share a name
    DuplicateIndexName,

    // Structural rules
    /// A required audit column is missing
    SystemColumnMissing,

    /// REG_DT does not default to GETDATE()
    SystemColumnDefault,

    /// Two columns in one table share a name
    DuplicateColumnName,

    /// Two tables in the project share a name
    DuplicateTableName,

    /// Table has no primary key
    PrimaryKeyMissing,

    /// Table has no columns
    TableNoColumns,

    /// Relationship points at a table or column that does not exist
    RelationshipUnknownTarget,

    // Configuration
    /// A configured regex does not compile
    RuleConfigInvalid,
}

impl RuleCode {
    /// Get the rule code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameRequired => "NAME_REQUIRED",
            Self::NameTooLong => "NAME_TOO_LONG",
            Self::ReservedWord => "RESERVED_WORD",
            Self::CaseMismatch => "CASE_MISMATCH",
            Self::PatternMismatch => "PATTERN_MISMATCH",
            Self::AffixMismatch => "AFFIX_MISMATCH",
            Self::NamingConvention => "NAMING_CONVENTION",
            Self::ForbiddenStandaloneName => "FORBIDDEN_STANDALONE_NAME",
            Self::PrimaryKeyForbiddenName => "PRIMARY_KEY_FORBIDDEN_NAME",
            Self::PrimaryKeyMissingTableName => "PRIMARY_KEY_MISSING_TABLE_NAME",
            Self::DescriptionRequired => "DESCRIPTION_REQUIRED",
            Self::DescriptionCopiesName => "DESCRIPTION_COPIES_NAME",
            Self::DescriptionNotLocalized => "DESCRIPTION_NOT_LOCALIZED",
            Self::DescriptionFormat => "DESCRIPTION_FORMAT",
            Self::LengthRequired => "LENGTH_REQUIRED",
            Self::LengthOutOfRange => "LENGTH_OUT_OF_RANGE",
            Self::PrecisionRequired => "PRECISION_REQUIRED",
            Self::PrecisionOutOfRange => "PRECISION_OUT_OF_RANGE",
            Self::ScaleOutOfRange => "SCALE_OUT_OF_RANGE",
            Self::IdentityRequiresInteger => "IDENTITY_REQUIRES_INTEGER",
            Self::IdentityIncrementZero => "IDENTITY_INCREMENT_ZERO",
            Self::IdentityNullable => "IDENTITY_NULLABLE",
            Self::PrimaryKeyNullable => "PRIMARY_KEY_NULLABLE",
            Self::IndexPrefixMismatch => "INDEX_PREFIX_MISMATCH",
            Self::IndexMissingTableName => "INDEX_MISSING_TABLE_NAME",
            Self::IndexNoColumns => "INDEX_NO_COLUMNS",
            Self::IndexUnknownColumn => "INDEX_UNKNOWN_COLUMN",
            Self::IndexDuplicateColumn => "INDEX_DUPLICATE_COLUMN",
            Self::DuplicateIndexName => "DUPLICATE_INDEX_NAME",
            Self::SystemColumnMissing => "SYSTEM_COLUMN_MISSING",
            Self::SystemColumnDefault => "SYSTEM_COLUMN_DEFAULT",
            Self::DuplicateColumnName => "DUPLICATE_COLUMN_NAME",
            Self::DuplicateTableName => "DUPLICATE_TABLE_NAME",
            Self::PrimaryKeyMissing => "PRIMARY_KEY_MISSING",
            Self::TableNoColumns => "TABLE_NO_COLUMNS",
            Self::RelationshipUnknownTarget => "RELATIONSHIP_UNKNOWN_TARGET",
            Self::RuleConfigInvalid => "RULE_CONFIG_INVALID",
        }
    }

    /// Severity a finding gets before configuration overrides
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::DescriptionFormat => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for RuleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Should be reviewed but does not make the project invalid
    Warn,

    /// Makes the project invalid
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Kind of entity a finding is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    Table,
    Column,
    Index,
    Relationship,
    Project,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "TABLE"),
            Self::Column => write!(f, "COLUMN"),
            Self::Index => write!(f, "INDEX"),
            Self::Relationship => write!(f, "RELATIONSHIP"),
            Self::Project => write!(f, "PROJECT"),
        }
    }
}

/// Entity field a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Description,
    DataType,
    PrimaryKey,
    Identity,
    Nullable,
    DefaultValue,
    Columns,
    SystemColumns,
    Reference,
    Rules,
}

/// Outcome of a single rule check
///
/// `suggestion` is only present when a deterministic fix exists. A valid
/// result may still carry a suggestion (soft rules).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Rule that produced this result; `None` for a clean pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleCode>,
}

impl ValidationResult {
    /// Clean pass
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            message: "유효합니다".to_string(),
            suggestion: None,
            rule: None,
        }
    }

    /// Failed check
    pub fn fail(rule: RuleCode, message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            suggestion: None,
            rule: Some(rule),
        }
    }

    /// Pass that still recommends a change
    pub fn annotated(rule: RuleCode, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
            suggestion: Some(suggestion.into()),
            rule: Some(rule),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach a suggestion only when one exists
    pub fn with_optional_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// True for failures and for annotated passes
    pub fn is_finding(&self) -> bool {
        !self.is_valid || self.rule.is_some()
    }
}

/// A report entry (ValidationError / ValidationWarning)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,

    pub entity: EntityKind,

    /// Caller-assigned id, or a name-derived key when the entity has none
    pub entity_id: String,

    pub entity_name: String,

    /// Owning table (for columns and indexes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    pub field: Field,

    pub rule: RuleCode,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ValidationIssue {
    /// Create an issue with the rule's default severity
    pub fn new(
        rule: RuleCode,
        entity: EntityKind,
        entity_id: impl Into<String>,
        entity_name: impl Into<String>,
        field: Field,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: rule.default_severity(),
            entity,
            entity_id: entity_id.into(),
            entity_name: entity_name.into(),
            table_name: None,
            field,
            rule,
            message: message.into(),
            suggestion: None,
            expected: None,
            actual: None,
        }
    }

    /// Lift a rule result into an issue; `None` for a clean pass
    pub fn from_result(
        result: &ValidationResult,
        entity: EntityKind,
        entity_id: &str,
        entity_name: &str,
        field: Field,
    ) -> Option<Self> {
        let rule = result.rule?;
        let mut issue = Self::new(rule, entity, entity_id, entity_name, field, result.message.clone());
        if result.is_valid {
            issue.severity = Severity::Warn;
        }
        issue.suggestion = result.suggestion.clone();
        Some(issue)
    }

    pub fn with_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Set expected/actual values
    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Bracketed Korean label used in the flat message list
    pub fn label(&self) -> &'static str {
        match (self.entity, self.field) {
            (_, Field::Rules) => "명명 규칙",
            (_, Field::SystemColumns) => "시스템 컬럼",
            (EntityKind::Column, Field::DefaultValue) => "시스템 컬럼",
            (EntityKind::Table, Field::Name) => "테이블명",
            (EntityKind::Table, Field::Description) => "테이블 설명",
            (EntityKind::Table, Field::PrimaryKey) => "기본키",
            (EntityKind::Table, _) => "테이블 구성",
            (EntityKind::Column, Field::Name) => "컬럼명",
            (EntityKind::Column, Field::Description) => "컬럼 설명",
            (EntityKind::Column, Field::DataType) => "데이터 타입",
            (EntityKind::Column, _) => "컬럼 속성",
            (EntityKind::Index, Field::Name) => "인덱스명",
            (EntityKind::Index, _) => "인덱스 컬럼",
            (EntityKind::Relationship, _) => "관계",
            (EntityKind::Project, _) => "프로젝트",
        }
    }

    /// `TABLE`, `TABLE.COLUMN` or `TABLE.INDEX`
    pub fn location(&self) -> String {
        match &self.table_name {
            Some(table) if self.entity != EntityKind::Table => format!("{}.{}", table, self.entity_name),
            _ => self.entity_name.clone(),
        }
    }

    /// `[label] location: message`
    pub fn to_message(&self) -> String {
        format!("[{}] {}: {}", self.label(), self.location(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_code_stability() {
        assert_eq!(RuleCode::PrimaryKeyForbiddenName.as_str(), "PRIMARY_KEY_FORBIDDEN_NAME");
        assert_eq!(RuleCode::SystemColumnMissing.as_str(), "SYSTEM_COLUMN_MISSING");
        assert_eq!(RuleCode::RuleConfigInvalid.to_string(), "RULE_CONFIG_INVALID");
    }

    #[test]
    fn serde_names_match_as_str() {
        let json = serde_json::to_string(&RuleCode::IndexPrefixMismatch).unwrap();
        assert_eq!(json, format!("\"{}\"", RuleCode::IndexPrefixMismatch.as_str()));
    }

    #[test]
    fn annotated_result_becomes_warning() {
        let result = ValidationResult::annotated(RuleCode::DescriptionFormat, "형식 권장", "한글명 || 상세설명");
        assert!(result.is_valid);
        assert!(result.is_finding());

        let issue = ValidationIssue::from_result(&result, EntityKind::Column, "c1", "NAME", Field::Description)
            .unwrap();
        assert_eq!(issue.severity, Severity::Warn);
        assert_eq!(issue.suggestion.as_deref(), Some("한글명 || 상세설명"));
    }

    #[test]
    fn clean_pass_is_not_an_issue() {
        let issue = ValidationIssue::from_result(&ValidationResult::ok(), EntityKind::Table, "t", "T", Field::Name);
        assert!(issue.is_none());
    }

    #[test]
    fn message_prefixes() {
        let issue = ValidationIssue::new(
            RuleCode::PrimaryKeyForbiddenName,
            EntityKind::Column,
            "c1",
            "ID",
            Field::Name,
            "단독 이름은 사용할 수 없습니다",
        )
        .with_table("USER");

        assert_eq!(issue.to_message(), "[컬럼명] USER.ID: 단독 이름은 사용할 수 없습니다");

        let table_issue = ValidationIssue::new(
            RuleCode::SystemColumnMissing,
            EntityKind::Table,
            "t1",
            "USER",
            Field::SystemColumns,
            "누락",
        );
        assert!(table_issue.to_message().starts_with("[시스템 컬럼] USER:"));
    }

    #[test]
    fn issue_serialization() {
        let issue = ValidationIssue::new(
            RuleCode::CaseMismatch,
            EntityKind::Table,
            "t1",
            "user",
            Field::Name,
            "대문자여야 합니다",
        )
        .with_suggestion("USER");

        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("CASE_MISMATCH"));
        assert!(json.contains("\"entity\":\"TABLE\""));
        assert!(json.contains("\"severity\":\"error\""));
    }
}
