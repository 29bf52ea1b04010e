//! Project-wide validation
//!
//! Runs every entity validator over every entity of a project, adds the
//! checks that need more than one entity (system columns, duplicates,
//! relationships), and never stops at the first failure.
//!
//! [`ProjectValidator::collect`] is the single check set. The structured
//! report and the flat message list are both derived from it.

use std::collections::BTreeSet;

use schemalint_core::{
    AllowlistRules, Config, EntityKind, Field, NamingRules, Project, RuleCode, SeverityThreshold, Table,
    ValidationIssue, ValidationReport, ValidationResult,
};
use tracing::{debug, info, warn};

use crate::column::{validate_column_description, validate_column_name, validate_column_structure};
use crate::datatype::validate_data_type_properties;
use crate::error::RuleError;
use crate::index::{validate_index_columns, validate_index_name};
use crate::primitives::compile_pattern;
use crate::table::{validate_table_description, validate_table_name};

/// Audit columns every table must carry, in canonical order
pub const SYSTEM_COLUMNS: [&str; 4] = ["REG_ID", "REG_DT", "CHG_ID", "CHG_DT"];

/// Required default expression of `REG_DT`
pub const REG_DT_DEFAULT: &str = "GETDATE()";

/// System columns missing from `table`, in canonical order
///
/// Matching is case-insensitive.
pub fn validate_system_columns(table: &Table) -> Vec<&'static str> {
    SYSTEM_COLUMNS
        .iter()
        .copied()
        .filter(|name| table.find_column(name).is_none())
        .collect()
}

/// Validate a project with its own rules and no configuration
pub fn validate_project(project: &Project) -> ValidationReport {
    ProjectValidator::new().validate(project)
}

/// Who a finding is about
struct Subject<'a> {
    entity: EntityKind,
    id: String,
    name: &'a str,
    table: Option<&'a str>,
}

impl<'a> Subject<'a> {
    fn new(entity: EntityKind, id: &str, fallback_id: impl Into<String>, name: &'a str) -> Self {
        Self {
            entity,
            id: if id.is_empty() { fallback_id.into() } else { id.to_string() },
            name,
            table: None,
        }
    }

    fn in_table(mut self, table: &'a str) -> Self {
        self.table = Some(table);
        self
    }

    fn attach(&self, mut issue: ValidationIssue) -> ValidationIssue {
        if let Some(table) = self.table {
            issue = issue.with_table(table);
        }
        issue
    }

    fn from_result(&self, result: &ValidationResult, field: Field) -> Option<ValidationIssue> {
        ValidationIssue::from_result(result, self.entity, &self.id, self.name, field).map(|i| self.attach(i))
    }

    fn finding(&self, rule: RuleCode, field: Field, message: impl Into<String>) -> ValidationIssue {
        self.attach(ValidationIssue::new(rule, self.entity, &self.id, self.name, field, message))
    }
}

/// Accumulates findings for one run
struct Collector<'p> {
    project: &'p Project,
    issues: Vec<ValidationIssue>,
    reported_patterns: BTreeSet<String>,
}

impl<'p> Collector<'p> {
    fn new(project: &'p Project) -> Self {
        Self {
            project,
            issues: Vec::new(),
            reported_patterns: BTreeSet::new(),
        }
    }

    fn push(&mut self, issue: Option<ValidationIssue>) {
        if let Some(issue) = issue {
            self.issues.push(issue);
        }
    }

    /// Record a rule configuration problem once per offending pattern
    fn config_error(&mut self, error: &RuleError) {
        if !self.reported_patterns.insert(error.pattern().to_string()) {
            return;
        }

        warn!("Invalid naming rule: {}", error);

        let project = self.project;
        let subject = Subject::new(EntityKind::Project, &project.id, project.name.clone(), &project.name);
        self.issues.push(
            subject
                .finding(RuleCode::RuleConfigInvalid, Field::Rules, format!("명명 규칙 설정 오류: {}", error))
                .with_suggestion("정규식 패턴을 확인해주세요"),
        );
    }

    /// Lift a validator result, turning configuration errors into findings
    fn settle(
        &mut self,
        result: Result<ValidationResult, RuleError>,
        subject: &Subject<'_>,
        field: Field,
    ) {
        match result {
            Ok(result) => {
                let issue = subject.from_result(&result, field);
                self.push(issue);
            }
            Err(error) => self.config_error(&error),
        }
    }
}

/// Project validator
///
/// Holds the configuration-level knobs: a rule override (which wins over the
/// project's own rules), severity overrides and the table allowlists.
#[derive(Debug, Clone, Default)]
pub struct ProjectValidator {
    rules_override: Option<NamingRules>,
    severity: SeverityThreshold,
    allowlist: AllowlistRules,
}

impl ProjectValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            rules_override: config.naming.clone(),
            severity: config.severity.clone(),
            allowlist: config.allowlist.clone(),
        }
    }

    pub fn with_rules(mut self, rules: NamingRules) -> Self {
        self.rules_override = Some(rules);
        self
    }

    pub fn with_severity(mut self, severity: SeverityThreshold) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_allowlist(mut self, allowlist: AllowlistRules) -> Self {
        self.allowlist = allowlist;
        self
    }

    /// Rules in force for `project`
    pub fn effective_rules<'a>(&'a self, project: &'a Project) -> Option<&'a NamingRules> {
        self.rules_override.as_ref().or(project.naming_rules.as_ref())
    }

    /// Every finding for `project`, in table order
    pub fn collect(&self, project: &Project) -> Vec<ValidationIssue> {
        let mut collector = Collector::new(project);

        // Broken patterns are reported once, then left out of the run
        let rules = self.effective_rules(project).cloned().map(|mut rules| {
            for (entity, slot) in [
                (EntityKind::Table, &mut rules.table_pattern),
                (EntityKind::Column, &mut rules.column_pattern),
                (EntityKind::Index, &mut rules.index_pattern),
            ] {
                let error = slot.as_deref().and_then(|pattern| compile_pattern(pattern, entity).err());
                if let Some(error) = error {
                    collector.config_error(&error);
                    *slot = None;
                }
            }
            rules
        });

        let mut table_names = BTreeSet::new();
        for table in &project.tables {
            if self.allowlist.is_table_skipped(&table.name) {
                debug!("Skipping allowlisted table {}", table.name);
                continue;
            }

            debug!("Validating table {}", table.name);

            if !table_names.insert(table.name.to_uppercase()) {
                let subject = Subject::new(EntityKind::Table, &table.id, table.name.clone(), &table.name);
                collector.issues.push(subject.finding(
                    RuleCode::DuplicateTableName,
                    Field::Name,
                    format!("테이블명 '{}'이(가) 중복되었습니다", table.name),
                ));
            }

            self.check_table(table, rules.as_ref(), &mut collector);
        }

        check_relationships(project, &mut collector);

        let mut issues = collector.issues;
        for issue in &mut issues {
            issue.severity = self.severity.get_severity(issue.rule, issue.severity);
        }
        issues
    }

    fn check_table(&self, table: &Table, rules: Option<&NamingRules>, collector: &mut Collector<'_>) {
        let subject = Subject::new(EntityKind::Table, &table.id, table.name.clone(), &table.name);

        collector.settle(validate_table_name(&table.name, rules), &subject, Field::Name);
        collector.push(subject.from_result(
            &validate_table_description(&table.name, &table.description),
            Field::Description,
        ));

        if table.columns.is_empty() {
            collector.issues.push(subject.finding(
                RuleCode::TableNoColumns,
                Field::Columns,
                "테이블에는 최소 1개의 컬럼이 필요합니다",
            ));
        } else if table.primary_key_columns().is_empty() {
            collector.issues.push(subject.finding(
                RuleCode::PrimaryKeyMissing,
                Field::PrimaryKey,
                "기본키(Primary Key)가 설정되지 않았습니다",
            ));
        }

        if !self.allowlist.are_system_columns_optional(&table.name) {
            for missing in validate_system_columns(table) {
                collector.issues.push(
                    subject
                        .finding(
                            RuleCode::SystemColumnMissing,
                            Field::SystemColumns,
                            format!("필수 시스템 컬럼 {}이(가) 없습니다", missing),
                        )
                        .with_suggestion(missing),
                );
            }
        }

        let mut column_names = BTreeSet::new();
        for column in table.ordered_columns() {
            let subject = Subject::new(
                EntityKind::Column,
                &column.id,
                format!("{}.{}", table.name, column.name),
                &column.name,
            )
            .in_table(&table.name);

            if !column_names.insert(column.name.to_uppercase()) {
                collector.issues.push(subject.finding(
                    RuleCode::DuplicateColumnName,
                    Field::Name,
                    format!("컬럼명 '{}'이(가) 중복되었습니다", column.name),
                ));
            }

            collector.settle(
                validate_column_name(&column.name, &table.name, column.primary_key, rules),
                &subject,
                Field::Name,
            );
            collector.push(subject.from_result(
                &validate_column_description(&column.name, &column.description),
                Field::Description,
            ));
            collector.push(subject.from_result(
                &validate_data_type_properties(column.data_type, column.max_length, column.precision, column.scale),
                Field::DataType,
            ));
            for (field, result) in validate_column_structure(column) {
                collector.push(subject.from_result(&result, field));
            }

            if column.name.eq_ignore_ascii_case("REG_DT") {
                let actual = column.default_value.as_deref().map(str::trim).unwrap_or("");
                if actual != REG_DT_DEFAULT {
                    collector.issues.push(
                        subject
                            .finding(
                                RuleCode::SystemColumnDefault,
                                Field::DefaultValue,
                                format!("REG_DT의 기본값은 {}이어야 합니다", REG_DT_DEFAULT),
                            )
                            .with_suggestion(REG_DT_DEFAULT)
                            .with_comparison(REG_DT_DEFAULT, if actual.is_empty() { "(없음)" } else { actual }),
                    );
                }
            }
        }

        let mut index_names = BTreeSet::new();
        for index in &table.indexes {
            let subject = Subject::new(
                EntityKind::Index,
                &index.id,
                format!("{}.{}", table.name, index.name),
                &index.name,
            )
            .in_table(&table.name);

            if !index_names.insert(index.name.to_uppercase()) {
                collector.issues.push(subject.finding(
                    RuleCode::DuplicateIndexName,
                    Field::Name,
                    format!("인덱스명 '{}'이(가) 중복되었습니다", index.name),
                ));
            }

            collector.settle(
                validate_index_name(
                    &index.name,
                    &table.name,
                    index.index_type,
                    index.unique,
                    &index.column_names(),
                    rules,
                ),
                &subject,
                Field::Name,
            );
            for result in validate_index_columns(index, table) {
                collector.push(subject.from_result(&result, Field::Columns));
            }
        }
    }

    /// Structured report
    pub fn validate(&self, project: &Project) -> ValidationReport {
        let issues = self.collect(project);

        let tables: Vec<&Table> = project
            .tables
            .iter()
            .filter(|t| !self.allowlist.is_table_skipped(&t.name))
            .collect();
        let columns = tables.iter().map(|t| t.columns.len()).sum();
        let indexes = tables.iter().map(|t| t.indexes.len()).sum();

        let report = ValidationReport::from_issues(project.name.clone(), issues, tables.len(), columns, indexes);

        info!(
            "Validated project '{}': {} error(s), {} warning(s), score {}",
            project.name, report.summary.errors, report.summary.warnings, report.summary.compliance_score
        );

        report
    }

    /// Flat `[label] location: message` list of every error
    pub fn messages(&self, project: &Project) -> Vec<String> {
        self.validate(project).messages()
    }
}

fn check_relationships(project: &Project, collector: &mut Collector<'_>) {
    for relationship in &project.relationships {
        let name = relationship.constraint_name();
        let subject = Subject::new(EntityKind::Relationship, "", name.clone(), &name);

        let ends = [
            (&relationship.from_table, &relationship.from_column),
            (&relationship.to_table, &relationship.to_column),
        ];
        for (table_name, column_name) in ends {
            let message = match project.find_table(table_name) {
                None => format!("참조 테이블 '{}'이(가) 없습니다", table_name),
                Some(table) if table.find_column(column_name).is_none() => {
                    format!("참조 컬럼 '{}.{}'이(가) 없습니다", table_name, column_name)
                }
                Some(_) => continue,
            };
            collector
                .issues
                .push(subject.finding(RuleCode::RelationshipUnknownTarget, Field::Reference, message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalint_core::{Column, DataType, Index, IndexType, Relationship, Severity};

    fn audited(table: Table) -> Table {
        table
            .with_column(Column::new("REG_ID", DataType::VarChar).with_length(20).with_description("등록자"))
            .with_column(
                Column::new("REG_DT", DataType::DateTime)
                    .with_default("GETDATE()")
                    .with_description("등록일시"),
            )
            .with_column(Column::new("CHG_ID", DataType::VarChar).with_length(20).with_description("수정자"))
            .with_column(Column::new("CHG_DT", DataType::DateTime).with_description("수정일시"))
    }

    fn user_table() -> Table {
        audited(
            Table::new("USER")
                .with_description("사용자")
                .with_column(
                    Column::new("USER_ID", DataType::Int)
                        .primary_key()
                        .with_identity(1, 1)
                        .with_description("사용자 ID"),
                )
                .with_column(Column::new("USER_NAME", DataType::NVarChar).with_length(50).with_description("이름")),
        )
        .with_index(Index::new("PK__USER__USER_ID", IndexType::Clustered, true).with_column("USER_ID"))
    }

    #[test]
    fn clean_project_scores_100() {
        let project = Project::new("demo").with_table(user_table());
        let report = validate_project(&project);
        assert!(report.is_valid(), "{:?}", report.messages());
        assert!(report.warnings.is_empty());
        assert_eq!(report.summary.compliance_score, 100);
        assert_eq!(report.summary.tables_checked, 1);
        assert_eq!(report.summary.columns_checked, 6);
        assert_eq!(report.summary.indexes_checked, 1);
    }

    #[test]
    fn nullable_identity_column_is_an_error() {
        let mut seq = Column::new("USER_SEQ", DataType::BigInt)
            .with_identity(1, 1)
            .with_description("사용자 순번");
        seq.nullable = true;
        let project = Project::new("demo").with_table(user_table().with_column(seq));

        let report = validate_project(&project);
        assert_eq!(report.errors.len(), 1, "{:?}", report.messages());
        assert_eq!(report.errors[0].rule, RuleCode::IdentityNullable);
        assert_eq!(report.errors[0].entity_name, "USER_SEQ");
        assert!(report.messages()[0].starts_with("[컬럼 속성] USER.USER_SEQ:"));
    }

    #[test]
    fn missing_system_columns_exact_subset() {
        let table = Table::new("USER")
            .with_column(Column::new("USER_ID", DataType::Int).primary_key())
            .with_column(Column::new("reg_dt", DataType::DateTime).with_default("GETDATE()"))
            .with_column(Column::new("CHG_ID", DataType::VarChar).with_length(20));
        assert_eq!(validate_system_columns(&table), vec!["REG_ID", "CHG_DT"]);

        let complete = user_table();
        assert!(validate_system_columns(&complete).is_empty());
    }

    #[test]
    fn system_column_findings_listed_by_name() {
        let table = Table::new("USER")
            .with_description("사용자")
            .with_column(Column::new("USER_ID", DataType::Int).primary_key().with_description("사용자 ID"));
        let messages = ProjectValidator::new().messages(&Project::new("p").with_table(table));

        let system: Vec<_> = messages.iter().filter(|m| m.starts_with("[시스템 컬럼]")).collect();
        assert_eq!(system.len(), 4);
        assert!(system[0].contains("REG_ID"));
        assert!(system[3].contains("CHG_DT"));
    }

    #[test]
    fn reg_dt_default_must_be_getdate() {
        let mut table = user_table();
        for column in &mut table.columns {
            if column.name == "REG_DT" {
                column.default_value = Some("SYSDATETIME()".to_string());
            }
        }
        let report = validate_project(&Project::new("p").with_table(table));
        let issue = report
            .errors
            .iter()
            .find(|i| i.rule == RuleCode::SystemColumnDefault)
            .unwrap();
        assert_eq!(issue.expected.as_deref(), Some("GETDATE()"));
        assert_eq!(issue.actual.as_deref(), Some("SYSDATETIME()"));
        assert_eq!(issue.suggestion.as_deref(), Some("GETDATE()"));
        assert_eq!(issue.entity_id, "USER.REG_DT");
    }

    #[test]
    fn structural_findings_do_not_stop_the_run() {
        let table = audited(
            Table::new("ORDER")
                .with_description("주문")
                .with_column(Column::new("ORDER_NAME", DataType::VarChar).with_description("주문명"))
                .with_column(Column::new("order_name", DataType::VarChar).with_length(10).with_description("주문명2")),
        )
        .with_index(Index::new("IDX__ORDER", IndexType::Nonclustered, false))
        .with_index(Index::new("idx__order", IndexType::Nonclustered, false).with_column("MISSING"));

        let report = validate_project(&Project::new("p").with_table(table));
        let rules: BTreeSet<_> = report.errors.iter().map(|i| i.rule).collect();

        for expected in [
            RuleCode::PrimaryKeyMissing,
            RuleCode::LengthRequired,
            RuleCode::DuplicateColumnName,
            RuleCode::NamingConvention,
            RuleCode::IndexNoColumns,
            RuleCode::IndexUnknownColumn,
            RuleCode::DuplicateIndexName,
        ] {
            assert!(rules.contains(&expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn empty_table_has_no_columns_finding() {
        let table = Table::new("EMPTY").with_description("빈 테이블");
        let report = ProjectValidator::new()
            .with_allowlist(AllowlistRules {
                allow_missing_system_columns: vec!["*".to_string()],
                ..Default::default()
            })
            .validate(&Project::new("p").with_table(table));
        let rules: Vec<_> = report.errors.iter().map(|i| i.rule).collect();
        assert_eq!(rules, vec![RuleCode::TableNoColumns]);
    }

    #[test]
    fn duplicate_tables_and_relationships() {
        let project = Project::new("p")
            .with_table(user_table())
            .with_table(user_table())
            .with_relationship(Relationship::new("USER", "USER_ID", "ACCOUNT", "USER_ID"))
            .with_relationship(Relationship::new("USER", "NOPE", "USER", "USER_ID"));

        let report = validate_project(&project);
        let duplicate = report.errors.iter().filter(|i| i.rule == RuleCode::DuplicateTableName).count();
        assert_eq!(duplicate, 1);

        let unknown: Vec<_> = report
            .errors
            .iter()
            .filter(|i| i.rule == RuleCode::RelationshipUnknownTarget)
            .collect();
        assert_eq!(unknown.len(), 2);
        assert!(unknown[0].message.contains("ACCOUNT"));
        assert!(unknown[1].message.contains("USER.NOPE"));
    }

    #[test]
    fn invalid_pattern_reported_once() {
        let rules = NamingRules {
            column_pattern: Some("([A-Z".to_string()),
            ..Default::default()
        };
        let project = Project::new("p").with_rules(rules).with_table(user_table()).with_table(
            audited(
                Table::new("ITEM")
                    .with_description("품목")
                    .with_column(Column::new("ITEM_ID", DataType::Int).primary_key().with_description("품목 ID")),
            ),
        );

        let report = validate_project(&project);
        let config: Vec<_> = report
            .errors
            .iter()
            .filter(|i| i.rule == RuleCode::RuleConfigInvalid)
            .collect();
        assert_eq!(config.len(), 1);
        assert_eq!(config[0].entity, EntityKind::Project);
        assert!(config[0].to_message().starts_with("[명명 규칙]"));
        // The rest of the run is unaffected
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn config_overrides_and_allowlist() {
        let mut severity = SeverityThreshold::default();
        severity.set_override(RuleCode::SystemColumnMissing, Severity::Warn);

        let table = Table::new("TMP_LOAD")
            .with_description("임시 적재")
            .with_column(Column::new("TMP_LOAD_ID", DataType::Int).primary_key().with_description("키"));
        let project = Project::new("p").with_table(table.clone());

        let report = ProjectValidator::new().with_severity(severity).validate(&project);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 4);
        assert!(report.summary.compliance_score < 100);

        let skipped = ProjectValidator::new()
            .with_allowlist(AllowlistRules {
                skip_tables: vec!["TMP_*".to_string()],
                ..Default::default()
            })
            .validate(&project);
        assert!(skipped.is_valid());
        assert_eq!(skipped.summary.tables_checked, 0);
    }

    #[test]
    fn config_rules_win_over_project_rules() {
        let config = Config {
            naming: Some(NamingRules {
                enforce_case: Some(schemalint_core::CaseStyle::Lower),
                ..Default::default()
            }),
            ..Default::default()
        };
        let project = Project::new("p")
            .with_rules(NamingRules {
                enforce_upper_case: true,
                ..Default::default()
            })
            .with_table(user_table());

        let report = ProjectValidator::from_config(&config).validate(&project);
        assert!(report.errors.iter().any(|i| i.rule == RuleCode::CaseMismatch));
    }

    #[test]
    fn long_descriptions_are_warnings() {
        let mut table = user_table();
        table.columns[1].description = "사용자가 가입할 때 입력한 이름으로 화면 상단에 표시되는 값".to_string();
        let report = validate_project(&Project::new("p").with_table(table));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].rule, RuleCode::DescriptionFormat);
        assert_eq!(report.warnings[0].severity, Severity::Warn);
    }
}
