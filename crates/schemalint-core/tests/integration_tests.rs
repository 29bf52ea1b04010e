//! Integration tests for config and project loading

use pretty_assertions::assert_eq;
use schemalint_core::{
    CaseStyle, Config, DataType, ExportFormat, IndexType, NamingRules, Project, ReferentialAction, RuleCode,
    Severity,
};

const CONFIG: &str = r#"
[naming]
enforce_upper_case = true
enforce_table_column_naming = true
table_prefix = "TB_"
reserved_words = ["USER", "ORDER"]
column_pattern = "[A-Z][A-Z0-9_]*"

[severity.overrides]
SYSTEM_COLUMN_MISSING = "warn"

[allowlist]
skip_tables = ["TMP_*"]
allow_missing_system_columns = ["CODE_*", "SETTING"]

[export]
format = "markdown"
include_constraints = false
"#;

const PROJECT: &str = r#"{
  "name": "shop",
  "naming_rules": { "enforce_case": "PASCAL" },
  "tables": [
    {
      "name": "TB_MEMBER",
      "description": "회원",
      "columns": [
        { "name": "MEMBER_ID", "data_type": "bigint", "primary_key": true, "nullable": false, "order_index": 1 },
        { "name": "NAME", "data_type": "NVARCHAR", "max_length": 50, "order_index": 2 }
      ],
      "indexes": [
        { "name": "IDX__TB_MEMBER__NAME", "index_type": "NONCLUSTERED", "columns": [{ "column_name": "NAME" }] }
      ]
    }
  ],
  "relationships": [
    {
      "from_table": "TB_MEMBER", "from_column": "MEMBER_ID",
      "to_table": "TB_MEMBER", "to_column": "MEMBER_ID",
      "on_delete": "NO_ACTION"
    }
  ]
}"#;

#[test]
fn test_full_config_from_toml() {
    let config = Config::from_toml(CONFIG).unwrap();

    let naming = config.naming.as_ref().unwrap();
    assert!(naming.enforce_upper_case);
    assert_eq!(naming.table_prefix(), Some("TB_"));
    assert!(naming.is_reserved("user"));
    assert_eq!(naming.effective_case(), Some(CaseStyle::Upper));

    assert_eq!(
        config.severity.get_severity(RuleCode::SystemColumnMissing, Severity::Error),
        Severity::Warn
    );
    assert_eq!(
        config.severity.get_severity(RuleCode::TableNoColumns, Severity::Error),
        Severity::Error
    );

    assert!(config.allowlist.is_table_skipped("tmp_import"));
    assert!(!config.allowlist.is_table_skipped("MEMBER"));
    assert!(config.allowlist.are_system_columns_optional("CODE_GROUP"));
    assert!(config.allowlist.are_system_columns_optional("setting"));

    assert_eq!(config.export.format, ExportFormat::Markdown);
    assert!(config.export.include_comments);
    assert!(!config.export.include_constraints);
}

#[test]
fn test_project_json_defaults() {
    let project = Project::from_json(PROJECT).unwrap();
    let member = project.find_table("tb_member").unwrap();

    assert_eq!(member.columns[0].data_type, DataType::BigInt);
    assert!(member.columns[1].nullable);
    assert!(!member.columns[1].identity);
    assert_eq!(member.indexes[0].index_type, IndexType::Nonclustered);
    assert!(!member.indexes[0].unique);
    assert_eq!(member.indexes[0].column_names(), vec!["NAME"]);

    assert_eq!(project.relationships[0].on_delete, Some(ReferentialAction::NoAction));
    assert_eq!(project.relationships[0].constraint_name(), "FK__TB_MEMBER__TB_MEMBER");
}

#[test]
fn test_config_rules_override_project_rules() {
    let project = Project::from_json(PROJECT).unwrap();

    let config = Config::from_toml(CONFIG).unwrap();
    let rules = config.resolve_rules(project.naming_rules.as_ref()).unwrap();
    assert!(rules.enforce_upper_case);

    let bare = Config::default();
    let rules = bare.resolve_rules(project.naming_rules.as_ref()).unwrap();
    assert_eq!(rules.effective_case(), Some(CaseStyle::Pascal));
}

#[test]
fn test_project_json_round_trip() {
    let project = Project::from_json(PROJECT).unwrap();
    let reparsed = Project::from_json(&project.to_json().unwrap()).unwrap();
    assert_eq!(reparsed, project);
}

#[test]
fn test_config_round_trip_through_file() {
    let mut config = Config::from_toml(CONFIG).unwrap();
    config.naming = Some(NamingRules::default().with_case(CaseStyle::Snake));

    let dir = std::env::temp_dir().join(format!("schemalint-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("schemalint.toml");

    config.save_to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(loaded.naming, config.naming);
    assert_eq!(loaded.severity, config.severity);
    assert_eq!(loaded.export, config.export);
    assert_eq!(loaded.project_root, dir);
}
