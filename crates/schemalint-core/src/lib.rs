//! schemalint Core
//!
//! Core domain model with stable, versioned types.
//! Never rename rule codes - they are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod rules;
pub mod report;
pub mod config;

pub use diagnostic::{EntityKind, Field, RuleCode, Severity, ValidationIssue, ValidationResult};
pub use schema::{
    Column, DataType, Index, IndexColumn, IndexType, ModelError, Project, ReferentialAction,
    Relationship, SortOrder, Table, index_prefix, MAX_DECIMAL_PRECISION,
};
pub use rules::{CaseStyle, NamingRules};
pub use report::{ReportSummary, ReportVersion, ValidationReport, compliance_score};
pub use config::{AllowlistRules, Config, ConfigError, ExportDefaults, ExportFormat, SeverityThreshold};
