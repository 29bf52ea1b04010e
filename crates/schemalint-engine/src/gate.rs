//! Save gate
//!
//! Decides whether a table may be saved. Errors block the save unless the
//! caller passes `force`; warnings never block.

use schemalint_core::{NamingRules, Project, Severity, Table, ValidationIssue};
use tracing::warn;

use crate::project::ProjectValidator;

/// Outcome of a successful [`admit_table`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// No findings
    Clean,

    /// Warnings only
    Warnings(Vec<ValidationIssue>),

    /// Errors present, saved anyway because `force` was set
    Forced(Vec<ValidationIssue>),
}

impl Admission {
    /// Findings to show alongside the save
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Admission::Clean => &[],
            Admission::Warnings(issues) | Admission::Forced(issues) => issues,
        }
    }
}

/// Save rejected because the table has errors
#[derive(Debug, Clone, thiserror::Error)]
#[error("table '{table}' failed validation with {} error(s)", .errors.len())]
pub struct SaveBlocked {
    pub table: String,
    pub errors: Vec<ValidationIssue>,
}

/// Validate one table for saving
///
/// The table is checked on its own, so project-wide checks such as
/// relationships do not apply.
pub fn admit_table(table: &Table, rules: Option<&NamingRules>, force: bool) -> Result<Admission, SaveBlocked> {
    let mut validator = ProjectValidator::new();
    if let Some(rules) = rules {
        validator = validator.with_rules(rules.clone());
    }

    let project = Project::new(table.name.clone()).with_table(table.clone());
    let issues = validator.collect(&project);

    let has_errors = issues.iter().any(|i| i.severity == Severity::Error);

    match (has_errors, force) {
        (false, _) if issues.is_empty() => Ok(Admission::Clean),
        (false, _) => Ok(Admission::Warnings(issues)),
        (true, true) => {
            warn!("Saving table {} despite validation errors", table.name);
            Ok(Admission::Forced(issues))
        }
        (true, false) => Err(SaveBlocked {
            table: table.name.clone(),
            errors: issues.into_iter().filter(|i| i.severity == Severity::Error).collect(),
        }),
    }
}
