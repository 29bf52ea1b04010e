//! Validation report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::diagnostic::{EntityKind, Severity, ValidationIssue};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,

    pub warnings: usize,

    pub tables_checked: usize,

    pub columns_checked: usize,

    pub indexes_checked: usize,

    /// 0-100, for coloring only
    pub compliance_score: u8,
}

impl ReportSummary {
    /// Number of entities the score is measured against
    pub fn entities_checked(&self) -> usize {
        self.tables_checked + self.columns_checked + self.indexes_checked
    }
}

/// Diagnostic 0-100 summary of outstanding findings
///
/// `round((1 - weighted / max_weight) * 100)` with errors weighing 2 and
/// warnings 1. `max_weight` is the weighted total plus two points per checked
/// entity, so the score is 100 only with zero findings and never rises as
/// findings accumulate. It is not strictly decreasing: after rounding,
/// neighbouring counts can share a score (`compliance_score(19, 19, 6)` and
/// `compliance_score(20, 20, 6)` are both 17), and large counts settle at 0.
pub fn compliance_score(errors: usize, warnings: usize, entities: usize) -> u8 {
    let weighted = errors * 2 + warnings;
    if weighted == 0 {
        return 100;
    }

    let max_weight = weighted + 2 * entities.max(1);
    let score = (1.0 - weighted as f64 / max_weight as f64) * 100.0;
    score.round().clamp(0.0, 100.0) as u8
}

/// Project validation report
///
/// Recomputed on demand; the engine never persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Schema version
    pub version: ReportVersion,

    /// Project name
    pub project: String,

    /// Caller-supplied timestamp (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,

    pub summary: ReportSummary,

    pub errors: Vec<ValidationIssue>,

    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Split issues by severity and compute the summary
    pub fn from_issues(
        project: impl Into<String>,
        issues: Vec<ValidationIssue>,
        tables_checked: usize,
        columns_checked: usize,
        indexes_checked: usize,
    ) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            issues.into_iter().partition(|i| i.severity == Severity::Error);

        let entities = tables_checked + columns_checked + indexes_checked;
        let summary = ReportSummary {
            errors: errors.len(),
            warnings: warnings.len(),
            tables_checked,
            columns_checked,
            indexes_checked,
            compliance_score: compliance_score(errors.len(), warnings.len(), entities),
        };

        Self {
            version: ReportVersion::CURRENT,
            project: project.into(),
            generated_at: None,
            summary,
            errors,
            warnings,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.generated_at = Some(timestamp.into());
        self
    }

    /// No errors (warnings allowed)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors followed by warnings
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// All findings attached to one entity
    pub fn issues_for(&self, entity_id: &str) -> Vec<&ValidationIssue> {
        self.issues().filter(|i| i.entity_id == entity_id).collect()
    }

    /// Findings grouped per entity, keyed by kind and id
    pub fn grouped_by_entity(&self) -> BTreeMap<(EntityKind, String), Vec<&ValidationIssue>> {
        let mut groups: BTreeMap<(EntityKind, String), Vec<&ValidationIssue>> = BTreeMap::new();
        for issue in self.issues() {
            groups
                .entry((issue.entity, issue.entity_id.clone()))
                .or_default()
                .push(issue);
        }
        groups
    }

    /// Flat prefixed message list of every error
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ValidationIssue::to_message).collect()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Field, RuleCode};

    fn issue(rule: RuleCode, id: &str) -> ValidationIssue {
        ValidationIssue::new(rule, EntityKind::Column, id, "NAME", Field::Name, "문제")
            .with_table("USER")
    }

    #[test]
    fn perfect_score_without_issues() {
        assert_eq!(compliance_score(0, 0, 0), 100);
        assert_eq!(compliance_score(0, 0, 42), 100);
    }

    #[test]
    fn score_decreases_with_fixed_ratio() {
        let mut previous = compliance_score(0, 0, 10);
        for n in 1..=10 {
            let score = compliance_score(n, n, 10);
            assert!(score < previous, "{} should be below {}", score, previous);
            previous = score;
        }
    }

    #[test]
    fn errors_weigh_more_than_warnings() {
        assert!(compliance_score(1, 0, 5) < compliance_score(0, 1, 5));
    }

    #[test]
    fn report_splits_by_severity() {
        let issues = vec![
            issue(RuleCode::CaseMismatch, "c1"),
            issue(RuleCode::DescriptionFormat, "c1"),
            issue(RuleCode::LengthRequired, "c2"),
        ];

        let report = ValidationReport::from_issues("shop", issues, 1, 2, 0);
        assert_eq!(report.summary.errors, 2);
        assert_eq!(report.summary.warnings, 1);
        assert!(!report.is_valid());
        assert_eq!(report.issues_for("c1").len(), 2);
        assert_eq!(report.grouped_by_entity().len(), 2);
        assert_eq!(report.messages().len(), 2);
        assert!(report.summary.compliance_score < 100);
    }

    #[test]
    fn report_serialization() {
        let report = ValidationReport::from_issues("shop", Vec::new(), 0, 0, 0);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"errors\""));
        assert!(!json.contains("generated_at"));
        assert_eq!(report.summary.compliance_score, 100);
    }

    #[test]
    fn score_is_bounded_and_never_rises() {
        assert_eq!(compliance_score(19, 19, 6), 17);
        assert_eq!(compliance_score(20, 20, 6), 17);

        for entities in [0, 1, 6, 40, 1000] {
            for (error_step, warning_step) in [(1, 0), (0, 1), (1, 1), (3, 1)] {
                let mut previous = compliance_score(0, 0, entities);
                assert_eq!(previous, 100);
                for n in 1..=500 {
                    let score = compliance_score(n * error_step, n * warning_step, entities);
                    assert!(score <= 100);
                    assert!(
                        score <= previous,
                        "score rose from {previous} to {score} at n={n}, entities={entities}"
                    );
                    previous = score;
                }
            }
        }
    }
}
