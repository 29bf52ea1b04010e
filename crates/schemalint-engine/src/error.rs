//! Rule configuration errors

use schemalint_core::EntityKind;

/// A naming rule that cannot be evaluated
///
/// Only raised for broken configuration. Invalid identifiers are reported
/// through `ValidationResult`, never through this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid {entity} name pattern '{pattern}': {reason}")]
    InvalidPattern {
        entity: EntityKind,
        pattern: String,
        reason: String,
    },
}

impl RuleError {
    /// The offending pattern text
    pub fn pattern(&self) -> &str {
        match self {
            Self::InvalidPattern { pattern, .. } => pattern,
        }
    }
}
