//! Rule definition

use super::predicate::Predicate;
use super::scope::RuleScope;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Blocking strength of a rule. Higher wins when several rules trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    /// Shown to the candidate but does not block the application
    Advisory = 1,
    /// Candidate cannot apply
    Blocking = 2,
}

impl Severity {
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Severity {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Severity::Advisory),
            2 => Ok(Severity::Blocking),
            other => Err(CoreError::InvalidSeverity(other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value.level()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Advisory => f.write_str("advisory"),
            Severity::Blocking => f.write_str("blocking"),
        }
    }
}

/// Disqualification rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisqualificationRule {
    /// Unique rule ID
    pub id: String,

    /// Which programs the rule applies to
    #[serde(default)]
    pub scope: RuleScope,

    /// Violation check; the rule triggers when this evaluates to true
    pub predicate: Predicate,

    pub severity: Severity,

    /// Message template, e.g. "English grade {english_grade} is below the minimum for {institution}"
    pub message: String,

    /// Machine-readable reason code
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DisqualificationRule {
    /// Create a new universal rule
    pub fn new(
        id: impl Into<String>,
        predicate: Predicate,
        severity: Severity,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            scope: RuleScope::Universal,
            predicate,
            severity,
            message: message.into(),
            code: code.into(),
            description: None,
        }
    }

    /// Set the applicability scope
    pub fn with_scope(mut self, scope: RuleScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::GradeField;

    #[test]
    fn test_severity_ordering_and_conversion() {
        assert!(Severity::Blocking > Severity::Advisory);
        assert_eq!(Severity::try_from(2).unwrap(), Severity::Blocking);
        assert_eq!(Severity::try_from(3), Err(CoreError::InvalidSeverity(3)));
        assert_eq!(u8::from(Severity::Advisory), 1);
    }

    #[test]
    fn test_rule_creation() {
        let rule = DisqualificationRule::new(
            "english_min",
            Predicate::GradeWorseThan {
                field: GradeField::English,
                limit: 4,
            },
            Severity::Blocking,
            "English grade {english_grade} is below the minimum",
            "ENGLISH_MIN_GRADE",
        )
        .with_description("Universal English floor");

        assert_eq!(rule.id, "english_min");
        assert_eq!(rule.scope, RuleScope::Universal);
        assert_eq!(rule.severity, Severity::Blocking);
        assert_eq!(rule.description.as_deref(), Some("Universal English floor"));
    }

    #[test]
    fn test_rule_serde_roundtrip_uses_numeric_severity() {
        let rule = DisqualificationRule::new(
            "r1",
            Predicate::TrackIs {
                track: crate::types::Track::Arts,
            },
            Severity::Advisory,
            "msg",
            "CODE",
        );
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["severity"], 1);
        let back: DisqualificationRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }
}
