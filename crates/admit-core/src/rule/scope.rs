//! Rule applicability scopes

use serde::{Deserialize, Serialize};

/// Which (institution, major) pairs a rule is evaluated for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleScope {
    /// Always applies
    #[default]
    Universal,

    /// Alias-resolved institution equals one of the listed canonical names
    Institutions { names: Vec<String> },

    /// Alias-resolved major equals or starts with one of the prefixes
    MajorPrefix { prefixes: Vec<String> },

    /// Case-insensitive regular expression over the resolved institution
    /// name or the raw major name
    Pattern { pattern: String },
}

impl RuleScope {
    pub fn institutions<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuleScope::Institutions {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn major_prefix<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuleScope::MajorPrefix {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        RuleScope::Pattern {
            pattern: pattern.into(),
        }
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, RuleScope::Universal)
    }
}
