//! Eligibility check results

use serde::{Deserialize, Serialize};

/// Outcome of evaluating the rule catalog for one target program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisqualificationResult {
    pub disqualified: bool,

    /// Rendered message of the primary (highest-severity) rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Code of the primary rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Every triggered rule id at or above the threshold, most severe first
    #[serde(default)]
    pub triggered: Vec<String>,

    /// Rules whose predicate failed to evaluate
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl DisqualificationResult {
    pub fn eligible() -> Self {
        Self::default()
    }
}
