//! Admission probability results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative admission-likelihood tier, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Safe,
    Expected,
    Risk,
    Reach,
    /// Cutoff data missing
    Unknown,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Safe => "safe",
            Tier::Expected => "expected",
            Tier::Risk => "risk",
            Tier::Reach => "reach",
            Tier::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityResult {
    pub tier: Tier,
    pub probability: f64,
    /// 95% confidence interval (low, high)
    pub confidence_interval: (f64, f64),
}
