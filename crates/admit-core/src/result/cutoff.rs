//! Cutoff resolution results

use serde::{Deserialize, Serialize};

/// Stage of the column matcher that produced (or failed to produce) a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Exact,
    Contains,
    Alias,
    Fuzzy,
    RawContains,
    NotFound,
}

impl MatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStage::Exact => "exact",
            MatchStage::Contains => "contains",
            MatchStage::Alias => "alias",
            MatchStage::Fuzzy => "fuzzy",
            MatchStage::RawContains => "raw_contains",
            MatchStage::NotFound => "not_found",
        }
    }
}

/// One step of the column search, recorded for explainability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAttempt {
    pub stage: MatchStage,
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy_score: Option<f64>,
}

/// How a column was matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchProvenance {
    pub stage: MatchStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy_score: Option<f64>,
    #[serde(default)]
    pub attempts: Vec<MatchAttempt>,
}

impl MatchProvenance {
    pub fn not_found(attempts: Vec<MatchAttempt>) -> Self {
        Self {
            stage: MatchStage::NotFound,
            alias_used: None,
            fuzzy_score: None,
            attempts,
        }
    }
}

/// Thresholds at the three percentile bands
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CutoffBands {
    pub safe: Option<f64>,
    pub expected: Option<f64>,
    pub risk: Option<f64>,
}

impl CutoffBands {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.safe.is_some() && self.expected.is_some() && self.risk.is_some()
    }

    pub fn is_absent(&self) -> bool {
        self.safe.is_none() && self.expected.is_none() && self.risk.is_none()
    }
}

/// Outcome of resolving a program's cutoffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffResult {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub cutoffs: CutoffBands,
    pub provenance: MatchProvenance,
}

impl CutoffResult {
    pub fn not_found(provenance: MatchProvenance) -> Self {
        Self {
            found: false,
            column: None,
            cutoffs: CutoffBands::absent(),
            provenance,
        }
    }
}

/// Score read from a column at an arbitrary percentile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreAtPercentile {
    pub percentile: f64,
    pub score: f64,
    pub interpolated: bool,
}
