//! Composite percentile lookup results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a reference-table index lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexLookupResult {
    pub found: bool,
    pub exact: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_percentile: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_percentile: Option<f64>,
    pub approximate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl IndexLookupResult {
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// How per-subject percentiles are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineMethod {
    #[default]
    Weighted,
    Simple,
    Geometric,
}

impl fmt::Display for CombineMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineMethod::Weighted => f.write_str("weighted"),
            CombineMethod::Simple => f.write_str("simple"),
            CombineMethod::Geometric => f.write_str("geometric"),
        }
    }
}

/// Outcome of the percentile fallback calculator. Lower confidence than an
/// index hit by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackResult {
    pub found: bool,
    pub method: CombineMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_percentile: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_rank: Option<u64>,
    pub subjects_used: usize,
    pub subjects_expected: usize,
    pub confidence: f64,
}

impl FallbackResult {
    pub fn not_found(method: CombineMethod, subjects_expected: usize) -> Self {
        Self {
            found: false,
            method,
            composite_percentile: None,
            estimated_rank: None,
            subjects_used: 0,
            subjects_expected,
            confidence: 0.0,
        }
    }
}
