//! Component configuration
//!
//! Each component takes its own config section. The SDK's `EngineConfig`
//! aggregates them for file-based setup.

use admit_core::CombineMethod;
use serde::{Deserialize, Serialize};

/// Name resolver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum length-ratio score (0-100) for a containment match
    pub contains_threshold: f64,

    /// Minimum character-set overlap score (0-100) for a last-resort match
    pub overlap_threshold: f64,

    /// Legal-form variants collapsed during normalization, as
    /// (variant, canonical form). Multi-word variants match whole word runs;
    /// single-word variants rewrite the ending of any word, so names embedded
    /// mid-string ("Hanguk University Law") collapse too.
    pub legal_forms: Vec<(String, String)>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            contains_threshold: 60.0,
            overlap_threshold: 70.0,
            legal_forms: vec![
                ("institute of technology".to_string(), "tech".to_string()),
                ("university".to_string(), "univ".to_string()),
                ("대학교".to_string(), "대".to_string()),
            ],
        }
    }
}

impl ResolverConfig {
    pub fn with_contains_threshold(mut self, threshold: f64) -> Self {
        self.contains_threshold = threshold;
        self
    }

    pub fn with_overlap_threshold(mut self, threshold: f64) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    pub fn with_legal_form(mut self, variant: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.legal_forms.push((variant.into(), canonical.into()));
        self
    }
}

/// Column layout of the composite index table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexKeySpec {
    /// The four numeric key columns, in lookup order
    pub score_columns: [String; 4],

    pub category_column: String,

    pub composite_score_column: String,
    pub composite_percentile_column: String,
    pub rank_column: String,
    pub cumulative_percentile_column: String,
}

impl Default for IndexKeySpec {
    fn default() -> Self {
        Self {
            score_columns: [
                "korean".to_string(),
                "math".to_string(),
                "inquiry1".to_string(),
                "inquiry2".to_string(),
            ],
            category_column: "category".to_string(),
            composite_score_column: "composite_score".to_string(),
            composite_percentile_column: "composite_percentile".to_string(),
            rank_column: "rank".to_string(),
            cumulative_percentile_column: "cumulative_percentile".to_string(),
        }
    }
}

/// Percentile fallback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub method: CombineMethod,

    /// Test-taker population used to estimate a national rank
    pub population: u64,

    /// Subjects a complete profile contributes; defaults to the number of
    /// registered weights
    pub expected_subjects: Option<usize>,

    /// Subject key under which the grade-derived percentile is combined
    pub grade_subject: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            method: CombineMethod::Weighted,
            population: 450_000,
            expected_subjects: None,
            grade_subject: "english".to_string(),
        }
    }
}

/// The three percentile bands, on an axis where lower is stronger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentileBands {
    pub safe: f64,
    pub expected: f64,
    pub risk: f64,
}

impl Default for PercentileBands {
    fn default() -> Self {
        Self {
            safe: 20.0,
            expected: 50.0,
            risk: 80.0,
        }
    }
}

/// Cutoff resolver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoffConfig {
    pub bands: PercentileBands,

    /// Minimum bigram similarity (0-100) for the fuzzy column stage
    pub fuzzy_threshold: f64,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self {
            bands: PercentileBands::default(),
            fuzzy_threshold: 80.0,
        }
    }
}

/// Probability classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Standard uncertainty of a probability estimate
    pub uncertainty: f64,

    /// Percentile-delta variant: points of lead over the program needed for "safe"
    pub safe_margin: f64,

    /// Percentile-delta variant: points of deficit still counted as "risk"
    pub risk_margin: f64,

    /// Percentile-delta variant: deficit beyond the risk margin at which the
    /// reach probability reaches its floor
    pub reach_span: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            uncertainty: 0.10,
            safe_margin: 5.0,
            risk_margin: 5.0,
            reach_span: 10.0,
        }
    }
}
