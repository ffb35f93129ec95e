//! Configuration types for AdmissionEngine

use crate::error::Result;
use admit_core::{Severity, Track};
use admit_runtime::{ClassifierConfig, CutoffConfig, FallbackConfig, IndexKeySpec, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main engine configuration
///
/// Every section is optional in YAML; omitted sections take their defaults.
///
/// ```yaml
/// cutoff:
///   bands: { safe: 15, expected: 50, risk: 85 }
/// rules:
///   severity_threshold: 1
/// track_labels:
///   natural: 자연
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name resolver thresholds and legal suffixes
    pub resolver: ResolverConfig,

    /// Reference index columns and key subjects
    pub index: IndexConfig,

    /// Percentile fallback method and population
    pub fallback: FallbackConfig,

    /// Percentile bands and column matching
    pub cutoff: CutoffConfig,

    /// Probability classifier margins
    pub classifier: ClassifierConfig,

    /// Disqualification settings
    pub rules: RulesConfig,

    /// Category label used for a track when matching reference columns and
    /// index rows. Tracks without an entry use their default label.
    pub track_labels: BTreeMap<Track, String>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from YAML. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_index(mut self, index: IndexConfig) -> Self {
        self.index = index;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackConfig) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_cutoff(mut self, cutoff: CutoffConfig) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the minimum severity that disqualifies
    pub fn with_severity_threshold(mut self, threshold: Severity) -> Self {
        self.rules.severity_threshold = threshold;
        self
    }

    /// Override the category label of a track
    pub fn with_track_label(mut self, track: Track, label: impl Into<String>) -> Self {
        self.track_labels.insert(track, label.into());
        self
    }

    /// Category label for a track
    pub fn track_label(&self, track: Track) -> &str {
        self.track_labels
            .get(&track)
            .map(String::as_str)
            .unwrap_or_else(|| track.label())
    }
}

/// Reference index configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Column names of the index table
    pub columns: IndexKeySpec,

    /// Canonical subject names whose raw scores form the four lookup keys,
    /// in key-column order
    pub key_subjects: [String; 4],

    /// Fall back to the nearest row on an exact miss
    pub allow_approx: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            columns: IndexKeySpec::default(),
            key_subjects: [
                "korean".to_string(),
                "math".to_string(),
                "inquiry1".to_string(),
                "inquiry2".to_string(),
            ],
            allow_approx: true,
        }
    }
}

impl IndexConfig {
    pub fn with_key_subjects(mut self, subjects: [&str; 4]) -> Self {
        self.key_subjects = subjects.map(str::to_string);
        self
    }

    pub fn with_allow_approx(mut self, allow: bool) -> Self {
        self.allow_approx = allow;
        self
    }
}

/// Disqualification settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rules below this severity never disqualify
    pub severity_threshold: Severity,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            severity_threshold: Severity::Blocking,
        }
    }
}
