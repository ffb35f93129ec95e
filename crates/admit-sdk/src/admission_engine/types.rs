//! Assessment types returned by AdmissionEngine

use crate::error::Result;
use admit_core::{
    CutoffResult, DisqualificationResult, FallbackResult, IndexLookupResult, ProbabilityResult,
    ScoreAtPercentile, TargetProgram, Tier,
};
use serde::{Deserialize, Serialize};

/// Where the candidate's composite percentile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileSource {
    /// Exact or nearest row of the reference index
    Index,
    /// Weighted percentile fallback calculator
    Fallback,
    /// Neither source produced a value
    Unavailable,
}

/// Composite percentile of a candidate (top-%, lower is stronger)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeEstimate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,

    pub source: PercentileSource,

    /// Index lookup outcome, when a lookup was attempted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexLookupResult>,

    /// Fallback outcome, when the calculator ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackResult>,

    /// Why no percentile could be produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CompositeEstimate {
    pub fn unavailable(note: impl Into<String>) -> Self {
        Self {
            percentile: None,
            source: PercentileSource::Unavailable,
            index: None,
            fallback: None,
            note: Some(note.into()),
        }
    }

    /// Whether the value is an estimate rather than an exact index hit
    pub fn is_estimated(&self) -> bool {
        match self.source {
            PercentileSource::Index => self.index.as_ref().map_or(true, |r| r.approximate),
            PercentileSource::Fallback | PercentileSource::Unavailable => true,
        }
    }
}

/// Outcome for one target program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramAssessment {
    pub target: TargetProgram,

    /// Category label the program was matched under
    pub category: String,

    pub disqualification: DisqualificationResult,

    pub cutoff: CutoffResult,

    /// Candidate's composite percentile read off the program's column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_score: Option<ScoreAtPercentile>,

    pub probability: ProbabilityResult,
}

impl ProgramAssessment {
    pub fn is_eligible(&self) -> bool {
        !self.disqualification.disqualified
    }

    pub fn tier(&self) -> Tier {
        self.probability.tier
    }
}

/// Full assessment of a candidate profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub composite: CompositeEstimate,

    /// One entry per target, in profile order
    pub programs: Vec<ProgramAssessment>,
}

impl Assessment {
    /// Programs the candidate is not disqualified from
    pub fn eligible(&self) -> impl Iterator<Item = &ProgramAssessment> {
        self.programs.iter().filter(|p| p.is_eligible())
    }

    /// First assessment for a target, by the names as typed
    pub fn program(&self, institution: &str, major: &str) -> Option<&ProgramAssessment> {
        self.programs
            .iter()
            .find(|p| p.target.institution == institution && p.target.major == major)
    }

    /// Pretty-printed JSON for hosts that hand results on
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
