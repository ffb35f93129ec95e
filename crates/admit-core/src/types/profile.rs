//! Candidate profile and target program types

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Academic stream of a candidate, also encoded in reference column names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Humanities,
    Natural,
    Arts,
}

impl Track {
    /// Default label used when matching reference columns
    pub fn label(&self) -> &'static str {
        match self {
            Track::Humanities => "humanities",
            Track::Natural => "natural",
            Track::Arts => "arts",
        }
    }

    /// Parse a track from a free-text label (English or Korean spreadsheet labels)
    pub fn parse(label: &str) -> Result<Self> {
        let lowered = label.trim().to_lowercase();
        match lowered.as_str() {
            "humanities" | "liberal" | "인문" | "문과" => Ok(Track::Humanities),
            "natural" | "science" | "자연" | "이과" => Ok(Track::Natural),
            "arts" | "예체능" => Ok(Track::Arts),
            _ => Err(CoreError::UnknownTrack(label.to_string())),
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single subject result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamScore {
    /// Canonical or raw subject name
    pub subject: String,

    /// Raw (standard) score
    pub raw_score: f64,

    /// Raw percentile, higher is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,

    /// Cumulative percentile (top-%), lower is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_percentile: Option<f64>,
}

impl ExamScore {
    pub fn new(subject: impl Into<String>, raw_score: f64) -> Self {
        Self {
            subject: subject.into(),
            raw_score,
            percentile: None,
            cumulative_percentile: None,
        }
    }

    pub fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile = Some(percentile);
        self
    }

    pub fn with_cumulative_percentile(mut self, cumulative: f64) -> Self {
        self.cumulative_percentile = Some(cumulative);
        self
    }
}

/// Program a candidate is applying to, as typed by a human
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetProgram {
    pub institution: String,
    pub major: String,
}

impl TargetProgram {
    pub fn new(institution: impl Into<String>, major: impl Into<String>) -> Self {
        Self {
            institution: institution.into(),
            major: major.into(),
        }
    }
}

/// Candidate profile (per request)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub track: Track,

    #[serde(default)]
    pub scores: Vec<ExamScore>,

    /// English absolute grade (1 = best, 9 = worst)
    #[serde(default)]
    pub english_grade: Option<u8>,

    /// History absolute grade (1 = best, 9 = worst)
    #[serde(default)]
    pub history_grade: Option<u8>,

    #[serde(default)]
    pub targets: Vec<TargetProgram>,
}

impl CandidateProfile {
    pub fn new(track: Track) -> Self {
        Self {
            track,
            scores: Vec::new(),
            english_grade: None,
            history_grade: None,
            targets: Vec::new(),
        }
    }

    pub fn with_score(mut self, score: ExamScore) -> Self {
        self.scores.push(score);
        self
    }

    pub fn with_english_grade(mut self, grade: u8) -> Self {
        self.english_grade = Some(grade);
        self
    }

    pub fn with_history_grade(mut self, grade: u8) -> Self {
        self.history_grade = Some(grade);
        self
    }

    pub fn with_target(mut self, target: TargetProgram) -> Self {
        self.targets.push(target);
        self
    }

    /// First score whose subject name equals `subject` exactly
    pub fn score_for(&self, subject: &str) -> Option<&ExamScore> {
        self.scores.iter().find(|s| s.subject == subject)
    }
}
