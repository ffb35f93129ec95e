//! Closed set of disqualification checks
//!
//! Every variant describes a *violation*: the rule triggers when the
//! predicate evaluates to true. `All`, `Any` and `Not` compose checks.

use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Which absolute-grade field of the profile a check reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeField {
    English,
    History,
}

impl GradeField {
    pub fn name(&self) -> &'static str {
        match self {
            GradeField::English => "english_grade",
            GradeField::History => "history_grade",
        }
    }
}

/// Violation predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// Grade field is numerically greater (worse) than `limit`.
    /// A missing grade is an evaluation error.
    GradeWorseThan { field: GradeField, limit: u8 },

    /// Raw score of `subject` (alias-resolved) is below `min`.
    /// A missing subject is an evaluation error.
    RawScoreBelow { subject: String, min: f64 },

    /// None of `any_of` (alias-resolved) appears among the candidate's subjects
    MissingRequiredSubject { any_of: Vec<String> },

    /// Two or more of the candidate's subjects drawn from `pool` sit at the
    /// same `level` (the trailing token of the canonical subject name,
    /// e.g. "I" in "Physics I")
    ElectiveLevelCollision { pool: Vec<String>, level: String },

    /// Target major belongs to the category described by `majors`
    /// (exact or alias-resolved prefix match only) and the candidate took
    /// fewer than `min_count` subjects from `electives`
    CategoryMissingElectives {
        category: String,
        majors: Vec<String>,
        electives: Vec<String>,
        min_count: usize,
    },

    /// Candidate's track equals `track`
    TrackIs { track: Track },

    /// Every inner predicate holds
    All { all: Vec<Predicate> },

    /// At least one inner predicate holds
    Any { any: Vec<Predicate> },

    /// Inner predicate does not hold
    Not { not: Box<Predicate> },
}

impl Predicate {
    pub fn all(predicates: Vec<Predicate>) -> Self {
        Predicate::All { all: predicates }
    }

    pub fn any(predicates: Vec<Predicate>) -> Self {
        Predicate::Any { any: predicates }
    }

    pub fn negate(predicate: Predicate) -> Self {
        Predicate::Not {
            not: Box::new(predicate),
        }
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Predicate::GradeWorseThan { .. } => "grade_worse_than",
            Predicate::RawScoreBelow { .. } => "raw_score_below",
            Predicate::MissingRequiredSubject { .. } => "missing_required_subject",
            Predicate::ElectiveLevelCollision { .. } => "elective_level_collision",
            Predicate::CategoryMissingElectives { .. } => "category_missing_electives",
            Predicate::TrackIs { .. } => "track_is",
            Predicate::All { .. } => "all",
            Predicate::Any { .. } => "any",
            Predicate::Not { .. } => "not",
        }
    }
}
