//! Admit Core - Core types and definitions for the admission scoring engine
//!
//! This crate provides the fundamental types shared by the parser, runtime
//! and SDK crates:
//! - Table cells and reference tables
//! - Candidate profiles and target programs
//! - Alias tables for institutions, majors and subjects
//! - Disqualification rule definitions
//! - Result types for every engine component
//! - Error types

pub mod error;
pub mod result;
pub mod rule;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use result::{
    CombineMethod, CutoffBands, CutoffResult, DisqualificationResult, FallbackResult,
    IndexLookupResult, MatchAttempt, MatchProvenance, MatchStage, ProbabilityResult,
    ScoreAtPercentile, Tier,
};
pub use rule::{DisqualificationRule, GradeField, Predicate, RuleScope, Severity};
pub use types::{
    AliasRegistry, AliasTable, CandidateProfile, Cell, ExamScore, IndexTable, PercentileTable,
    ReferenceColumn, TargetProgram, Track,
};
