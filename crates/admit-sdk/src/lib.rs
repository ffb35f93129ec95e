//! Admission Engine SDK
//!
//! High-level API for building an admission engine from reference data and
//! assessing candidate profiles against it.

pub mod admission_engine;
pub mod builder;
pub mod config;
pub mod error;

// Re-export main types
pub use admission_engine::{
    AdmissionEngine, Assessment, CompositeEstimate, PercentileSource, ProgramAssessment,
};
pub use builder::AdmissionEngineBuilder;
pub use config::{EngineConfig, IndexConfig, RulesConfig};
pub use error::{Result, SdkError};

// Re-export commonly used types from dependencies
pub use admit_core::{
    AliasRegistry, AliasTable, CandidateProfile, Cell, ExamScore, IndexTable, PercentileTable,
    Severity, TargetProgram, Tier, Track,
};
