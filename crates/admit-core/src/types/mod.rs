//! Data model types

pub mod alias;
pub mod cell;
pub mod profile;
pub mod table;

pub use alias::{AliasRegistry, AliasTable};
pub use cell::Cell;
pub use profile::{CandidateProfile, ExamScore, TargetProgram, Track};
pub use table::{IndexTable, PercentileTable, ReferenceColumn};
