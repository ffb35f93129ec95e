//! AdmissionEngine - Main API for assessing candidates
//!
//! # Architecture
//!
//! The module is organized into:
//! - `types`: Assessment types (Assessment, ProgramAssessment, CompositeEstimate)
//! - `composite`: Composite percentile estimation (index first, fallback second)
//! - `engine`: Core AdmissionEngine implementation

mod composite;
mod engine;
mod types;

// Re-export public types
pub use engine::AdmissionEngine;
pub use types::{Assessment, CompositeEstimate, PercentileSource, ProgramAssessment};
