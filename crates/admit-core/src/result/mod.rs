//! Result types returned by the engine components
//!
//! "Not found" is always a value here, never an error: each struct carries
//! an explicit `found`/`disqualified` flag and optional fields.

mod cutoff;
mod eligibility;
mod lookup;
mod probability;

pub use cutoff::{
    CutoffBands, CutoffResult, MatchAttempt, MatchProvenance, MatchStage, ScoreAtPercentile,
};
pub use eligibility::DisqualificationResult;
pub use lookup::{CombineMethod, FallbackResult, IndexLookupResult};
pub use probability::{ProbabilityResult, Tier};
