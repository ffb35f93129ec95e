//! Admit Runtime - Resolution and scoring engine
//!
//! This crate holds the components that turn a candidate profile and static
//! reference data into eligibility and admission-likelihood results:
//!
//! - `resolver`: alias-backed name normalization and matching
//! - `index`: keyed composite-percentile lookup with nearest-row fallback
//! - `percentile`: weighted percentile fallback calculator
//! - `cutoff`: reference column matching and band interpolation
//! - `rules`: prioritized disqualification rule evaluation
//! - `classifier`: score/percentile to tier and probability
//!
//! Every component is synchronous and owns its memo caches. Reference data
//! is immutable once a component is built.

pub mod cache;
pub mod classifier;
pub mod config;
pub mod cutoff;
pub mod error;
pub mod index;
pub mod percentile;
pub mod resolver;
pub mod rules;

// Re-export main types
pub use cache::{CacheStats, MemoCache};
pub use classifier::ProbabilityClassifier;
pub use config::{
    ClassifierConfig, CutoffConfig, FallbackConfig, IndexKeySpec, PercentileBands, ResolverConfig,
};
pub use cutoff::CutoffResolver;
pub use error::{Result, RuntimeError};
pub use index::{IndexMode, IndexStats, ReferenceIndex};
pub use percentile::PercentileCalculator;
pub use resolver::{AliasKind, MatchMethod, NameMatch, NameResolver};
pub use rules::{RuleCatalog, RuleEngine};
