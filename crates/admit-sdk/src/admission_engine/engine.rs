//! Core AdmissionEngine implementation

use super::composite::CompositeEstimator;
use super::types::{Assessment, CompositeEstimate, ProgramAssessment};
use crate::config::EngineConfig;
use admit_core::{CandidateProfile, TargetProgram};
use admit_runtime::{
    CutoffResolver, IndexStats, NameResolver, PercentileCalculator, ProbabilityClassifier,
    ReferenceIndex, RuleEngine,
};
use std::sync::Arc;
use tracing::debug;

/// Assesses candidate profiles against reference data
///
/// Built by `AdmissionEngineBuilder`. All reference data is immutable once
/// built; the engine is `Send + Sync` and can be shared across threads.
pub struct AdmissionEngine {
    config: EngineConfig,
    resolver: Arc<NameResolver>,
    index: Option<ReferenceIndex>,
    calculator: PercentileCalculator,
    cutoffs: CutoffResolver,
    rules: RuleEngine,
    classifier: ProbabilityClassifier,
}

impl AdmissionEngine {
    pub(crate) fn from_parts(
        config: EngineConfig,
        resolver: Arc<NameResolver>,
        index: Option<ReferenceIndex>,
        calculator: PercentileCalculator,
        cutoffs: CutoffResolver,
        rules: RuleEngine,
        classifier: ProbabilityClassifier,
    ) -> Self {
        Self {
            config,
            resolver,
            index,
            calculator,
            cutoffs,
            rules,
            classifier,
        }
    }

    /// Assess every target of a profile. The composite percentile is
    /// computed once and shared by all targets.
    pub fn assess(&self, profile: &CandidateProfile) -> Assessment {
        let composite = self.composite_percentile(profile);
        let programs = profile
            .targets
            .iter()
            .map(|target| self.assess_program(profile, target, &composite))
            .collect();

        Assessment {
            composite,
            programs,
        }
    }

    /// Candidate's composite percentile: index lookup over the key
    /// subjects, then the fallback calculator
    pub fn composite_percentile(&self, profile: &CandidateProfile) -> CompositeEstimate {
        let estimator = CompositeEstimator {
            resolver: &self.resolver,
            index: self.index.as_ref(),
            calculator: &self.calculator,
            config: &self.config.index,
        };
        estimator.estimate(profile, self.config.track_label(profile.track))
    }

    /// Assess a single target against a precomputed composite percentile
    pub fn assess_program(
        &self,
        profile: &CandidateProfile,
        target: &TargetProgram,
        composite: &CompositeEstimate,
    ) -> ProgramAssessment {
        let category = self.config.track_label(profile.track).to_string();

        let disqualification = self
            .rules
            .check(profile, target, self.config.rules.severity_threshold);
        let cutoff = self
            .cutoffs
            .resolve(&target.institution, &target.major, Some(&category));

        let candidate_score = match (cutoff.column.as_deref(), composite.percentile) {
            (Some(column), Some(percentile)) => {
                self.cutoffs.get_score_at_percentile(column, percentile)
            }
            _ => None,
        };
        let probability = match &candidate_score {
            Some(score) => self.classifier.classify_bands(score.score, &cutoff.cutoffs),
            None => ProbabilityClassifier::unknown(),
        };

        debug!(
            "Assessed {} / {}: disqualified={}, column={:?}, tier={}",
            target.institution,
            target.major,
            disqualification.disqualified,
            cutoff.column,
            probability.tier
        );

        ProgramAssessment {
            target: target.clone(),
            category,
            disqualification,
            cutoff,
            candidate_score,
            probability,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub fn cutoff_resolver(&self) -> &CutoffResolver {
        &self.cutoffs
    }

    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn classifier(&self) -> &ProbabilityClassifier {
        &self.classifier
    }

    pub fn calculator(&self) -> &PercentileCalculator {
        &self.calculator
    }

    /// Index statistics, if an index table was supplied
    pub fn index_stats(&self) -> Option<IndexStats> {
        self.index.as_ref().map(ReferenceIndex::stats)
    }
}

impl std::fmt::Debug for AdmissionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionEngine")
            .field("rules", &self.rules.catalog().len())
            .field("index", &self.index.as_ref().map(ReferenceIndex::mode))
            .field("config", &self.config)
            .finish()
    }
}
