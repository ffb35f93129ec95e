//! Composite percentile estimation
//!
//! The reference index is authoritative when the candidate has all four key
//! subjects; the weighted calculator covers everything else.

use super::types::{CompositeEstimate, PercentileSource};
use crate::config::IndexConfig;
use admit_core::{CandidateProfile, ExamScore, IndexLookupResult};
use admit_runtime::{AliasKind, NameResolver, PercentileCalculator, ReferenceIndex};
use tracing::{debug, warn};

pub(super) struct CompositeEstimator<'a> {
    pub resolver: &'a NameResolver,
    pub index: Option<&'a ReferenceIndex>,
    pub calculator: &'a PercentileCalculator,
    pub config: &'a IndexConfig,
}

impl CompositeEstimator<'_> {
    pub fn estimate(&self, profile: &CandidateProfile, category: &str) -> CompositeEstimate {
        let scores = self.canonical_scores(profile);

        let index = self.lookup_index(&scores, category);
        if let Some(percentile) = index.as_ref().and_then(Self::index_percentile) {
            return CompositeEstimate {
                percentile: Some(percentile),
                source: PercentileSource::Index,
                index,
                fallback: None,
                note: None,
            };
        }

        match self.calculator.calculate_default(&scores, profile.english_grade) {
            Ok(fallback) if fallback.found => {
                debug!(
                    "Composite percentile from fallback ({}, confidence {})",
                    fallback.method, fallback.confidence
                );
                CompositeEstimate {
                    percentile: fallback.composite_percentile,
                    source: PercentileSource::Fallback,
                    index,
                    fallback: Some(fallback),
                    note: None,
                }
            }
            Ok(fallback) => CompositeEstimate {
                index,
                fallback: Some(fallback),
                ..CompositeEstimate::unavailable("no usable subject percentiles")
            },
            Err(e) => {
                warn!("Percentile fallback failed: {}", e);
                CompositeEstimate {
                    index,
                    ..CompositeEstimate::unavailable(e.to_string())
                }
            }
        }
    }

    /// Profile scores with subject names resolved to canonicals
    fn canonical_scores(&self, profile: &CandidateProfile) -> Vec<ExamScore> {
        profile
            .scores
            .iter()
            .map(|score| ExamScore {
                subject: self.resolver.resolve(&score.subject, AliasKind::Subject),
                ..score.clone()
            })
            .collect()
    }

    /// `None` when there is no index or a key subject is missing
    fn lookup_index(&self, scores: &[ExamScore], category: &str) -> Option<IndexLookupResult> {
        let index = self.index?;
        let mut keys = [0.0; 4];
        for (slot, subject) in keys.iter_mut().zip(self.config.key_subjects.iter()) {
            match scores.iter().find(|s| &s.subject == subject) {
                Some(score) => *slot = score.raw_score,
                None => {
                    debug!("Skipping index lookup, key subject '{}' missing", subject);
                    return None;
                }
            }
        }
        Some(index.lookup(keys, Some(category), self.config.allow_approx))
    }

    /// Top-% percentile of a hit: the cumulative column, else the flipped
    /// composite percentile
    fn index_percentile(result: &IndexLookupResult) -> Option<f64> {
        if !result.found {
            return None;
        }
        result
            .cumulative_percentile
            .or_else(|| result.composite_percentile.map(|p| 100.0 - p))
    }
}
