//! Percentile fallback calculator
//!
//! When the reference index cannot place a candidate, a composite
//! percentile is approximated from per-subject percentiles. The result is
//! explicitly lower-confidence: it carries the combine method and the share
//! of expected subjects that contributed.

mod grade;

pub use grade::{grade_to_percentile, GRADE_PERCENTILES};

use crate::config::FallbackConfig;
use crate::error::{Result, RuntimeError};
use admit_core::{CombineMethod, ExamScore, FallbackResult};
use std::collections::BTreeMap;
use tracing::debug;

/// Floor applied to each input of the geometric mean
const GEOMETRIC_FLOOR: f64 = 0.1;

/// Weighted combiner of per-subject percentiles
#[derive(Debug, Clone)]
pub struct PercentileCalculator {
    weights: BTreeMap<String, f64>,
    config: FallbackConfig,
}

impl PercentileCalculator {
    /// `weights` maps canonical subject names to their weight. An empty map,
    /// a negative or non-finite weight, or an all-zero map is rejected.
    pub fn new(weights: BTreeMap<String, f64>, config: FallbackConfig) -> Result<Self> {
        if weights.is_empty() {
            return Err(RuntimeError::config(
                "subject_weights",
                "an explicit subject weight map is required",
            ));
        }
        if let Some((subject, weight)) = weights.iter().find(|(_, w)| !w.is_finite() || **w < 0.0) {
            return Err(RuntimeError::config(
                "subject_weights",
                format!("weight for '{}' must be a non-negative number, got {}", subject, weight),
            ));
        }
        if weights.values().sum::<f64>() <= 0.0 {
            return Err(RuntimeError::config(
                "subject_weights",
                "weights must not all be zero",
            ));
        }
        if config.population == 0 {
            return Err(RuntimeError::config("fallback.population", "must be positive"));
        }

        Ok(Self { weights, config })
    }

    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }

    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    pub fn expected_subjects(&self) -> usize {
        self.config
            .expected_subjects
            .unwrap_or(self.weights.len())
            .max(1)
    }

    /// Combine with the configured default method
    pub fn calculate_default(&self, scores: &[ExamScore], grade: Option<u8>) -> Result<FallbackResult> {
        self.calculate(scores, grade, self.config.method)
    }

    /// Combine subject percentiles (and an optional absolute grade) into a
    /// composite percentile on the lower-is-stronger axis.
    ///
    /// Errors only in weighted mode, when a contributing subject has no
    /// registered weight.
    pub fn calculate(
        &self,
        scores: &[ExamScore],
        grade: Option<u8>,
        method: CombineMethod,
    ) -> Result<FallbackResult> {
        let inputs = self.gather(scores, grade);
        let expected = self.expected_subjects();

        if inputs.is_empty() {
            debug!("Percentile fallback found no usable subjects");
            return Ok(FallbackResult::not_found(method, expected));
        }

        let composite = match method {
            CombineMethod::Weighted => self.weighted(&inputs)?,
            CombineMethod::Simple => {
                Some(inputs.values().sum::<f64>() / inputs.len() as f64)
            }
            CombineMethod::Geometric => {
                let log_sum: f64 = inputs.values().map(|p| p.max(GEOMETRIC_FLOOR).ln()).sum();
                Some((log_sum / inputs.len() as f64).exp())
            }
        };

        let Some(composite) = composite else {
            return Ok(FallbackResult::not_found(method, expected));
        };
        let composite = round2(composite.clamp(0.0, 100.0));
        let used = inputs.len();

        debug!(
            "Percentile fallback ({}) over {} subjects: {}",
            method, used, composite
        );

        Ok(FallbackResult {
            found: true,
            method,
            composite_percentile: Some(composite),
            estimated_rank: Some(self.estimate_rank(composite)),
            subjects_used: used,
            subjects_expected: expected,
            confidence: round2((used as f64 / expected as f64).min(1.0)),
        })
    }

    /// National rank estimate for a composite percentile
    pub fn estimate_rank(&self, percentile: f64) -> u64 {
        let rank = (percentile / 100.0 * self.config.population as f64).ceil();
        (rank as u64).max(1)
    }

    /// Subject -> top-% percentile; first occurrence of a subject wins and
    /// the grade contributes under the configured grade subject
    fn gather(&self, scores: &[ExamScore], grade: Option<u8>) -> BTreeMap<String, f64> {
        let mut inputs = BTreeMap::new();

        for score in scores {
            if inputs.contains_key(&score.subject) {
                continue;
            }
            let value = score
                .cumulative_percentile
                .or_else(|| score.percentile.map(|p| 100.0 - p));
            match value {
                Some(p) if p.is_finite() && (0.0..=100.0).contains(&p) => {
                    inputs.insert(score.subject.clone(), p);
                }
                Some(p) => debug!("Ignoring out-of-range percentile {} for '{}'", p, score.subject),
                None => {}
            }
        }

        if let Some(grade) = grade {
            match grade_to_percentile(grade) {
                Some(p) => {
                    inputs.entry(self.config.grade_subject.clone()).or_insert(p);
                }
                None => debug!("Ignoring grade {} outside 1-9", grade),
            }
        }

        inputs
    }

    fn weighted(&self, inputs: &BTreeMap<String, f64>) -> Result<Option<f64>> {
        let mut total = 0.0;
        let mut weight_sum = 0.0;
        for (subject, percentile) in inputs {
            let weight = self.weights.get(subject).ok_or_else(|| {
                RuntimeError::config(
                    "subject_weights",
                    format!("no weight registered for subject '{}'", subject),
                )
            })?;
            total += weight * percentile;
            weight_sum += weight;
        }
        Ok((weight_sum > 0.0).then(|| total / weight_sum))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
