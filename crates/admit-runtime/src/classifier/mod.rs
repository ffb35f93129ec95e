//! Probability classifier
//!
//! Maps a candidate's score against a program's cutoff bands (or a
//! percentile gap) onto one of four ordered tiers with a probability and a
//! symmetric 95% interval. Stateless per call.

use crate::config::ClassifierConfig;
use crate::error::{Result, RuntimeError};
use admit_core::{CutoffBands, ProbabilityResult, Tier};

const Z_95: f64 = 1.96;
const MIN_PROBABILITY: f64 = 0.01;
const MAX_PROBABILITY: f64 = 0.99;
const REACH_FLOOR: f64 = 0.05;
/// Lead over the safe cutoff, relative to it, at which "safe" saturates
const SAFE_HEADROOM: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityClassifier {
    config: ClassifierConfig,
}

impl ProbabilityClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        for (name, value) in [
            ("uncertainty", config.uncertainty),
            ("safe_margin", config.safe_margin),
            ("risk_margin", config.risk_margin),
            ("reach_span", config.reach_span),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RuntimeError::config(
                    format!("classifier.{}", name),
                    format!("must be a non-negative number, got {}", value),
                ));
            }
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a score against safe / expected / risk thresholds
    pub fn classify(
        &self,
        score: f64,
        safe: Option<f64>,
        expected: Option<f64>,
        risk: Option<f64>,
    ) -> ProbabilityResult {
        let Some(expected) = expected.filter(|e| e.is_finite()) else {
            return Self::unknown();
        };
        if !score.is_finite() {
            return Self::unknown();
        }

        let (tier, probability) = match safe {
            Some(safe) if score >= safe => {
                let headroom = safe.abs() * SAFE_HEADROOM;
                let lead = if headroom > 0.0 {
                    ((score - safe) / headroom).min(1.0)
                } else if score > safe {
                    1.0
                } else {
                    0.0
                };
                (Tier::Safe, 0.80 + 0.19 * lead)
            }
            _ if score >= expected => {
                let ratio = match safe {
                    Some(safe) if safe > expected => (score - expected) / (safe - expected),
                    _ => 0.5,
                };
                (Tier::Expected, 0.50 + 0.30 * ratio)
            }
            _ => match risk {
                Some(risk) if score >= risk => {
                    let ratio = if expected > risk {
                        (score - risk) / (expected - risk)
                    } else {
                        0.0
                    };
                    (Tier::Risk, 0.20 + 0.30 * ratio)
                }
                Some(risk) if risk > 0.0 => (Tier::Reach, 0.20 * (score / risk).max(0.0)),
                _ => (Tier::Reach, REACH_FLOOR),
            },
        };

        self.finish(tier, probability)
    }

    /// Classify against a band triple
    pub fn classify_bands(&self, score: f64, bands: &CutoffBands) -> ProbabilityResult {
        self.classify(score, bands.safe, bands.expected, bands.risk)
    }

    /// Percentile-gap variant on the lower-is-stronger axis. The candidate
    /// leads when their percentile is below the program's.
    pub fn classify_percentile(
        &self,
        candidate_percentile: f64,
        program_percentile: Option<f64>,
    ) -> ProbabilityResult {
        let Some(program) = program_percentile.filter(|p| p.is_finite()) else {
            return Self::unknown();
        };
        if !candidate_percentile.is_finite() {
            return Self::unknown();
        }

        let delta = program - candidate_percentile;
        let ClassifierConfig {
            safe_margin,
            risk_margin,
            reach_span,
            ..
        } = self.config;

        let share = |part: f64, whole: f64| if whole > 0.0 { (part / whole).clamp(0.0, 1.0) } else { 1.0 };

        let (tier, probability) = if delta >= safe_margin {
            (Tier::Safe, 0.80 + 0.19 * share(delta - safe_margin, safe_margin))
        } else if delta >= 0.0 {
            (Tier::Expected, 0.50 + 0.30 * share(delta, safe_margin))
        } else if delta >= -risk_margin {
            (Tier::Risk, 0.20 + 0.30 * share(delta + risk_margin, risk_margin))
        } else {
            let shortfall = -delta - risk_margin;
            let remaining = 1.0 - share(shortfall, reach_span);
            (Tier::Reach, (0.20 * remaining).max(REACH_FLOOR))
        };

        self.finish(tier, probability)
    }

    fn finish(&self, tier: Tier, probability: f64) -> ProbabilityResult {
        let probability = round4(probability.clamp(MIN_PROBABILITY, MAX_PROBABILITY));
        let margin = Z_95 * self.config.uncertainty;
        ProbabilityResult {
            tier,
            probability,
            confidence_interval: (
                round4((probability - margin).max(0.0)),
                round4((probability + margin).min(1.0)),
            ),
        }
    }

    /// Result used when there is nothing to classify against
    pub fn unknown() -> ProbabilityResult {
        ProbabilityResult {
            tier: Tier::Unknown,
            probability: 0.50,
            confidence_interval: (0.30, 0.70),
        }
    }
}

impl Default for ProbabilityClassifier {
    fn default() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
