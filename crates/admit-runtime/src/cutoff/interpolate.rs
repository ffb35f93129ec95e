//! Percentile interpolation over a reference column

use crate::config::PercentileBands;
use admit_core::{CutoffBands, ReferenceColumn, ScoreAtPercentile};
use tracing::warn;

/// Percentiles closer than this are the same row
const EXACT_TOLERANCE: f64 = 1e-9;

/// Numeric (percentile, score) pairs sorted ascending by percentile.
/// The sort is stable so duplicate percentiles keep table order.
pub fn sorted_pairs(column: &ReferenceColumn) -> Vec<(f64, f64)> {
    let mut pairs = column.numeric_pairs();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs
}

/// Linear interpolation at `percentile`, clamped to the observed range.
/// `None` with fewer than two pairs.
pub fn interpolate(pairs: &[(f64, f64)], percentile: f64) -> Option<f64> {
    if pairs.len() < 2 || !percentile.is_finite() {
        return None;
    }
    let (first, last) = (pairs[0], pairs[pairs.len() - 1]);
    if percentile <= first.0 {
        return Some(first.1);
    }
    if percentile >= last.0 {
        return Some(last.1);
    }

    pairs.windows(2).find_map(|w| {
        let ((p0, s0), (p1, s1)) = (w[0], w[1]);
        if percentile < p0 || percentile > p1 {
            return None;
        }
        if (p1 - p0).abs() < EXACT_TOLERANCE {
            return Some(s0);
        }
        Some(s0 + (percentile - p0) / (p1 - p0) * (s1 - s0))
    })
}

/// Score at an arbitrary percentile: the stored score on an exact axis hit,
/// otherwise the interpolated one
pub fn score_at(pairs: &[(f64, f64)], percentile: f64) -> Option<ScoreAtPercentile> {
    if let Some(&(p, score)) = pairs
        .iter()
        .find(|(p, _)| (p - percentile).abs() < EXACT_TOLERANCE)
    {
        return Some(ScoreAtPercentile {
            percentile: p,
            score,
            interpolated: false,
        });
    }
    interpolate(pairs, percentile).map(|score| ScoreAtPercentile {
        percentile,
        score: round2(score),
        interpolated: true,
    })
}

/// Thresholds at the three bands, rounded to two decimals and forced
/// non-increasing from safe to risk
pub fn band_cutoffs(column_id: &str, pairs: &[(f64, f64)], bands: &PercentileBands) -> CutoffBands {
    let at = |p: f64| interpolate(pairs, p).map(round2);
    let (Some(safe), Some(expected), Some(risk)) = (at(bands.safe), at(bands.expected), at(bands.risk))
    else {
        return CutoffBands::absent();
    };

    let expected_clamped = expected.min(safe);
    let risk_clamped = risk.min(expected_clamped);
    if expected_clamped != expected || risk_clamped != risk {
        warn!(
            "Column '{}' is not monotone in score ({}, {}, {}), clamping",
            column_id, safe, expected, risk
        );
    }

    CutoffBands {
        safe: Some(safe),
        expected: Some(expected_clamped),
        risk: Some(risk_clamped),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
