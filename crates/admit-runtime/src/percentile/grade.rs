//! Absolute grade to percentile conversion

/// Upper cumulative percentile of each grade band (stanine), grade 1 first
pub const GRADE_PERCENTILES: [f64; 9] = [4.0, 11.0, 23.0, 40.0, 60.0, 77.0, 89.0, 96.0, 100.0];

/// Cumulative percentile for a 1-9 grade, lower is stronger
pub fn grade_to_percentile(grade: u8) -> Option<f64> {
    match grade {
        1..=9 => Some(GRADE_PERCENTILES[usize::from(grade) - 1]),
        _ => None,
    }
}
