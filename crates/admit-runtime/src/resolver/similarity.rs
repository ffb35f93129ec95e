//! Bounded string similarity measures, scored 0-100

use std::collections::{BTreeMap, BTreeSet};

/// Character-set Jaccard overlap
pub fn char_overlap(a: &str, b: &str) -> f64 {
    let left: BTreeSet<char> = a.chars().collect();
    let right: BTreeSet<char> = b.chars().collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(&right).count();
    let union = left.union(&right).count();
    shared as f64 / union as f64 * 100.0
}

/// Length ratio of two strings where one contains the other; `None` otherwise
pub fn containment_ratio(a: &str, b: &str) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if !(a.contains(b) || b.contains(a)) {
        return None;
    }
    let la = a.chars().count() as f64;
    let lb = b.chars().count() as f64;
    Some(la.min(lb) / la.max(lb) * 100.0)
}

/// Sørensen-Dice coefficient over character bigrams (multiset)
pub fn bigram_dice(a: &str, b: &str) -> f64 {
    if a == b {
        return if a.is_empty() { 0.0 } else { 100.0 };
    }
    let left = bigrams(a);
    let right = bigrams(b);
    let total: usize = left.values().sum::<usize>() + right.values().sum::<usize>();
    if total == 0 {
        return 0.0;
    }
    let shared: usize = left
        .iter()
        .map(|(gram, count)| (*count).min(right.get(gram).copied().unwrap_or(0)))
        .sum();
    2.0 * shared as f64 / total as f64 * 100.0
}

fn bigrams(text: &str) -> BTreeMap<(char, char), usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut grams = BTreeMap::new();
    for pair in chars.windows(2) {
        *grams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }
    grams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_overlap() {
        assert_eq!(char_overlap("abc", "abc"), 100.0);
        assert_eq!(char_overlap("abc", "xyz"), 0.0);
        assert!((char_overlap("abcd", "abce") - 60.0).abs() < 1e-9);
        assert_eq!(char_overlap("", "abc"), 0.0);
    }

    #[test]
    fn test_containment_ratio() {
        assert_eq!(containment_ratio("hanguk", "hangukuniv"), Some(60.0));
        assert_eq!(containment_ratio("hangukuniv", "hanguk"), Some(60.0));
        assert_eq!(containment_ratio("hanguk", "daehan"), None);
        assert_eq!(containment_ratio("", "daehan"), None);
    }

    #[test]
    fn test_bigram_dice() {
        assert_eq!(bigram_dice("medicine", "medicine"), 100.0);
        assert!(bigram_dice("medicine", "medecine") > 60.0);
        assert!(bigram_dice("medicine", "law") < 10.0);
        assert_eq!(bigram_dice("", ""), 0.0);
    }
}
