//! Name matcher chain
//!
//! `match_name` escalates through an ordered list of matchers; the first
//! one with an opinion wins. Each matcher is independently testable.

use super::alias::AliasIndex;
use super::similarity::{char_overlap, containment_ratio};
use crate::config::ResolverConfig;
use serde::Serialize;

/// Which matcher produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Containment,
    Overlap,
    Unmatched,
}

/// Resolved name with a 0-100 confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameMatch {
    pub canonical: String,
    pub confidence: f64,
    pub method: MatchMethod,
}

impl NameMatch {
    pub fn unmatched(input: &str) -> Self {
        Self {
            canonical: input.to_string(),
            confidence: 0.0,
            method: MatchMethod::Unmatched,
        }
    }

    pub fn is_match(&self) -> bool {
        self.method != MatchMethod::Unmatched
    }
}

/// One link of the chain. Returns `None` for "no opinion".
pub trait NameMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn try_match(&self, key: &str, index: &AliasIndex) -> Option<NameMatch>;
}

/// Exact normalized-key hit, confidence 100
pub struct ExactMatcher;

impl NameMatcher for ExactMatcher {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn try_match(&self, key: &str, index: &AliasIndex) -> Option<NameMatch> {
        index.get(key).map(|canonical| NameMatch {
            canonical: canonical.to_string(),
            confidence: 100.0,
            method: MatchMethod::Exact,
        })
    }
}

/// Substring containment in either direction, scored by length ratio
pub struct ContainmentMatcher {
    pub threshold: f64,
}

impl NameMatcher for ContainmentMatcher {
    fn name(&self) -> &'static str {
        "containment"
    }

    fn try_match(&self, key: &str, index: &AliasIndex) -> Option<NameMatch> {
        best_candidate(
            index
                .entries()
                .filter_map(|(alias, canonical)| Some((containment_ratio(key, alias)?, canonical))),
            self.threshold,
        )
        .map(|(score, canonical)| NameMatch {
            canonical: canonical.to_string(),
            confidence: score,
            method: MatchMethod::Containment,
        })
    }
}

/// Character-set overlap, last resort
pub struct OverlapMatcher {
    pub threshold: f64,
}

impl NameMatcher for OverlapMatcher {
    fn name(&self) -> &'static str {
        "overlap"
    }

    fn try_match(&self, key: &str, index: &AliasIndex) -> Option<NameMatch> {
        best_candidate(
            index
                .entries()
                .map(|(alias, canonical)| (char_overlap(key, alias), canonical)),
            self.threshold,
        )
        .map(|(score, canonical)| NameMatch {
            canonical: canonical.to_string(),
            confidence: score,
            method: MatchMethod::Overlap,
        })
    }
}

/// Highest score at or above `threshold`; ties go to the lexically smaller
/// canonical name so the outcome never depends on iteration order.
fn best_candidate<'a>(
    candidates: impl Iterator<Item = (f64, &'a str)>,
    threshold: f64,
) -> Option<(f64, &'a str)> {
    candidates
        .filter(|(score, _)| *score >= threshold)
        .fold(None, |best: Option<(f64, &str)>, (score, canonical)| match best {
            Some((best_score, best_name))
                if best_score > score || (best_score == score && best_name <= canonical) =>
            {
                Some((best_score, best_name))
            }
            _ => Some((score, canonical)),
        })
        .map(|(score, canonical)| ((score * 100.0).round() / 100.0, canonical))
}

/// Ordered matcher list
pub struct MatcherChain {
    matchers: Vec<Box<dyn NameMatcher>>,
}

impl MatcherChain {
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// exact -> containment -> overlap
    pub fn standard(config: &ResolverConfig) -> Self {
        Self::new()
            .with_matcher(ExactMatcher)
            .with_matcher(ContainmentMatcher {
                threshold: config.contains_threshold,
            })
            .with_matcher(OverlapMatcher {
                threshold: config.overlap_threshold,
            })
    }

    pub fn with_matcher(mut self, matcher: impl NameMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Run the chain over a normalized key; `input` is echoed back unchanged
    /// when nothing matches
    pub fn run(&self, input: &str, key: &str, index: &AliasIndex) -> NameMatch {
        if key.is_empty() {
            return NameMatch::unmatched(input);
        }
        self.matchers
            .iter()
            .find_map(|matcher| matcher.try_match(key, index))
            .unwrap_or_else(|| NameMatch::unmatched(input))
    }
}

impl Default for MatcherChain {
    fn default() -> Self {
        Self::standard(&ResolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::normalize::Normalizer;
    use crate::resolver::AliasKind;
    use admit_core::AliasTable;

    fn index() -> AliasIndex {
        let table = AliasTable::new()
            .with("Hanguk University", ["HKU"])
            .with("Hanguk National University", ["Hanguk Natl Univ"])
            .with("Daehan University", Vec::<String>::new());
        AliasIndex::build(AliasKind::Institution, &table, &Normalizer::default()).unwrap()
    }

    #[test]
    fn test_exact_matcher() {
        let result = ExactMatcher.try_match("hku", &index()).unwrap();
        assert_eq!(result.canonical, "Hanguk University");
        assert_eq!(result.confidence, 100.0);
        assert!(ExactMatcher.try_match("hk", &index()).is_none());
    }

    #[test]
    fn test_containment_matcher_scores_length_ratio() {
        let matcher = ContainmentMatcher { threshold: 60.0 };
        // "daehanuniv" (10 chars) contains "daehanun" (8 chars) -> 80
        let result = matcher.try_match("daehanun", &index()).unwrap();
        assert_eq!(result.canonical, "Daehan University");
        assert_eq!(result.confidence, 80.0);

        // "hanguk" is contained in several keys but only reaches 60 against
        // "hangukuniv"; the national key is longer and scores lower
        let result = matcher.try_match("hanguk", &index()).unwrap();
        assert_eq!(result.canonical, "Hanguk University");
    }

    #[test]
    fn test_overlap_matcher_threshold() {
        let strict = OverlapMatcher { threshold: 95.0 };
        assert!(strict.try_match("daehnunvx", &index()).is_none());
        let lenient = OverlapMatcher { threshold: 70.0 };
        assert_eq!(
            lenient.try_match("daehnunvx", &index()).unwrap().canonical,
            "Daehan University"
        );
    }

    #[test]
    fn test_chain_order_and_fallthrough() {
        let chain = MatcherChain::default();
        assert_eq!(chain.names(), vec!["exact", "containment", "overlap"]);

        let exact = chain.run("HKU", "hku", &index());
        assert_eq!(exact.method, MatchMethod::Exact);

        let none = chain.run("Zzyzx", "zzyzx", &index());
        assert_eq!(none, NameMatch::unmatched("Zzyzx"));
        assert!(!none.is_match());
    }
}
