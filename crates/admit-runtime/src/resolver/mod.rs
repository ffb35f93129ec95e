//! Name resolution
//!
//! Maps free-text institution, major and subject names onto the canonical
//! names of the reference data. `resolve` only ever accepts an exact
//! normalized hit; `match_name` escalates through the matcher chain and
//! reports how confident it is.

mod alias;
mod matcher;
pub mod normalize;
pub mod similarity;

pub use alias::AliasIndex;
pub use matcher::{
    ContainmentMatcher, ExactMatcher, MatchMethod, MatcherChain, NameMatch, NameMatcher,
    OverlapMatcher,
};
pub use normalize::Normalizer;

use crate::cache::{CacheStats, MemoCache};
use crate::config::ResolverConfig;
use crate::error::{Result, RuntimeError};
use admit_core::AliasRegistry;
use serde::Serialize;
use tracing::{debug, info};

/// Which alias table a name is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasKind {
    Institution,
    Major,
    Subject,
}

impl AliasKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AliasKind::Institution => "institution",
            AliasKind::Major => "major",
            AliasKind::Subject => "subject",
        }
    }
}

/// Alias-backed resolver for the three name vocabularies
pub struct NameResolver {
    normalizer: Normalizer,
    institutions: AliasIndex,
    majors: AliasIndex,
    subjects: AliasIndex,
    chain: MatcherChain,
    resolved: MemoCache<(AliasKind, String), String>,
}

impl NameResolver {
    /// Build the reverse maps for every table in `registry`
    pub fn new(registry: &AliasRegistry, config: ResolverConfig) -> Result<Self> {
        for (name, value) in [
            ("contains_threshold", config.contains_threshold),
            ("overlap_threshold", config.overlap_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(RuntimeError::config(
                    format!("resolver.{}", name),
                    format!("must be within 0-100, got {}", value),
                ));
            }
        }

        let normalizer = Normalizer::new(&config.legal_forms);
        let institutions =
            AliasIndex::build(AliasKind::Institution, &registry.institutions, &normalizer)?;
        let majors = AliasIndex::build(AliasKind::Major, &registry.majors, &normalizer)?;
        let subjects = AliasIndex::build(AliasKind::Subject, &registry.subjects, &normalizer)?;

        info!(
            institutions = institutions.len(),
            majors = majors.len(),
            subjects = subjects.len(),
            "name resolver built"
        );

        Ok(Self {
            chain: MatcherChain::standard(&config),
            normalizer,
            institutions,
            majors,
            subjects,
            resolved: MemoCache::new(),
        })
    }

    /// Resolver with empty tables; every `resolve` is the identity
    pub fn empty() -> Self {
        Self {
            normalizer: Normalizer::default(),
            institutions: AliasIndex::default(),
            majors: AliasIndex::default(),
            subjects: AliasIndex::default(),
            chain: MatcherChain::default(),
            resolved: MemoCache::new(),
        }
    }

    pub fn normalize(&self, name: &str) -> String {
        self.normalizer.normalize(name)
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn index(&self, kind: AliasKind) -> &AliasIndex {
        match kind {
            AliasKind::Institution => &self.institutions,
            AliasKind::Major => &self.majors,
            AliasKind::Subject => &self.subjects,
        }
    }

    /// Canonical name on an exact normalized hit, otherwise `name` unchanged
    pub fn resolve(&self, name: &str, kind: AliasKind) -> String {
        self.resolved
            .get_or_compute((kind, name.to_string()), || {
                let key = self.normalizer.normalize(name);
                match self.index(kind).get(&key) {
                    Some(canonical) => canonical.to_string(),
                    None => {
                        debug!(kind = kind.as_str(), name = %name, "no alias entry");
                        name.to_string()
                    }
                }
            })
    }

    /// True if `name` normalizes onto a registered key
    pub fn is_registered(&self, name: &str, kind: AliasKind) -> bool {
        self.index(kind)
            .get(&self.normalizer.normalize(name))
            .is_some()
    }

    /// Best canonical for `text` with a 0-100 confidence
    pub fn match_name(&self, text: &str, kind: AliasKind) -> NameMatch {
        let key = self.normalizer.normalize(text);
        let result = self.chain.run(text, &key, self.index(kind));
        debug!(
            kind = kind.as_str(),
            input = %text,
            canonical = %result.canonical,
            confidence = result.confidence,
            method = ?result.method,
            "name matched"
        );
        result
    }

    /// Canonical name followed by its aliases; `[name]` when unregistered
    pub fn aliases_of(&self, name: &str, kind: AliasKind) -> Vec<String> {
        let canonical = self.resolve(name, kind);
        match self.index(kind).names_of(&canonical) {
            Some(names) => names.to_vec(),
            None => vec![name.to_string()],
        }
    }

    pub fn canonicals(&self, kind: AliasKind) -> Vec<String> {
        self.index(kind).canonicals().map(str::to_string).collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.resolved.stats()
    }
}

impl std::fmt::Debug for NameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameResolver")
            .field("institutions", &self.institutions.len())
            .field("majors", &self.majors.len())
            .field("subjects", &self.subjects.len())
            .field("matchers", &self.chain.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admit_core::AliasTable;

    fn registry() -> AliasRegistry {
        AliasRegistry::default()
            .with_institutions(
                AliasTable::new()
                    .with("Hanguk University", ["HKU", "한국대학교"])
                    .with("Hanguk National University", ["HNU"]),
            )
            .with_majors(AliasTable::new().with("Medicine", ["의예과", "Pre-Med"]))
            .with_subjects(AliasTable::new().with("Physics I", ["물리학I", "Physics 1"]))
    }

    fn resolver() -> NameResolver {
        NameResolver::new(&registry(), ResolverConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_alias_and_canonical() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("hku", AliasKind::Institution), "Hanguk University");
        assert_eq!(resolver.resolve("한국 대학교", AliasKind::Institution), "Hanguk University");
        assert_eq!(resolver.resolve("Hanguk  University.", AliasKind::Institution), "Hanguk University");
        assert_eq!(resolver.resolve("pre med", AliasKind::Major), "Medicine");
        assert_eq!(resolver.resolve("physics 1", AliasKind::Subject), "Physics I");
    }

    #[test]
    fn test_resolve_never_guesses_by_containment() {
        let resolver = resolver();
        // "Hanguk" is a prefix of both registered institutions
        assert_eq!(resolver.resolve("Hanguk", AliasKind::Institution), "Hanguk");
        assert!(!resolver.is_registered("Hanguk", AliasKind::Institution));
    }

    #[test]
    fn test_resolve_is_scoped_per_table() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("HKU", AliasKind::Major), "HKU");
    }

    #[test]
    fn test_resolve_is_memoized() {
        let resolver = resolver();
        resolver.resolve("HKU", AliasKind::Institution);
        resolver.resolve("HKU", AliasKind::Institution);
        let stats = resolver.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_match_name_escalation() {
        let resolver = resolver();

        let exact = resolver.match_name("HNU", AliasKind::Institution);
        assert_eq!(exact.canonical, "Hanguk National University");
        assert_eq!(exact.method, MatchMethod::Exact);

        // "medicin" sits inside "medicine": 7/8 = 87.5
        let contained = resolver.match_name("Medicin", AliasKind::Major);
        assert_eq!(contained.canonical, "Medicine");
        assert_eq!(contained.method, MatchMethod::Containment);
        assert_eq!(contained.confidence, 87.5);

        let unmatched = resolver.match_name("Law", AliasKind::Major);
        assert_eq!(unmatched.canonical, "Law");
        assert_eq!(unmatched.confidence, 0.0);
    }

    #[test]
    fn test_aliases_of() {
        let resolver = resolver();
        let names = resolver.aliases_of("HKU", AliasKind::Institution);
        assert_eq!(names[0], "Hanguk University");
        assert!(names.contains(&"한국대학교".to_string()));
        assert_eq!(
            resolver.aliases_of("Unknown College", AliasKind::Institution),
            vec!["Unknown College".to_string()]
        );
    }

    #[test]
    fn test_invalid_threshold_is_configuration_error() {
        let config = ResolverConfig::default().with_overlap_threshold(120.0);
        let err = NameResolver::new(&registry(), config).unwrap_err();
        assert!(err.to_string().contains("resolver.overlap_threshold"));
    }
}
