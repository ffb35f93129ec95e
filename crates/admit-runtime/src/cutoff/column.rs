//! Reference column matching
//!
//! Stages run from most to least specific and the first hit wins:
//! exact pattern, institution alias + major containment, the same with major
//! aliases, fuzzy similarity re-validated against an institution alias, and
//! a raw containment pass. A column is never matched on the institution
//! alone; the major (or one of its aliases) must co-occur.
//!
//! Each column is attributed to the registered institution whose longest
//! spelling it contains. Containment and fuzzy stages skip columns
//! attributed to a different institution than the one searched for.

use crate::resolver::similarity::bigram_dice;
use crate::resolver::{AliasKind, NameResolver};
use admit_core::{MatchAttempt, MatchProvenance, MatchStage, PercentileTable};
use tracing::debug;

/// Result of a column search
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMatch {
    pub column: Option<String>,
    pub provenance: MatchProvenance,
}

impl ColumnMatch {
    pub fn is_found(&self) -> bool {
        self.column.is_some()
    }
}

#[derive(Debug, Clone)]
struct ColumnEntry {
    name: String,
    normalized: String,
    lowered: String,
    /// Canonical institution of the longest registered spelling in the name
    owner: Option<String>,
}

impl ColumnEntry {
    fn belongs_to(&self, institution: Option<&str>) -> bool {
        match &self.owner {
            Some(owner) => institution == Some(owner.as_str()),
            None => true,
        }
    }
}

/// A spelling together with its normalized key
#[derive(Debug, Clone)]
struct Spelling {
    text: String,
    key: String,
}

/// Pre-normalized column names of a percentile table
#[derive(Debug, Clone)]
pub(crate) struct ColumnCatalog {
    entries: Vec<ColumnEntry>,
}

impl ColumnCatalog {
    pub fn new(table: &PercentileTable, resolver: &NameResolver) -> Self {
        let institutions = resolver.index(AliasKind::Institution);
        let entries = table
            .column_names()
            .map(|name| {
                let normalized = resolver.normalize(name);
                let owner = institutions
                    .entries()
                    .filter(|(key, _)| normalized.contains(key))
                    .max_by_key(|(key, _)| key.chars().count())
                    .map(|(_, canonical)| canonical.to_string());
                ColumnEntry {
                    name: name.to_string(),
                    lowered: name.to_lowercase(),
                    normalized,
                    owner,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn find(
        &self,
        resolver: &NameResolver,
        institution: &str,
        major: &str,
        category: Option<&str>,
        fuzzy_threshold: f64,
    ) -> ColumnMatch {
        let search = Search::new(resolver, institution, major, category);
        let mut attempts = Vec::new();

        let stages: [(MatchStage, &dyn Fn() -> Option<Hit>); 5] = [
            (MatchStage::Exact, &|| self.exact(&search)),
            (MatchStage::Contains, &|| self.contains(&search, &search.major)),
            (MatchStage::Alias, &|| {
                search
                    .major_aliases
                    .iter()
                    .find_map(|alias| self.contains(&search, alias))
            }),
            (MatchStage::Fuzzy, &|| self.fuzzy(&search, fuzzy_threshold)),
            (MatchStage::RawContains, &|| self.raw_contains(&search, institution, major)),
        ];

        for (stage, run) in stages {
            let hit = run();
            let matched = hit.as_ref().map_or(false, |h| h.column.is_some());
            let (alias_used, fuzzy_score) = hit
                .as_ref()
                .map(|h| (h.alias_used.clone(), h.fuzzy_score))
                .unwrap_or((None, None));

            debug!(
                "Column stage {} for ({}, {}, {:?}): matched={}",
                stage.as_str(),
                institution,
                major,
                category,
                matched
            );
            attempts.push(MatchAttempt {
                stage,
                matched,
                alias_used: alias_used.clone(),
                fuzzy_score,
            });

            if let Some(Hit {
                column: Some(index),
                ..
            }) = hit
            {
                return ColumnMatch {
                    column: Some(self.entries[index].name.clone()),
                    provenance: MatchProvenance {
                        stage,
                        alias_used,
                        fuzzy_score,
                        attempts,
                    },
                };
            }
        }

        attempts.push(MatchAttempt {
            stage: MatchStage::NotFound,
            matched: false,
            alias_used: None,
            fuzzy_score: None,
        });
        ColumnMatch {
            column: None,
            provenance: MatchProvenance::not_found(attempts),
        }
    }

    /// Whole-name equality against institution x major (x category) patterns
    fn exact(&self, search: &Search) -> Option<Hit> {
        for inst in &search.institutions {
            let mut patterns = Vec::with_capacity(2);
            if let Some(category) = &search.category {
                patterns.push(format!("{}{}{}", inst.key, search.major.key, category));
            }
            patterns.push(format!("{}{}", inst.key, search.major.key));

            for pattern in patterns {
                if let Some(index) = self.entries.iter().position(|e| e.normalized == pattern) {
                    return Some(Hit::column(index, Some(inst.text.clone())));
                }
            }
        }
        None
    }

    /// Columns containing an institution spelling and `major` (and the
    /// category when one is given). Longer institution spellings are tried
    /// first; among matches the shortest column name wins.
    fn contains(&self, search: &Search, major: &Spelling) -> Option<Hit> {
        if major.key.is_empty() {
            return None;
        }
        let categories: Vec<Option<&str>> = match &search.category {
            Some(category) => vec![Some(category.as_str()), None],
            None => vec![None],
        };

        for category in categories {
            for inst in &search.institutions {
                let found = self.shortest(|entry| {
                    entry.belongs_to(search.owner.as_deref())
                        && entry.normalized.contains(&inst.key)
                        && entry.normalized.contains(&major.key)
                        && category.map_or(true, |c| entry.normalized.contains(c))
                });
                if let Some(index) = found {
                    let alias = if major.text == search.major.text {
                        inst.text.clone()
                    } else {
                        major.text.clone()
                    };
                    return Some(Hit::column(index, Some(alias)));
                }
            }
        }
        None
    }

    /// Best bigram similarity to the canonical pattern, only accepted when the
    /// column still names one of the institution spellings
    fn fuzzy(&self, search: &Search, threshold: f64) -> Option<Hit> {
        let target = format!(
            "{}{}{}",
            search.canonical_institution,
            search.canonical_major,
            search.category.as_deref().unwrap_or("")
        );
        let mut best: Option<(usize, f64)> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            if !entry.belongs_to(search.owner.as_deref()) {
                continue;
            }
            let score = bigram_dice(&target, &entry.normalized);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((index, score));
            }
        }

        let (index, score) = best?;
        let score = (score * 100.0).round() / 100.0;
        let entry = &self.entries[index];
        let institution = search
            .institutions
            .iter()
            .find(|inst| entry.normalized.contains(&inst.key));

        match institution {
            Some(inst) if score >= threshold => Some(Hit {
                column: Some(index),
                alias_used: Some(inst.text.clone()),
                fuzzy_score: Some(score),
            }),
            _ => Some(Hit {
                column: None,
                alias_used: None,
                fuzzy_score: Some(score),
            }),
        }
    }

    /// Case-insensitive containment of the raw, unnormalized names
    fn raw_contains(&self, search: &Search, institution: &str, major: &str) -> Option<Hit> {
        let institution = institution.trim().to_lowercase();
        let major = major.trim().to_lowercase();
        if institution.is_empty() || major.is_empty() {
            return None;
        }
        self.shortest(|entry| {
            entry.belongs_to(search.owner.as_deref())
                && entry.lowered.contains(&institution)
                && entry.lowered.contains(&major)
        })
            .map(|index| Hit::column(index, None))
    }

    /// Shortest matching column name, ties in table order
    fn shortest(&self, predicate: impl Fn(&ColumnEntry) -> bool) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| predicate(entry))
            .min_by_key(|(index, entry)| (entry.normalized.chars().count(), *index))
            .map(|(index, _)| index)
    }
}

/// Outcome of one stage; a stage may report a score without a column
struct Hit {
    column: Option<usize>,
    alias_used: Option<String>,
    fuzzy_score: Option<f64>,
}

impl Hit {
    fn column(index: usize, alias_used: Option<String>) -> Self {
        Self {
            column: Some(index),
            alias_used,
            fuzzy_score: None,
        }
    }
}

/// Normalized inputs of one column search
struct Search {
    /// Institution spellings, longest key first
    institutions: Vec<Spelling>,
    major: Spelling,
    /// Registered major aliases other than the input itself
    major_aliases: Vec<Spelling>,
    category: Option<String>,
    /// Registered canonical of the searched institution
    owner: Option<String>,
    canonical_institution: String,
    canonical_major: String,
}

impl Search {
    fn new(resolver: &NameResolver, institution: &str, major: &str, category: Option<&str>) -> Self {
        let spellings = |names: Vec<String>, extra: &str| {
            let mut out: Vec<Spelling> = Vec::new();
            for text in std::iter::once(extra.to_string()).chain(names) {
                let key = resolver.normalize(&text);
                if !key.is_empty() && !out.iter().any(|s| s.key == key) {
                    out.push(Spelling { text, key });
                }
            }
            out
        };

        let mut institutions = spellings(
            resolver.aliases_of(institution, AliasKind::Institution),
            institution,
        );
        institutions.sort_by(|a, b| {
            b.key
                .chars()
                .count()
                .cmp(&a.key.chars().count())
                .then_with(|| a.key.cmp(&b.key))
        });

        let major_spelling = Spelling {
            text: major.to_string(),
            key: resolver.normalize(major),
        };
        let mut major_aliases: Vec<Spelling> = spellings(resolver.aliases_of(major, AliasKind::Major), major)
            .into_iter()
            .filter(|s| s.key != major_spelling.key)
            .collect();
        major_aliases.sort_by(|a, b| b.key.chars().count().cmp(&a.key.chars().count()));

        Self {
            institutions,
            major: major_spelling,
            major_aliases,
            category: category.map(|c| resolver.normalize(c)).filter(|c| !c.is_empty()),
            owner: resolver
                .index(AliasKind::Institution)
                .get(&resolver.normalize(institution))
                .map(str::to_string),
            canonical_institution: resolver.normalize(&resolver.resolve(institution, AliasKind::Institution)),
            canonical_major: resolver.normalize(&resolver.resolve(major, AliasKind::Major)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use admit_core::{AliasRegistry, AliasTable, Cell};

    fn resolver() -> NameResolver {
        let registry = AliasRegistry::default()
            .with_institutions(
                AliasTable::new()
                    .with("Hanguk University", ["HKU"])
                    .with("Hanguk National University", ["HNU"]),
            )
            .with_majors(AliasTable::new().with("Medicine", ["Pre-Med", "의예과"]));
        NameResolver::new(&registry, ResolverConfig::default()).unwrap()
    }

    fn catalog(names: &[&str], resolver: &NameResolver) -> ColumnCatalog {
        let mut table = PercentileTable::new(vec![Cell::from(0.0), Cell::from(100.0)]);
        for name in names {
            table
                .add_column(*name, vec![Cell::from(100.0), Cell::from(0.0)])
                .unwrap();
        }
        ColumnCatalog::new(&table, resolver)
    }

    #[test]
    fn test_exact_stage_prefers_category_pattern() {
        let resolver = resolver();
        let catalog = catalog(
            &["Hanguk University Medicine", "Hanguk University Medicine Natural"],
            &resolver,
        );
        let found = catalog.find(&resolver, "HKU", "Medicine", Some("natural"), 80.0);
        assert_eq!(found.column.as_deref(), Some("Hanguk University Medicine Natural"));
        assert_eq!(found.provenance.stage, MatchStage::Exact);
        assert_eq!(found.provenance.attempts.len(), 1);
    }

    #[test]
    fn test_contains_prefers_longer_institution_alias() {
        let resolver = resolver();
        let catalog = catalog(
            &[
                "2025 Hanguk University Medicine (natural)",
                "2025 Hanguk National University Medicine (natural)",
            ],
            &resolver,
        );
        let found = catalog.find(&resolver, "HNU", "Medicine", Some("natural"), 80.0);
        assert_eq!(
            found.column.as_deref(),
            Some("2025 Hanguk National University Medicine (natural)")
        );
        assert_eq!(found.provenance.stage, MatchStage::Contains);
    }

    #[test]
    fn test_contains_skips_columns_of_longer_named_institution() {
        let registry = AliasRegistry::default().with_institutions(
            AliasTable::new()
                .with("Hanguk University", ["HKU"])
                .with("Hanguk University of Foreign Studies", ["HUFS"]),
        );
        let resolver = NameResolver::new(&registry, ResolverConfig::default()).unwrap();
        let both = catalog(
            &[
                "2025 Hanguk University Law",
                "2025 Hanguk University of Foreign Studies Law natural",
            ],
            &resolver,
        );

        let found = both.find(&resolver, "Hanguk University", "Law", Some("natural"), 80.0);
        assert_eq!(found.column.as_deref(), Some("2025 Hanguk University Law"));
        assert_eq!(found.provenance.stage, MatchStage::Contains);

        let foreign = both.find(&resolver, "HUFS", "Law", Some("natural"), 80.0);
        assert_eq!(
            foreign.column.as_deref(),
            Some("2025 Hanguk University of Foreign Studies Law natural")
        );

        let only_foreign = catalog(
            &["2025 Hanguk University of Foreign Studies Law natural"],
            &resolver,
        );
        let missing = only_foreign.find(&resolver, "Hanguk University", "Law", None, 80.0);
        assert!(!missing.is_found());
    }

    #[test]
    fn test_major_alias_stage() {
        let resolver = resolver();
        let catalog = catalog(&["Hanguk University 의예과 자연"], &resolver);
        let found = catalog.find(&resolver, "Hanguk University", "Medicine", None, 80.0);
        assert_eq!(found.provenance.stage, MatchStage::Alias);
        assert_eq!(found.provenance.alias_used.as_deref(), Some("의예과"));
    }

    #[test]
    fn test_institution_alone_never_matches() {
        let resolver = resolver();
        let catalog = catalog(&["Hanguk University Law"], &resolver);
        let found = catalog.find(&resolver, "Hanguk University", "Medicine", None, 80.0);
        assert!(!found.is_found());
        assert_eq!(found.provenance.stage, MatchStage::NotFound);
        let stages: Vec<MatchStage> = found.provenance.attempts.iter().map(|a| a.stage).collect();
        assert_eq!(
            stages,
            vec![
                MatchStage::Exact,
                MatchStage::Contains,
                MatchStage::Alias,
                MatchStage::Fuzzy,
                MatchStage::RawContains,
                MatchStage::NotFound,
            ]
        );
    }

    #[test]
    fn test_fuzzy_stage_tolerates_typo() {
        let resolver = resolver();
        let catalog = catalog(&["Hanguk University Medecine"], &resolver);
        let found = catalog.find(&resolver, "Hanguk University", "Medicine", None, 80.0);
        assert_eq!(found.column.as_deref(), Some("Hanguk University Medecine"));
        assert_eq!(found.provenance.stage, MatchStage::Fuzzy);
        assert!(found.provenance.fuzzy_score.unwrap() >= 80.0);
    }
}
