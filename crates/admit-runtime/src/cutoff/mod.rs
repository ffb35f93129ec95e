//! Cutoff resolution
//!
//! Locates a program's column in the wide percentile table and reads the
//! safe, expected and risk thresholds off it. Both the column search and
//! the per-column thresholds are memoized for the resolver's lifetime.

mod column;
pub mod interpolate;

pub use column::ColumnMatch;

use crate::cache::{CacheStats, MemoCache};
use crate::config::CutoffConfig;
use crate::error::{Result, RuntimeError};
use crate::resolver::NameResolver;
use admit_core::{CutoffBands, CutoffResult, PercentileTable, ScoreAtPercentile};
use column::ColumnCatalog;
use std::sync::Arc;
use tracing::{debug, info};

type ColumnKey = (String, String, Option<String>);

/// Column and threshold lookup over one percentile table
pub struct CutoffResolver {
    table: Arc<PercentileTable>,
    resolver: Arc<NameResolver>,
    config: CutoffConfig,
    catalog: ColumnCatalog,
    columns: MemoCache<ColumnKey, ColumnMatch>,
    pairs: MemoCache<String, Arc<Vec<(f64, f64)>>>,
    cutoffs: MemoCache<String, CutoffBands>,
}

impl CutoffResolver {
    pub fn new(
        table: Arc<PercentileTable>,
        resolver: Arc<NameResolver>,
        config: CutoffConfig,
    ) -> Result<Self> {
        let bands = &config.bands;
        let in_range = |p: f64| (0.0..=100.0).contains(&p);
        if !(in_range(bands.safe) && in_range(bands.expected) && in_range(bands.risk)) {
            return Err(RuntimeError::config(
                "cutoff.bands",
                "band percentiles must be within 0-100",
            ));
        }
        if !(bands.safe <= bands.expected && bands.expected <= bands.risk) {
            return Err(RuntimeError::config(
                "cutoff.bands",
                format!(
                    "bands must satisfy safe <= expected <= risk, got {}/{}/{}",
                    bands.safe, bands.expected, bands.risk
                ),
            ));
        }
        if !(0.0..=100.0).contains(&config.fuzzy_threshold) {
            return Err(RuntimeError::config(
                "cutoff.fuzzy_threshold",
                format!("must be within 0-100, got {}", config.fuzzy_threshold),
            ));
        }

        let catalog = ColumnCatalog::new(&table, &resolver);
        info!("Cutoff resolver built over {} program columns", catalog.len());

        Ok(Self {
            table,
            resolver,
            config,
            catalog,
            columns: MemoCache::new(),
            pairs: MemoCache::new(),
            cutoffs: MemoCache::new(),
        })
    }

    pub fn config(&self) -> &CutoffConfig {
        &self.config
    }

    /// Locate the column for a program
    pub fn find_column(&self, institution: &str, major: &str, category: Option<&str>) -> ColumnMatch {
        let key = (
            institution.to_string(),
            major.to_string(),
            category.map(str::to_string),
        );
        self.columns.get_or_compute(key, || {
            self.catalog.find(
                &self.resolver,
                institution,
                major,
                category,
                self.config.fuzzy_threshold,
            )
        })
    }

    /// Safe, expected and risk thresholds of a column. All absent when the
    /// column is unknown or has fewer than two numeric rows.
    pub fn compute_cutoffs(&self, column: &str) -> CutoffBands {
        self.cutoffs.get_or_compute(column.to_string(), || {
            let pairs = self.sorted_pairs(column);
            if pairs.len() < 2 {
                debug!("Column '{}' has {} numeric rows, no cutoffs", column, pairs.len());
                return CutoffBands::absent();
            }
            interpolate::band_cutoffs(column, &pairs, &self.config.bands)
        })
    }

    /// Score a column holds at `percentile`
    pub fn get_score_at_percentile(&self, column: &str, percentile: f64) -> Option<ScoreAtPercentile> {
        interpolate::score_at(&self.sorted_pairs(column), percentile)
    }

    /// Find the program's column and its thresholds in one call
    pub fn resolve(&self, institution: &str, major: &str, category: Option<&str>) -> CutoffResult {
        let found = self.find_column(institution, major, category);
        match found.column {
            Some(column) => CutoffResult {
                found: true,
                cutoffs: self.compute_cutoffs(&column),
                column: Some(column),
                provenance: found.provenance,
            },
            None => CutoffResult::not_found(found.provenance),
        }
    }

    fn sorted_pairs(&self, column: &str) -> Arc<Vec<(f64, f64)>> {
        self.pairs.get_or_compute(column.to_string(), || {
            Arc::new(
                self.table
                    .reference_column(column)
                    .map(|c| interpolate::sorted_pairs(&c))
                    .unwrap_or_default(),
            )
        })
    }

    /// Column-search cache statistics
    pub fn column_cache_stats(&self) -> CacheStats {
        self.columns.stats()
    }

    /// Threshold cache statistics
    pub fn cutoff_cache_stats(&self) -> CacheStats {
        self.cutoffs.stats()
    }
}

impl std::fmt::Debug for CutoffResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CutoffResolver")
            .field("columns", &self.catalog.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PercentileBands, ResolverConfig};
    use admit_core::{AliasRegistry, AliasTable, Cell, MatchStage};

    fn cells(values: &[f64]) -> Vec<Cell> {
        values.iter().copied().map(Cell::from).collect()
    }

    fn resolver() -> Arc<NameResolver> {
        let registry = AliasRegistry::default()
            .with_institutions(AliasTable::new().with("Hanguk University", ["HKU"]));
        Arc::new(NameResolver::new(&registry, ResolverConfig::default()).unwrap())
    }

    fn table() -> Arc<PercentileTable> {
        let table = PercentileTable::new(cells(&[80.0, 0.0, 50.0, 94.0, 20.0]))
            .with_column("Hanguk University Physics", cells(&[50.0, 100.0, 70.0, 30.0, 90.0]))
            .unwrap()
            .with_column(
                "Hanguk University Sparse",
                vec![Cell::Empty, Cell::from(100.0), Cell::Empty, Cell::Empty, Cell::Empty],
            )
            .unwrap();
        Arc::new(table)
    }

    fn cutoff_resolver() -> CutoffResolver {
        CutoffResolver::new(table(), resolver(), CutoffConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_unsorted_axis() {
        let result = cutoff_resolver().resolve("HKU", "Physics", None);
        assert!(result.found);
        assert_eq!(result.column.as_deref(), Some("Hanguk University Physics"));
        assert_eq!(result.cutoffs.safe, Some(90.0));
        assert_eq!(result.cutoffs.expected, Some(70.0));
        assert_eq!(result.cutoffs.risk, Some(50.0));
        assert_eq!(result.provenance.stage, MatchStage::Exact);
    }

    #[test]
    fn test_sparse_column_has_no_cutoffs() {
        let bands = cutoff_resolver().compute_cutoffs("Hanguk University Sparse");
        assert!(bands.is_absent());
        assert!(cutoff_resolver().compute_cutoffs("missing").is_absent());
    }

    #[test]
    fn test_not_found_program() {
        let result = cutoff_resolver().resolve("HKU", "Chemistry", None);
        assert!(!result.found);
        assert_eq!(result.column, None);
        assert!(result.cutoffs.is_absent());
        assert_eq!(result.provenance.stage, MatchStage::NotFound);
    }

    #[test]
    fn test_get_score_at_percentile() {
        let resolver = cutoff_resolver();
        let exact = resolver
            .get_score_at_percentile("Hanguk University Physics", 50.0)
            .unwrap();
        assert_eq!(exact.score, 70.0);
        assert!(!exact.interpolated);

        let interpolated = resolver
            .get_score_at_percentile("Hanguk University Physics", 87.0)
            .unwrap();
        assert_eq!(interpolated.score, 40.0);
        assert!(interpolated.interpolated);

        assert!(resolver.get_score_at_percentile("missing", 50.0).is_none());
    }

    #[test]
    fn test_results_are_cached() {
        let resolver = cutoff_resolver();
        resolver.resolve("HKU", "Physics", None);
        resolver.resolve("HKU", "Physics", None);
        assert_eq!(resolver.column_cache_stats().hits, 1);
        assert_eq!(resolver.cutoff_cache_stats().hits, 1);
    }

    #[test]
    fn test_inverted_bands_are_rejected() {
        let config = CutoffConfig {
            bands: PercentileBands {
                safe: 60.0,
                expected: 50.0,
                risk: 80.0,
            },
            ..CutoffConfig::default()
        };
        let err = CutoffResolver::new(table(), resolver(), config).unwrap_err();
        assert!(err.to_string().contains("cutoff.bands"));
    }
}
