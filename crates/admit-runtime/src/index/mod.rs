//! Reference table index
//!
//! Keyed lookup over the composite index table: four numeric score
//! dimensions plus a category label map to a composite percentile, rank and
//! cumulative percentile. When all four key columns exist the index is a
//! sorted composite map; otherwise it stays queryable through a linear scan.
//! A miss may fall back to the nearest row by Manhattan distance.

mod row;

use crate::cache::{CacheStats, MemoCache};
use crate::config::IndexKeySpec;
use crate::error::{Result, RuntimeError};
use admit_core::{IndexLookupResult, IndexTable};
use row::{category_key, quantize_all, ColumnLayout, IndexedRow};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// How exact lookups are served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMode {
    /// Sorted composite key over all four score dimensions
    MultiIndex,
    /// Row-by-row comparison over whichever dimensions exist
    LinearScan,
}

/// Index shape and cache statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub mode: IndexMode,
    pub rows: usize,
    pub usable_rows: usize,
    pub distinct_keys: usize,
    pub missing_columns: Vec<String>,
    pub cache: CacheStats,
}

type LookupKey = ([i64; 4], Option<String>, bool);

/// Immutable keyed index over an [`IndexTable`]
pub struct ReferenceIndex {
    spec: IndexKeySpec,
    layout: ColumnLayout,
    rows: Vec<IndexedRow>,
    total_rows: usize,
    /// Quantized key -> positions in `rows`, table order preserved
    keyed: BTreeMap<[i64; 4], Vec<usize>>,
    mode: IndexMode,
    missing_columns: Vec<String>,
    cache: MemoCache<LookupKey, IndexLookupResult>,
}

impl ReferenceIndex {
    /// Build the index. Fails only when the table carries none of the
    /// declared score columns.
    pub fn build(table: &IndexTable, spec: IndexKeySpec) -> Result<Self> {
        let find = |name: &str| table.column_index(name);

        let mut layout = ColumnLayout {
            category: find(&spec.category_column),
            composite_score: find(&spec.composite_score_column),
            composite_percentile: find(&spec.composite_percentile_column),
            rank: find(&spec.rank_column),
            cumulative_percentile: find(&spec.cumulative_percentile_column),
            ..ColumnLayout::default()
        };
        let mut missing_columns = Vec::new();
        for (slot, name) in layout.scores.iter_mut().zip(&spec.score_columns) {
            *slot = find(name);
            if slot.is_none() {
                missing_columns.push(name.clone());
            }
        }

        if layout.available_dims() == 0 {
            return Err(RuntimeError::config(
                "index table",
                format!(
                    "none of the key columns [{}] are present",
                    spec.score_columns.join(", ")
                ),
            ));
        }
        if layout.category.is_none() {
            warn!(
                "Index table has no '{}' column, category constraints will be ignored",
                spec.category_column
            );
            missing_columns.push(spec.category_column.clone());
        }

        let rows: Vec<IndexedRow> = (0..table.len())
            .map(|position| IndexedRow::coerce(table, &layout, position))
            .filter(|row| row.is_usable(&layout))
            .collect();

        let mut keyed: BTreeMap<[i64; 4], Vec<usize>> = BTreeMap::new();
        if layout.available_dims() == 4 {
            for (i, row) in rows.iter().enumerate() {
                if let Some(key) = row.full_key() {
                    keyed.entry(key).or_default().push(i);
                }
            }
        }

        let mode = if keyed.is_empty() {
            if layout.available_dims() < 4 {
                warn!(
                    "Index table missing key columns {:?}, using linear scan",
                    missing_columns
                );
            } else {
                warn!("Index table has no usable keyed rows, using linear scan");
            }
            IndexMode::LinearScan
        } else {
            IndexMode::MultiIndex
        };

        info!(
            "Reference index built: {} of {} rows usable, mode {:?}",
            rows.len(),
            table.len(),
            mode
        );

        Ok(Self {
            spec,
            layout,
            rows,
            total_rows: table.len(),
            keyed,
            mode,
            missing_columns,
            cache: MemoCache::new(),
        })
    }

    pub fn mode(&self) -> IndexMode {
        self.mode
    }

    pub fn use_multiindex(&self) -> bool {
        self.mode == IndexMode::MultiIndex
    }

    pub fn key_spec(&self) -> &IndexKeySpec {
        &self.spec
    }

    /// Look up four key scores within a category. On an exact miss with
    /// `allow_approx`, the nearest row by L1 distance is returned instead.
    /// Never fails; an unserviceable query is simply not found.
    pub fn lookup(
        &self,
        scores: [f64; 4],
        category: Option<&str>,
        allow_approx: bool,
    ) -> IndexLookupResult {
        let Some(key) = quantize_all(&scores) else {
            debug!("Index lookup with non-finite scores {:?}", scores);
            return IndexLookupResult::not_found();
        };
        // A category only constrains when the table has the column
        let category = category
            .filter(|_| self.layout.category.is_some())
            .map(category_key);

        self.cache
            .get_or_compute((key, category.clone(), allow_approx), || {
                self.compute(&key, &scores, category.as_deref(), allow_approx)
            })
    }

    fn compute(
        &self,
        key: &[i64; 4],
        scores: &[f64; 4],
        category: Option<&str>,
        allow_approx: bool,
    ) -> IndexLookupResult {
        if let Some(row) = self.find_exact(key, category) {
            return Self::result_from(row, true, None);
        }
        if !allow_approx {
            return IndexLookupResult::not_found();
        }

        match self.find_nearest(scores, category) {
            Some((row, distance)) => {
                debug!(
                    "Index miss for {:?}, nearest row {} at distance {}",
                    scores, row.position, distance
                );
                Self::result_from(row, false, Some(distance))
            }
            None => IndexLookupResult::not_found(),
        }
    }

    fn find_exact(&self, key: &[i64; 4], category: Option<&str>) -> Option<&IndexedRow> {
        match self.mode {
            IndexMode::MultiIndex => self
                .keyed
                .get(key)?
                .iter()
                .map(|&i| &self.rows[i])
                .find(|row| row.in_category(category)),
            IndexMode::LinearScan => self
                .rows
                .iter()
                .find(|row| row.matches(key) && row.in_category(category)),
        }
    }

    /// Earliest row at minimal distance
    fn find_nearest(&self, scores: &[f64; 4], category: Option<&str>) -> Option<(&IndexedRow, f64)> {
        self.rows
            .iter()
            .filter(|row| row.in_category(category))
            .map(|row| (row, row.distance(scores)))
            .fold(None, |best, (row, distance)| match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((row, distance)),
            })
    }

    fn result_from(row: &IndexedRow, exact: bool, distance: Option<f64>) -> IndexLookupResult {
        IndexLookupResult {
            found: true,
            exact,
            composite_score: row.composite_score,
            composite_percentile: row.composite_percentile,
            rank: row.rank,
            cumulative_percentile: row.cumulative_percentile,
            approximate: !exact,
            distance: distance.map(|d| (d * 100.0).round() / 100.0),
        }
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            mode: self.mode,
            rows: self.total_rows,
            usable_rows: self.rows.len(),
            distinct_keys: self.keyed.len(),
            missing_columns: self.missing_columns.clone(),
            cache: self.cache.stats(),
        }
    }
}

impl std::fmt::Debug for ReferenceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceIndex")
            .field("mode", &self.mode)
            .field("rows", &self.rows.len())
            .field("missing_columns", &self.missing_columns)
            .finish()
    }
}
