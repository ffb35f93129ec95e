//! Row coercion and key quantization

use admit_core::{Cell, IndexTable};

/// Key dimensions are compared at two decimal places
pub(crate) const KEY_SCALE: f64 = 100.0;

/// Quantize one score for the sorted key. `None` for non-finite input.
pub(crate) fn quantize(value: f64) -> Option<i64> {
    if value.is_finite() {
        Some((value * KEY_SCALE).round() as i64)
    } else {
        None
    }
}

pub(crate) fn quantize_all(scores: &[f64; 4]) -> Option<[i64; 4]> {
    let mut key = [0i64; 4];
    for (slot, score) in key.iter_mut().zip(scores) {
        *slot = quantize(*score)?;
    }
    Some(key)
}

/// Category labels compare trimmed and case-folded
pub(crate) fn category_key(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Resolved column positions of an index table
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnLayout {
    pub scores: [Option<usize>; 4],
    pub category: Option<usize>,
    pub composite_score: Option<usize>,
    pub composite_percentile: Option<usize>,
    pub rank: Option<usize>,
    pub cumulative_percentile: Option<usize>,
}

impl ColumnLayout {
    pub fn available_dims(&self) -> usize {
        self.scores.iter().filter(|c| c.is_some()).count()
    }
}

/// A table row with every cell the index needs already coerced
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IndexedRow {
    pub position: usize,
    pub dims: [Option<f64>; 4],
    pub category: Option<String>,
    pub composite_score: Option<f64>,
    pub composite_percentile: Option<f64>,
    pub rank: Option<f64>,
    pub cumulative_percentile: Option<f64>,
}

impl IndexedRow {
    pub fn coerce(table: &IndexTable, layout: &ColumnLayout, position: usize) -> Self {
        let number = |column: Option<usize>| {
            column
                .and_then(|c| table.cell(position, c))
                .and_then(Cell::as_f64)
        };

        let mut dims = [None; 4];
        for (dim, column) in dims.iter_mut().zip(layout.scores) {
            *dim = number(column);
        }

        let category = layout
            .category
            .and_then(|c| table.cell(position, c))
            .and_then(|cell| match cell {
                Cell::Empty => None,
                Cell::Number(n) => Some(n.to_string()),
                Cell::Text(t) => Some(category_key(t)),
            })
            .filter(|c| !c.is_empty());

        Self {
            position,
            dims,
            category,
            composite_score: number(layout.composite_score),
            composite_percentile: number(layout.composite_percentile),
            rank: number(layout.rank),
            cumulative_percentile: number(layout.cumulative_percentile),
        }
    }

    /// True if every dimension whose column exists carries a number
    pub fn is_usable(&self, layout: &ColumnLayout) -> bool {
        layout
            .scores
            .iter()
            .zip(self.dims)
            .all(|(column, dim)| column.is_none() || dim.is_some())
            && layout.available_dims() > 0
    }

    /// Quantized key when all four dimensions are present
    pub fn full_key(&self) -> Option<[i64; 4]> {
        let mut key = [0i64; 4];
        for (slot, dim) in key.iter_mut().zip(self.dims) {
            *slot = quantize(dim?)?;
        }
        Some(key)
    }

    /// Key equality over the dimensions that exist in the table
    pub fn matches(&self, query: &[i64; 4]) -> bool {
        self.dims.iter().zip(query).all(|(dim, q)| match dim {
            Some(value) => quantize(*value) == Some(*q),
            None => true,
        })
    }

    /// Manhattan distance over the dimensions that exist in the table
    pub fn distance(&self, query: &[f64; 4]) -> f64 {
        self.dims
            .iter()
            .zip(query)
            .filter_map(|(dim, q)| dim.map(|value| (value - q).abs()))
            .sum()
    }

    pub fn in_category(&self, category: Option<&str>) -> bool {
        match category {
            Some(wanted) => self.category.as_deref() == Some(wanted),
            None => true,
        }
    }
}
