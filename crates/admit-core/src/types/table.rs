//! Reference tables
//!
//! Two shapes of static reference data are consumed:
//! - `PercentileTable`: a wide table whose first column is the percentile
//!   axis and whose remaining columns are named per program
//!   (institution + major + category encoded in the name).
//! - `IndexTable`: a tall table keyed by up to four numeric score columns
//!   and a category column, carrying derived composite values.

use super::cell::Cell;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Named score column of a percentile table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreColumn {
    pub name: String,
    pub values: Vec<Cell>,
}

/// Wide percentile table. The axis is not guaranteed to be sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentileTable {
    axis: Vec<Cell>,
    columns: Vec<ScoreColumn>,
}

impl PercentileTable {
    pub fn new(axis: Vec<Cell>) -> Self {
        Self {
            axis,
            columns: Vec::new(),
        }
    }

    /// Append a named score column aligned with the axis
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<Cell>) -> Result<()> {
        let name = name.into();
        if values.len() != self.axis.len() {
            return Err(CoreError::InvalidTable(format!(
                "column '{}' has {} rows but the percentile axis has {}",
                name,
                values.len(),
                self.axis.len()
            )));
        }
        if self.columns.iter().any(|c| c.name == name) {
            return Err(CoreError::InvalidTable(format!("duplicate column '{}'", name)));
        }
        self.columns.push(ScoreColumn { name, values });
        Ok(())
    }

    /// Builder-style `add_column`
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Cell>) -> Result<Self> {
        self.add_column(name, values)?;
        Ok(self)
    }

    pub fn axis(&self) -> &[Cell] {
        &self.axis
    }

    pub fn columns(&self) -> &[ScoreColumn] {
        &self.columns
    }

    /// Column names in table order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Extract the aligned (percentile, score) cells of a named column
    pub fn reference_column(&self, name: &str) -> Option<ReferenceColumn> {
        self.columns.iter().find(|c| c.name == name).map(|c| ReferenceColumn {
            id: c.name.clone(),
            pairs: self
                .axis
                .iter()
                .cloned()
                .zip(c.values.iter().cloned())
                .collect(),
        })
    }
}

/// One resolved program column with aligned (percentile, score) cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceColumn {
    pub id: String,
    pub pairs: Vec<(Cell, Cell)>,
}

impl ReferenceColumn {
    pub fn new(id: impl Into<String>, pairs: Vec<(Cell, Cell)>) -> Self {
        Self {
            id: id.into(),
            pairs,
        }
    }

    /// Numeric pairs only; rows where either side fails coercion are dropped
    pub fn numeric_pairs(&self) -> Vec<(f64, f64)> {
        self.pairs
            .iter()
            .filter_map(|(p, s)| Some((p.as_f64()?, s.as_f64()?)))
            .collect()
    }
}

/// Tall keyed table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl IndexTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CoreError::InvalidTable(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Builder-style `push_row`
    pub fn with_row(mut self, row: Vec<Cell>) -> Result<Self> {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_table_column_length_check() {
        let mut table = PercentileTable::new(vec![Cell::from(0.0), Cell::from(50.0)]);
        assert!(table.add_column("A", vec![Cell::from(100.0)]).is_err());
        assert!(table
            .add_column("A", vec![Cell::from(100.0), Cell::from(80.0)])
            .is_ok());
        assert!(table
            .add_column("A", vec![Cell::from(1.0), Cell::from(2.0)])
            .is_err());
    }

    #[test]
    fn test_reference_column_drops_non_numeric() {
        let table = PercentileTable::new(vec![
            Cell::from(0.0),
            Cell::from("x"),
            Cell::from(50.0),
            Cell::Empty,
        ])
        .with_column(
            "Hanguk Medicine natural",
            vec![
                Cell::from(100.0),
                Cell::from(95.0),
                Cell::from("70"),
                Cell::from(60.0),
            ],
        )
        .unwrap();

        let column = table.reference_column("Hanguk Medicine natural").unwrap();
        assert_eq!(column.pairs.len(), 4);
        assert_eq!(column.numeric_pairs(), vec![(0.0, 100.0), (50.0, 70.0)]);
        assert!(table.reference_column("missing").is_none());
    }

    #[test]
    fn test_index_table_row_width() {
        let mut table = IndexTable::new(["a", "b"]);
        assert!(table.push_row(vec![Cell::from(1.0)]).is_err());
        assert!(table.push_row(vec![Cell::from(1.0), Cell::from(2.0)]).is_ok());
        assert_eq!(table.len(), 1);
        assert_eq!(table.column_index("b"), Some(1));
        assert_eq!(table.cell(0, 1), Some(&Cell::from(2.0)));
    }
}
