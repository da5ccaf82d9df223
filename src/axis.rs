//! Categorical axis cells and the classifier seam consumed by the cache

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::{CaseTable, Value};
use crate::util::{binary_search, compare_numeric};

/// Maps raw attribute values onto the cells of one categorical axis.
///
/// `None` from `cell_index` means the value belongs to no cell and the
/// case is excluded from binning — a routine outcome, never an error.
pub trait CellClassifier {
    /// Zero-based cell index for a raw value, or `None` if the value is
    /// invalid for this axis.
    fn cell_index(&self, value: &Value) -> Option<usize>;

    /// Number of cells on this axis. A configured axis is expected to
    /// have at least one cell; the cache clamps defensively.
    fn cell_count(&self) -> usize;
}

/// Cell layout derived from a column's distinct values.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum CellKeys {
    /// Distinct numeric values ascending (at most one NaN cell, last).
    Numeric(Vec<f64>),
    /// Distinct display strings in first-encounter order.
    Text {
        names: Vec<String>,
        lookup: HashMap<String, usize>,
    },
}

/// A categorical axis whose cells are the distinct values of a column.
///
/// If every non-missing value is numeric the cells are ordered
/// numerically; otherwise the cells are display strings in
/// first-encounter order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAxis {
    keys: CellKeys,
}

impl CategoryAxis {
    /// Build an axis with one cell per distinct non-missing value.
    pub fn from_values(values: &[Value]) -> Self {
        let present: Vec<&Value> = values.iter().filter(|v| !v.is_missing()).collect();
        let numeric: Option<Vec<f64>> = present.iter().map(|v| v.as_number()).collect();
        let keys = match numeric {
            Some(mut numbers) if !present.is_empty() => {
                numbers.sort_by(|a, b| compare_numeric(*a, *b));
                numbers.dedup_by(|a, b| compare_numeric(*a, *b) == Ordering::Equal);
                CellKeys::Numeric(numbers)
            }
            _ => {
                let mut names = Vec::new();
                let mut lookup = HashMap::new();
                for value in &present {
                    let name = value.display();
                    if !lookup.contains_key(&name) {
                        lookup.insert(name.clone(), names.len());
                        names.push(name);
                    }
                }
                CellKeys::Text { names, lookup }
            }
        };
        Self { keys }
    }

    /// Axis over the distinct values of one table column.
    pub fn for_attribute(table: &CaseTable, attr: usize) -> Option<Self> {
        table.column(attr).map(Self::from_values)
    }

    /// Label of one cell, for axis rendering.
    pub fn cell_label(&self, cell: usize) -> Option<String> {
        match &self.keys {
            CellKeys::Numeric(numbers) => {
                numbers.get(cell).map(|n| Value::Number(*n).display())
            }
            CellKeys::Text { names, .. } => names.get(cell).cloned(),
        }
    }
}

impl CellClassifier for CategoryAxis {
    fn cell_index(&self, value: &Value) -> Option<usize> {
        if value.is_missing() {
            return None;
        }
        match &self.keys {
            CellKeys::Numeric(numbers) => {
                let number = value.as_number()?;
                binary_search(numbers, &number, |a, b| compare_numeric(*a, *b))
            }
            CellKeys::Text { lookup, .. } => lookup.get(&value.display()).copied(),
        }
    }

    fn cell_count(&self) -> usize {
        match &self.keys {
            CellKeys::Numeric(numbers) => numbers.len(),
            CellKeys::Text { names, .. } => names.len(),
        }
    }
}
