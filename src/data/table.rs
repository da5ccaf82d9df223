//! Case table: the dataset read by the binning engine
//!
//! Cases are stored column-major (one `Vec<Value>` per attribute), the
//! layout the rest of the crate reads them in. Each case carries a stable
//! `CaseId` that survives deletions of other cases; the sequential case
//! index is the position in the current order and shifts when earlier
//! cases are removed. Mutators return the `DataChange` notice describing
//! what they did, which the host forwards to any caches observing the
//! table.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::change::DataChange;
use crate::error::{ChartError, Result};
use crate::util::{find_index, set_difference};

/// Stable identity of one case. Never reused within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub u64);

/// One cell value. `Empty` is the single "missing" state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Empty,
    Number(f64),
    Text(String),
}

impl Value {
    /// Convenience constructor for text values.
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Convenience constructor for numeric values.
    pub fn number(number: f64) -> Self {
        Value::Number(number)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Numeric view of the value. Numeric text parses, everything else
    /// is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            Value::Text(text) => text.trim().parse().ok(),
            Value::Empty => None,
        }
    }

    /// Display form, also used as a categorical cell key.
    pub fn display(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Number(number) => number.to_string(),
            Value::Text(text) => text.clone(),
        }
    }
}

/// A named column of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
}

/// Ordered collection of cases with stable identities.
#[derive(Debug, Clone, Default)]
pub struct CaseTable {
    attrs: Vec<Attribute>,
    /// One value column per attribute, each parallel to `ids`.
    columns: Vec<Vec<Value>>,
    /// Case identities in sequential-index order.
    ids: Vec<CaseId>,
    index_by_id: HashMap<CaseId, usize>,
    next_id: u64,
}

impl CaseTable {
    /// Create an empty table with the given attribute names.
    pub fn new(names: &[&str]) -> Self {
        Self {
            attrs: names
                .iter()
                .map(|name| Attribute {
                    name: name.to_string(),
                })
                .collect(),
            columns: names.iter().map(|_| Vec::new()).collect(),
            ids: Vec::new(),
            index_by_id: HashMap::new(),
            next_id: 0,
        }
    }

    /// Build a table from pre-assembled value columns (the loader path).
    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<Value>>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(ChartError::Validation(format!(
                "{} attribute names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let case_count = columns.first().map(|column| column.len()).unwrap_or(0);
        if columns.iter().any(|column| column.len() != case_count) {
            return Err(ChartError::Validation(
                "columns have differing lengths".to_string(),
            ));
        }
        let ids: Vec<CaseId> = (0..case_count as u64).map(CaseId).collect();
        let index_by_id = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Ok(Self {
            attrs: names.into_iter().map(|name| Attribute { name }).collect(),
            columns,
            ids,
            index_by_id,
            next_id: case_count as u64,
        })
    }

    pub fn attr_count(&self) -> usize {
        self.attrs.len()
    }

    pub fn case_count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn attribute(&self, attr: usize) -> Option<&Attribute> {
        self.attrs.get(attr)
    }

    /// Column index of the attribute with the given name.
    pub fn attr_by_name(&self, name: &str) -> Option<usize> {
        find_index(&self.attrs, |attr| attr.name == name)
    }

    /// All values of one attribute, in case order.
    pub fn column(&self, attr: usize) -> Option<&[Value]> {
        self.columns.get(attr).map(|column| column.as_slice())
    }

    /// Value of one case for one attribute, by sequential case index.
    pub fn value(&self, case_index: usize, attr: usize) -> Option<&Value> {
        self.columns.get(attr)?.get(case_index)
    }

    /// Value of one case for one attribute, by identity.
    pub fn value_by_id(&self, id: CaseId, attr: usize) -> Option<&Value> {
        self.value(self.index_of(id)?, attr)
    }

    /// Identity of the case at the given sequential index.
    pub fn case_id(&self, case_index: usize) -> Option<CaseId> {
        self.ids.get(case_index).copied()
    }

    /// Current sequential index of a case identity.
    pub fn index_of(&self, id: CaseId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    /// Case identities in sequential-index order.
    pub fn ids(&self) -> &[CaseId] {
        &self.ids
    }

    /// Append one case. The returned notice is a pure append.
    pub fn append_case(&mut self, values: Vec<Value>) -> Result<DataChange> {
        self.append_cases(vec![values])
    }

    /// Append several cases at the end, in order.
    pub fn append_cases(&mut self, rows: Vec<Vec<Value>>) -> Result<DataChange> {
        for row in &rows {
            if row.len() != self.attrs.len() {
                return Err(ChartError::RowWidthMismatch {
                    expected: self.attrs.len(),
                    actual: row.len(),
                });
            }
        }
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let id = CaseId(self.next_id);
            self.next_id += 1;
            self.index_by_id.insert(id, self.ids.len());
            self.ids.push(id);
            for (attr, value) in row.into_iter().enumerate() {
                self.columns[attr].push(value);
            }
            ids.push(id);
        }
        Ok(DataChange::CasesAdded {
            ids,
            inserted_at_end: true,
        })
    }

    /// Overwrite one value. Returns the change notice for the edit.
    pub fn set_value(&mut self, id: CaseId, attr: usize, value: Value) -> Result<DataChange> {
        let case_index = self
            .index_of(id)
            .ok_or(ChartError::UnknownCase(id.0))?;
        if attr >= self.attrs.len() {
            return Err(ChartError::InvalidColumnIndex {
                index: attr,
                max: self.attrs.len(),
            });
        }
        self.columns[attr][case_index] = value;
        Ok(DataChange::CasesChanged { ids: vec![id] })
    }

    /// Remove the given cases. Unknown ids are ignored; surviving cases
    /// keep their identities and relative order, but their sequential
    /// indices shift.
    pub fn delete_cases(&mut self, ids: &[CaseId]) -> DataChange {
        let deleted: Vec<CaseId> = ids
            .iter()
            .copied()
            .filter(|id| self.index_by_id.contains_key(id))
            .collect();
        if !deleted.is_empty() {
            let mut survivors = set_difference(&self.ids, &deleted, |id| *id).into_owned();
            // set_difference order is unspecified; restore table order.
            survivors.sort_by_key(|id| self.index_by_id[id]);

            let mut columns: Vec<Vec<Value>> = (0..self.attrs.len())
                .map(|_| Vec::with_capacity(survivors.len()))
                .collect();
            for id in &survivors {
                let old_index = self.index_by_id[id];
                for (attr, column) in columns.iter_mut().enumerate() {
                    column.push(self.columns[attr][old_index].clone());
                }
            }
            self.columns = columns;
            self.ids = survivors;
            self.index_by_id = self.ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
            debug!("deleted {} cases, {} remain", deleted.len(), self.ids.len());
        }
        DataChange::CasesDeleted { ids: deleted }
    }

    /// Drop every case, keeping the attribute schema.
    pub fn clear(&mut self) -> DataChange {
        for column in &mut self.columns {
            column.clear();
        }
        self.ids.clear();
        self.index_by_id.clear();
        DataChange::ContextReset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_table() -> CaseTable {
        let mut table = CaseTable::new(&["fruit", "size"]);
        table
            .append_cases(vec![
                vec![Value::text("apple"), Value::text("small")],
                vec![Value::text("banana"), Value::text("large")],
                vec![Value::text("cherry"), Value::text("small")],
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_append_returns_pure_append_notice() {
        let mut table = CaseTable::new(&["fruit"]);
        let change = table.append_case(vec![Value::text("apple")]).unwrap();
        assert!(change.is_pure_append());
        match change {
            DataChange::CasesAdded { ids, .. } => {
                assert_eq!(ids, vec![CaseId(0)]);
                assert_eq!(table.index_of(CaseId(0)), Some(0));
            }
            other => panic!("unexpected notice: {other:?}"),
        }
    }

    #[test]
    fn test_row_width_checked() {
        let mut table = CaseTable::new(&["fruit", "size"]);
        let err = table.append_case(vec![Value::text("apple")]).unwrap_err();
        assert!(matches!(err, ChartError::RowWidthMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_attr_by_name() {
        let table = fruit_table();
        assert_eq!(table.attr_by_name("size"), Some(1));
        assert_eq!(table.attr_by_name("weight"), None);
    }

    #[test]
    fn test_value_access() {
        let table = fruit_table();
        assert_eq!(table.value(1, 0), Some(&Value::text("banana")));
        assert_eq!(table.value_by_id(CaseId(2), 1), Some(&Value::text("small")));
        assert_eq!(table.value(9, 0), None);
    }

    #[test]
    fn test_delete_shifts_indices_but_keeps_ids() {
        let mut table = fruit_table();
        let change = table.delete_cases(&[CaseId(0), CaseId(42)]);
        assert_eq!(
            change,
            DataChange::CasesDeleted {
                ids: vec![CaseId(0)]
            }
        );
        assert_eq!(table.case_count(), 2);
        // banana moved from index 1 to 0; its id is unchanged
        assert_eq!(table.case_id(0), Some(CaseId(1)));
        assert_eq!(table.index_of(CaseId(2)), Some(1));
        assert_eq!(table.value(0, 0), Some(&Value::text("banana")));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut table = fruit_table();
        table.delete_cases(&[CaseId(2)]);
        let change = table.append_case(vec![Value::text("date"), Value::text("small")]).unwrap();
        match change {
            DataChange::CasesAdded { ids, .. } => assert_eq!(ids, vec![CaseId(3)]),
            other => panic!("unexpected notice: {other:?}"),
        }
    }

    #[test]
    fn test_set_value() {
        let mut table = fruit_table();
        let change = table
            .set_value(CaseId(1), 1, Value::text("medium"))
            .unwrap();
        assert_eq!(
            change,
            DataChange::CasesChanged {
                ids: vec![CaseId(1)]
            }
        );
        assert_eq!(table.value(1, 1), Some(&Value::text("medium")));

        let err = table.set_value(CaseId(9), 1, Value::Empty).unwrap_err();
        assert!(matches!(err, ChartError::UnknownCase(9)));
    }

    #[test]
    fn test_clear_is_context_reset() {
        let mut table = fruit_table();
        assert_eq!(table.clear(), DataChange::ContextReset);
        assert!(table.is_empty());
        assert_eq!(table.attr_count(), 2);
    }

    #[test]
    fn test_value_as_number_parses_text() {
        assert_eq!(Value::text(" 42.5 ").as_number(), Some(42.5));
        assert_eq!(Value::number(7.0).as_number(), Some(7.0));
        assert_eq!(Value::text("tall").as_number(), None);
        assert_eq!(Value::Empty.as_number(), None);
    }

    #[test]
    fn test_from_columns_validates_shape() {
        let err = CaseTable::from_columns(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::number(1.0)], vec![]],
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::Validation(_)));
    }
}
