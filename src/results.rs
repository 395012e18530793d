use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// A single row from a materialized query result.
///
/// Column names (and the name-to-index map) are shared across every row of
/// the owning [`ResultSet`]; the values are owned by the row. Each row is an
/// independent snapshot: rows never alias each other's value storage.
#[derive(Debug, Clone)]
pub struct DbRow {
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
    values: Vec<RowValues>,
}

impl DbRow {
    /// Get a value by column name, or `None` if the column doesn't exist.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.column_index
            .get(column_name)
            .and_then(|&idx| self.values.get(idx))
    }

    /// Get a value by column position, or `None` if out of bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }
}

/// The fully-materialized result of one query execution.
///
/// Rows are stored in the order the driver returned them. A query matching
/// zero rows produces an empty set (with column names still populated from
/// statement metadata), not an error.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
    rows: Vec<DbRow>,
}

impl ResultSet {
    /// Create an empty result set with known columns and row capacity.
    pub(crate) fn with_columns(column_names: Vec<String>, capacity: usize) -> Self {
        let column_index = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect::<HashMap<_, _>>();
        Self {
            column_names: Arc::new(column_names),
            column_index: Arc::new(column_index),
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append a row. `values` must be ordered to match the column names.
    pub(crate) fn push_row(&mut self, values: Vec<RowValues>) {
        self.rows.push(DbRow {
            column_names: Arc::clone(&self.column_names),
            column_index: Arc::clone(&self.column_index),
            values,
        });
    }

    #[must_use]
    pub fn rows(&self) -> &[DbRow] {
        &self.rows
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DbRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a DbRow;
    type IntoIter = std::slice::Iter<'a, DbRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
