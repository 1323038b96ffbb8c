//! In-memory table: ordered rows of column-name to cell mappings

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::cell::{CellValue, UNKNOWN};
use crate::tabular::TableError;

/// One row: column name to cell. Missing keys read as `Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell, `Unknown` when the row has no such key
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&UNKNOWN)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Builder-style `set`
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut CellValue)> {
        self.cells.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered table. The column list is the union of all row keys in first-seen
/// order and drives output ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table with a fixed header
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    fn register_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }

    /// Append a row, registering any keys not yet in the header
    pub fn push_row(&mut self, row: Row) {
        for key in row.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.to_string());
            }
        }
        self.rows.push(row);
    }

    pub fn extend_rows(&mut self, rows: impl IntoIterator<Item = Row>) {
        for row in rows {
            self.push_row(row);
        }
    }

    /// Cells of one column, `Unknown` where a row lacks the key
    pub fn column(&self, column: &str) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().map(move |row| row.get(column))
    }

    /// Replace every cell of `column` with `f(old)`. The column is added if new.
    ///
    /// Returns the number of cells whose value changed.
    pub fn map_column<F>(&mut self, column: &str, mut f: F) -> usize
    where
        F: FnMut(&CellValue) -> CellValue,
    {
        self.register_column(column);
        let mut changed = 0;
        for row in &mut self.rows {
            let next = f(row.get(column));
            if *row.get(column) != next {
                changed += 1;
            }
            row.set(column, next);
        }
        changed
    }

    /// Set `column` on every row from a row-level function. The column is added if new.
    pub fn set_column<F>(&mut self, column: &str, mut f: F)
    where
        F: FnMut(&Row) -> CellValue,
    {
        self.register_column(column);
        for row in &mut self.rows {
            let value = f(row);
            row.set(column, value);
        }
    }

    /// Keep rows matching the predicate, preserving order. Returns rows removed.
    pub fn retain<F>(&mut self, f: F) -> usize
    where
        F: FnMut(&Row) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(f);
        before - self.rows.len()
    }

    /// Project to exactly the given ordered columns.
    ///
    /// # Errors
    ///
    /// `TableError::MissingColumn` when a requested column is not in the header.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table, TableError> {
        if let Some(missing) = columns.iter().find(|c| !self.has_column(c.as_ref())) {
            return Err(TableError::MissingColumn {
                column: missing.as_ref().to_string(),
            });
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| (c.as_ref().to_string(), row.get(c.as_ref()).clone()))
                    .collect::<Row>()
            })
            .collect();

        Ok(Table {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows,
        })
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        let mut table = Table::new();
        table.extend_rows(iter);
        table
    }
}
