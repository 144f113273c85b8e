//! In-memory table: an ordered sequence of rows sharing one [`Schema`].
//!
//! Every operation that changes rows or columns returns a new `Table`; the
//! receiver is never modified, so a loaded base table can be shared behind an
//! `Arc` and reused across renders.

use serde::Serialize;

use crate::{
    data::{Cell, Value, coerce_numeric, parse_cell},
    schema::{ColumnMeta, Schema, dedupe_headers},
};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Builds a table, inferring column kinds from the cells. Duplicate
    /// headers are made unique and short rows are padded with missing cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let (headers, _) = dedupe_headers(&headers);
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect::<Vec<_>>();
        let schema = Schema::infer(&headers, &rows);
        Self { schema, rows }
    }

    /// Builds a table from raw field text the way the loader does. Column kinds
    /// are decided per column, and cells of a text column keep their raw text
    /// even when they would parse as numbers (a district named `007` stays `007`).
    pub fn from_raw(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let parsed = records
            .iter()
            .map(|record| record.iter().map(|raw| parse_cell(raw)).collect())
            .collect();
        let mut table = Table::new(headers, parsed);
        for (idx, meta) in table.schema.columns.iter().enumerate() {
            if meta.is_numeric() {
                continue;
            }
            for (row, record) in table.rows.iter_mut().zip(&records) {
                if let Some(cell) = row.get_mut(idx)
                    && matches!(cell, Some(Value::Number(_)))
                    && let Some(raw) = record.get(idx)
                {
                    *cell = Some(Value::Text(raw.trim().to_string()));
                }
            }
        }
        table
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn headers(&self) -> Vec<String> {
        self.schema.headers()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.schema.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.column_index(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.schema.contains(name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    /// Cells of a named column, or `None` when the column is absent.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&Value>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_ref()).collect())
    }

    /// Numeric-coerced values of a named column, or `None` when the column is absent.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| coerce_numeric(row[idx].as_ref()))
                .collect(),
        )
    }

    pub fn filter_rows<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Table {
            schema: self.schema.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }

    /// Rows at `indices`, in the order given.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        Table {
            schema: self.schema.clone(),
            rows: indices
                .iter()
                .filter_map(|&idx| self.rows.get(idx).cloned())
                .collect(),
        }
    }

    pub fn head(&self, n: usize) -> Table {
        Table {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Projects the named columns in the order given; unknown names are skipped.
    pub fn select(&self, names: &[String]) -> Table {
        let indices = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect::<Vec<_>>();
        let columns = indices
            .iter()
            .map(|&idx| self.schema.columns[idx].clone())
            .collect();
        Table {
            schema: Schema { columns },
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
                .collect(),
        }
    }

    /// Appends a column. `values` must hold one cell per row; missing
    /// trailing cells are filled with `None`.
    pub fn with_column(mut self, meta: ColumnMeta, mut values: Vec<Cell>) -> Table {
        values.resize(self.rows.len(), None);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        self.schema.columns.push(meta);
        self
    }
}
