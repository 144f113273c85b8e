//! Column aggregates: summaries, means, and descending top-N selection.
//!
//! All aggregates use numeric coercion, so text cells in a numeric column are
//! skipped the same way missing cells are.

use std::cmp::Ordering;

use serde::Serialize;

use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Default)]
struct NumericAccumulator {
    count: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumericAccumulator {
    fn add_value(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
    }

    fn finish(self) -> Option<NumericSummary> {
        let (min, max) = (self.min?, self.max?);
        Some(NumericSummary {
            count: self.count,
            min,
            max,
            mean: self.sum / self.count as f64,
        })
    }
}

/// Summarises a series of coerced values; `None` when nothing is present.
pub fn summarize_values<I>(values: I) -> Option<NumericSummary>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut accumulator = NumericAccumulator::default();
    for value in values.into_iter().flatten() {
        accumulator.add_value(value);
    }
    accumulator.finish()
}

/// `None` when the column is absent or holds no numeric values.
pub fn summarize(table: &Table, column: &str) -> Option<NumericSummary> {
    summarize_values(table.numeric_column(column)?)
}

/// Arithmetic mean of the numeric values in `column`; `None` means "not available".
pub fn mean(table: &Table, column: &str) -> Option<f64> {
    summarize(table, column).map(|summary| summary.mean)
}

/// The first `min(n, rows)` rows ordered by `sort_column`, largest first.
pub fn top_n(table: &Table, sort_column: &str, n: usize) -> Table {
    top_n_by(table, sort_column, n, SortDirection::Descending)
}

/// Stable sort on the coerced values of `sort_column` with missing values last
/// in either direction, then a literal head of `n` rows. An absent column
/// leaves the row order untouched.
pub fn top_n_by(table: &Table, sort_column: &str, n: usize, direction: SortDirection) -> Table {
    let keys = table
        .numeric_column(sort_column)
        .unwrap_or_else(|| vec![None; table.row_count()]);
    let mut order = (0..table.row_count()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| compare_keys(keys[a], keys[b], direction));
    order.truncate(n);
    table.take_rows(&order)
}

fn compare_keys(left: Option<f64>, right: Option<f64>, direction: SortDirection) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => match direction {
            SortDirection::Ascending => l.total_cmp(&r),
            SortDirection::Descending => r.total_cmp(&l),
        },
    }
}
