//! Derived columns computed once after load.

use log::debug;

use crate::{
    config::ColumnNames,
    data::{Cell, Value, coerce_numeric},
    schema::ColumnMeta,
    table::Table,
};

/// Adds the internet penetration column (`100 * internet / total`) when it is
/// absent and both household count columns are present. Rows whose inputs are
/// missing, non-numeric, or whose total is zero get a missing value.
pub fn ensure_internet_penetration(table: Table, columns: &ColumnNames) -> Table {
    if table.has_column(&columns.internet_penetration) {
        debug!(
            "Column '{}' already present; nothing to derive",
            columns.internet_penetration
        );
        return table;
    }
    let (Some(internet), Some(total)) = (
        table.column_index(&columns.internet_households),
        table.column_index(&columns.total_households),
    ) else {
        debug!(
            "Columns '{}' and '{}' not both present; '{}' left absent",
            columns.internet_households, columns.total_households, columns.internet_penetration
        );
        return table;
    };

    let values = table
        .rows()
        .iter()
        .map(|row| {
            percentage(
                coerce_numeric(row[internet].as_ref()),
                coerce_numeric(row[total].as_ref()),
            )
            .map(Value::Number)
        })
        .collect::<Vec<Cell>>();
    debug!(
        "Derived '{}' for {} row(s)",
        columns.internet_penetration,
        values.iter().filter(|v| v.is_some()).count()
    );
    table.with_column(ColumnMeta::numeric(&columns.internet_penetration), values)
}

pub fn percentage(part: Option<f64>, whole: Option<f64>) -> Option<f64> {
    let (part, whole) = (part?, whole?);
    if whole == 0.0 {
        return None;
    }
    Some(100.0 * part / whole).filter(|value| value.is_finite())
}
