//! Loads the census file into a [`Table`].
//!
//! Loading is the only fatal stage of the dashboard: an unreadable file, a
//! malformed row, or a missing canonical column stops startup with a
//! [`LoadError`].

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use encoding_rs::{Encoding, UTF_8};
use log::{info, warn};
use thiserror::Error;

use crate::{
    io_utils::{self, DecodeError},
    schema::dedupe_headers,
    table::Table,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Opening input file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Reading header row")]
    Headers(#[source] csv::Error),
    #[error("Reading row {line}")]
    Row {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("Decoding row {line}")]
    Decode {
        line: usize,
        #[source]
        source: DecodeError,
    },
    #[error("Missing required column(s): {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

pub fn load_table(
    path: &Path,
    options: &LoadOptions,
    required: &[&str],
) -> Result<Table, LoadError> {
    info!(
        "Loading '{}' with delimiter '{}'",
        path.display(),
        crate::printable_delimiter(options.delimiter)
    );
    let reader = io_utils::open_input(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(reader, options, required)?;
    info!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        table.row_count(),
        table.column_count(),
        path
    );
    Ok(table)
}

pub fn read_table<R: Read>(
    reader: R,
    options: &LoadOptions,
    required: &[&str],
) -> Result<Table, LoadError> {
    let mut reader = io_utils::open_csv_reader(reader, options.delimiter);
    let header_record = reader.byte_headers().map_err(LoadError::Headers)?.clone();
    let raw_headers = io_utils::decode_record(&header_record, options.encoding)
        .map_err(|source| LoadError::Decode { line: 1, source })?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let missing = required
        .iter()
        .filter(|name| !raw_headers.iter().any(|h| h == *name))
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns { missing });
    }

    let (headers, renames) = dedupe_headers(&raw_headers);
    for rename in &renames {
        warn!(
            "Duplicate column '{}' renamed to '{}'",
            rename.original, rename.renamed
        );
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let line = idx + 2;
        let record = record.map_err(|source| LoadError::Row { line, source })?;
        let decoded = io_utils::decode_record(&record, options.encoding)
            .map_err(|source| LoadError::Decode { line, source })?;
        rows.push(decoded);
    }

    Ok(Table::from_raw(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    const REQUIRED: &[&str] = &["State", "District"];

    #[test]
    fn read_table_parses_cells_and_reports_kinds() {
        let csv = "State,District,Sex_Ratio\nGoa,North Goa,968\nGoa,South Goa,NA\n";
        let table = read_table(csv.as_bytes(), &LoadOptions::default(), REQUIRED).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.schema().numeric_columns(), vec!["Sex_Ratio"]);
        assert_eq!(table.cell(0, 2), Some(&Value::Number(968.0)));
        assert_eq!(table.cell(1, 2), None);
    }

    #[test]
    fn missing_required_columns_are_all_reported() {
        let csv = "Region,Name\nA,B\n";
        let err = read_table(csv.as_bytes(), &LoadOptions::default(), REQUIRED)
            .expect_err("missing columns");
        match &err {
            LoadError::MissingColumns { missing } => {
                assert_eq!(missing, &vec!["State".to_string(), "District".to_string()]);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.to_string(), "Missing required column(s): State, District");
    }

    #[test]
    fn text_columns_keep_numeric_looking_values_verbatim() {
        let csv = "State,District,Population\n01,007,120\nGoa,None,NA\n";
        let table = read_table(csv.as_bytes(), &LoadOptions::default(), REQUIRED).unwrap();
        assert_eq!(table.cell(0, 0), Some(&Value::Text("01".into())));
        assert_eq!(table.cell(0, 1), Some(&Value::Text("007".into())));
        assert_eq!(table.cell(1, 1), Some(&Value::Text("None".into())));
        assert_eq!(table.cell(0, 2), Some(&Value::Number(120.0)));
        assert_eq!(table.cell(1, 2), None);
    }

    #[test]
    fn ragged_rows_are_fatal_with_line_number() {
        let csv = "State,District\nGoa,North Goa\nGoa\n";
        let err = read_table(csv.as_bytes(), &LoadOptions::default(), REQUIRED)
            .expect_err("ragged row");
        assert!(matches!(err, LoadError::Row { line: 3, .. }));
    }

    #[test]
    fn semicolon_delimiter_is_honoured() {
        let csv = "State;District\nGoa;North Goa\n";
        let options = LoadOptions {
            delimiter: b';',
            ..LoadOptions::default()
        };
        let table = read_table(csv.as_bytes(), &options, REQUIRED).unwrap();
        assert_eq!(table.headers(), vec!["State", "District"]);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_table(
            Path::new("does/not/exist.csv"),
            &LoadOptions::default(),
            REQUIRED,
        )
        .expect_err("missing file");
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
