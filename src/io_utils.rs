//! I/O utilities for CSV reading, encoding, and delimiter resolution.
//!
//! All file I/O in census-explorer flows through this module. It provides:
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` → comma,
//!   `.tsv` → tab) with manual override support.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Reader construction**: `open_csv_reader` over any `Read`, with the `-`
//!   path convention routing through stdin.
//! - **Output**: `open_output` writes rendered dashboards to a file or stdout.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

#[derive(Debug, Error)]
#[error("Failed to decode text with encoding {encoding}")]
pub struct DecodeError {
    pub encoding: &'static str,
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn open_input(path: &Path) -> io::Result<Box<dyn Read>> {
    if is_dash(path) {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_dash(p) => Ok(Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        ))),
        _ => Ok(Box::new(io::stdout().lock())),
    }
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(DecodeError {
            encoding: encoding.name(),
        })
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
) -> Result<Vec<String>, DecodeError> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn tsv_extension_selects_tab_delimiter() {
        assert_eq!(
            resolve_input_delimiter(Path::new("districts.TSV"), None),
            b'\t'
        );
        assert_eq!(resolve_input_delimiter(Path::new("districts.csv"), None), b',');
        assert_eq!(
            resolve_input_delimiter(Path::new("districts.tsv"), Some(b';')),
            b';'
        );
    }

    #[test]
    fn unknown_encoding_label_is_rejected() {
        assert!(resolve_encoding(Some("klingon-8")).is_err());
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(resolve_encoding(Some(" windows-1252 ")).unwrap(), WINDOWS_1252);
    }

    #[test]
    fn decode_bytes_reports_invalid_utf8() {
        let err = decode_bytes(&[0x66, 0xff, 0x6f], UTF_8).expect_err("invalid utf-8");
        assert_eq!(err.encoding, "UTF-8");
        assert_eq!(decode_bytes(b"Pune", UTF_8).unwrap(), "Pune");
    }
}
