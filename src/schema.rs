//! Column metadata for loaded tables.
//!
//! A [`Schema`] records each column's name and [`ColumnKind`]. Kinds are
//! inferred from every loaded cell: a column that holds no text is numeric,
//! including a column whose cells are all missing.

use std::collections::HashSet;

use serde::Serialize;

use crate::data::Cell;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnMeta {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<ColumnMeta>,
}

impl Schema {
    pub fn infer(headers: &[String], rows: &[Vec<Cell>]) -> Self {
        let mut candidates = vec![KindCandidate::new(); headers.len()];
        for row in rows {
            for (candidate, cell) in candidates.iter_mut().zip(row) {
                candidate.observe(cell);
            }
        }
        let columns = headers
            .iter()
            .zip(candidates)
            .map(|(name, candidate)| ColumnMeta {
                name: name.clone(),
                kind: candidate.decide(),
            })
            .collect();
        Schema { columns }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Numeric column names in file order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct KindCandidate {
    possible_numeric: bool,
}

impl KindCandidate {
    fn new() -> Self {
        Self {
            possible_numeric: true,
        }
    }

    fn observe(&mut self, cell: &Cell) {
        if let Some(value) = cell
            && !value.is_number()
        {
            self.possible_numeric = false;
        }
    }

    fn decide(&self) -> ColumnKind {
        if self.possible_numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }
}

/// A header that was renamed to keep column names unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRename {
    pub original: String,
    pub renamed: String,
}

/// Makes header names unique by suffixing repeats with `.1`, `.2`, and so on.
pub fn dedupe_headers(headers: &[String]) -> (Vec<String>, Vec<HeaderRename>) {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut renames = Vec::new();
    let mut unique = Vec::with_capacity(headers.len());
    for header in headers {
        if seen.insert(header.clone()) {
            unique.push(header.clone());
            continue;
        }
        let mut suffix = 1usize;
        let renamed = loop {
            let candidate = format!("{header}.{suffix}");
            if !seen.contains(&candidate) && !headers.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        seen.insert(renamed.clone());
        renames.push(HeaderRename {
            original: header.clone(),
            renamed: renamed.clone(),
        });
        unique.push(renamed);
    }
    (unique, renames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Value, parse_cell};

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infer_marks_text_columns_and_keeps_all_missing_numeric() {
        let rows = vec![
            vec![parse_cell("Goa"), parse_cell("74.5"), None],
            vec![parse_cell("Kerala"), parse_cell(""), None],
        ];
        let schema = Schema::infer(&headers(&["State", "Literacy_Rate", "Empty"]), &rows);
        assert_eq!(schema.columns[0].kind, ColumnKind::Text);
        assert_eq!(schema.columns[1].kind, ColumnKind::Numeric);
        assert_eq!(schema.columns[2].kind, ColumnKind::Numeric);
        assert_eq!(schema.numeric_columns(), vec!["Literacy_Rate", "Empty"]);
    }

    #[test]
    fn single_text_cell_makes_column_text() {
        let rows = vec![
            vec![Some(Value::Number(1.0))],
            vec![Some(Value::Text("n.a.".into()))],
        ];
        let schema = Schema::infer(&headers(&["Sex_Ratio"]), &rows);
        assert!(!schema.columns[0].is_numeric());
    }

    #[test]
    fn dedupe_headers_suffixes_repeats() {
        let (unique, renames) = dedupe_headers(&headers(&["A", "B", "A", "A"]));
        assert_eq!(unique, vec!["A", "B", "A.1", "A.2"]);
        assert_eq!(renames.len(), 2);
        assert_eq!(renames[0].renamed, "A.1");
    }

    #[test]
    fn dedupe_headers_skips_names_already_taken() {
        let (unique, _) = dedupe_headers(&headers(&["A", "A.1", "A"]));
        assert_eq!(unique, vec!["A", "A.1", "A.2"]);
    }
}
