use std::fmt;

use serde::Serialize;

/// Spellings that load as a missing cell. Matched exactly (case-sensitive) after
/// trimming, so text such as `Na` or `None` stays a value.
const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

/// A table cell. `None` is a missing value.
pub type Cell = Option<Value>;

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
        }
    }

    /// Numeric coercion: text that does not parse as a finite number is missing.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Value::Text(s) => parse_number(s),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

pub fn is_missing_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn parse_cell(raw: &str) -> Cell {
    if is_missing_token(raw) {
        return None;
    }
    match parse_number(raw) {
        Some(number) => Some(Value::Number(number)),
        None => Some(Value::Text(raw.trim().to_string())),
    }
}

pub fn coerce_numeric(cell: Option<&Value>) -> Option<f64> {
    cell.and_then(Value::as_number)
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn display_cell(cell: Option<&Value>) -> String {
    cell.map(Value::as_display).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cell_recognizes_placeholders_as_missing() {
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("  "), None);
        assert_eq!(parse_cell("NA"), None);
        assert_eq!(parse_cell("n/a"), None);
        assert_eq!(parse_cell("NaN"), None);
        assert_eq!(parse_cell("null"), None);
        assert_eq!(parse_cell("<NA>"), None);
    }

    #[test]
    fn placeholder_matching_is_case_sensitive() {
        assert_eq!(parse_cell("None"), Some(Value::Text("None".to_string())));
        assert_eq!(parse_cell("none"), Some(Value::Text("none".to_string())));
        assert_eq!(parse_cell("Na"), Some(Value::Text("Na".to_string())));
        assert_eq!(parse_cell("nULL"), Some(Value::Text("nULL".to_string())));
    }

    #[test]
    fn parse_cell_splits_numbers_from_text() {
        assert_eq!(parse_cell("942"), Some(Value::Number(942.0)));
        assert_eq!(parse_cell(" 74.04 "), Some(Value::Number(74.04)));
        assert_eq!(
            parse_cell("North Goa"),
            Some(Value::Text("North Goa".to_string()))
        );
        assert_eq!(parse_cell("1,234"), Some(Value::Text("1,234".to_string())));
        assert_eq!(parse_cell("inf"), Some(Value::Text("inf".to_string())));
    }

    #[test]
    fn coerce_numeric_never_fails() {
        assert_eq!(coerce_numeric(None), None);
        assert_eq!(coerce_numeric(Some(&Value::Text("abc".into()))), None);
        assert_eq!(coerce_numeric(Some(&Value::Text("12.5".into()))), Some(12.5));
        assert_eq!(coerce_numeric(Some(&Value::Number(3.0))), Some(3.0));
    }

    #[test]
    fn format_number_drops_integral_fraction() {
        assert_eq!(format_number(1200.0), "1200");
        assert_eq!(format_number(74.5), "74.5");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(640), "640");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
