//! Plain-text grid rendering for the terminal delegate.

use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Renders an aligned grid. Columns without an explicit alignment are left-aligned.
pub fn render_grid(headers: &[String], rows: &[Vec<String>], alignments: &[Alignment]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(&sanitize_cell(cell)));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();
    let header_alignments = vec![Alignment::Left; column_count];
    let _ = writeln!(output, "{}", format_row(headers, &widths, &header_alignments));

    let separator_cells = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(
        output,
        "{}",
        format_row(&separator_cells, &widths, &header_alignments)
    );

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, alignments));
    }

    output
}

fn format_row(values: &[String], widths: &[usize], alignments: &[Alignment]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        let Some(width) = widths.get(idx).copied() else {
            break;
        };
        let sanitized = sanitize_cell(value);
        let padding = " ".repeat(width.saturating_sub(display_width(sanitized.as_ref())));
        let cell = match alignments.get(idx).copied().unwrap_or(Alignment::Left) {
            Alignment::Left => format!("{sanitized}{padding}"),
            Alignment::Right => format!("{padding}{sanitized}"),
        };
        cells.push(cell);
    }
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI escape sequence, e.g. \x1b[31m
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

/// Horizontal bar scaled against `max`, at most `width` characters long.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "#".repeat(filled.clamp(1, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scales_against_maximum() {
        assert_eq!(bar(50.0, 100.0, 10), "#####");
        assert_eq!(bar(100.0, 100.0, 10), "##########");
        assert_eq!(bar(0.1, 100.0, 10), "#");
        assert_eq!(bar(0.0, 100.0, 10), "");
        assert_eq!(bar(-4.0, 100.0, 10), "");
    }
}
