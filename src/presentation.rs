//! Shapes a filtered working table into the inputs of the chart delegate:
//! summary metrics, the map specification, the top-N bar chart, and the
//! tabular preview.
//!
//! Column choices everywhere go through [`select_existing`], so a column the
//! working table lacks is dropped rather than reported as an error.

use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::{
    aggregate::{self, summarize_values},
    config::DashboardConfig,
    data::{Value, format_count},
    selection::SelectionState,
    table::Table,
};

pub const NOT_AVAILABLE: &str = "N/A";
pub const LOG_FALLBACK_WARNING: &str = "Log transform failed; showing linear color.";
pub const EMPTY_BAR_CHART_NOTICE: &str = "No rows to show in bar chart.";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HoverField {
    pub name: String,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub size: Option<f64>,
    pub color: Option<f64>,
    pub hover_name: Option<String>,
    pub hover: Vec<HoverField>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Linear,
    Log,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColorScale {
    pub mode: ColorMode,
    pub name: String,
    pub label: String,
    pub range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapSpec {
    pub size_label: String,
    pub size_max: u32,
    pub color: ColorScale,
    pub zoom: u32,
    pub style: String,
    pub height: u32,
    pub points: Vec<MapPoint>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bar {
    pub label: Option<String>,
    pub value: Option<f64>,
    pub hover: Vec<HoverField>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarChartSpec {
    pub x_label: String,
    pub y_label: String,
    pub color: String,
    pub height: u32,
    pub tick_angle: i32,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub numeric: Vec<bool>,
    pub rows: Vec<Vec<Option<Value>>>,
    pub total_rows: usize,
    pub caption: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Map,
    BarChart,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub section: Section,
    pub message: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("Column '{0}' is not in the working table")]
    MissingColumn(String),
    #[error("log1p is undefined for {value} in row {row}")]
    Domain { row: usize, value: f64 },
}

/// Names from `wishlist` that exist in `table`, first occurrence wins, order kept.
/// Empty names are ignored.
pub fn select_existing(table: &Table, wishlist: &[&str]) -> Vec<String> {
    wishlist
        .iter()
        .filter(|name| !name.is_empty() && table.has_column(name))
        .unique()
        .map(|name| name.to_string())
        .collect()
}

/// Preview columns in preference order. When none of the value columns
/// (population, primary, secondary, sex ratio, literacy rate) exist, falls back
/// to district and region plus the leading numeric columns.
pub fn preview_columns(
    table: &Table,
    selection: &SelectionState,
    config: &DashboardConfig,
) -> Vec<String> {
    let columns = &config.columns;
    let identity = [columns.district.as_str(), columns.region.as_str()];
    let preferred = select_existing(
        table,
        &[
            identity[0],
            identity[1],
            columns.population.as_str(),
            selection.primary.as_str(),
            selection.secondary.as_str(),
            columns.sex_ratio.as_str(),
            columns.literacy_rate.as_str(),
        ],
    );
    if preferred.iter().any(|c| !identity.contains(&c.as_str())) {
        return preferred;
    }

    let mut fallback = select_existing(table, &identity);
    let extra = table
        .schema()
        .numeric_columns()
        .into_iter()
        .filter(|name| !fallback.contains(name))
        .take(config.fallback_numeric_columns)
        .collect::<Vec<_>>();
    fallback.extend(extra);
    debug!("Preview falling back to columns {fallback:?}");
    fallback
}

/// Columns surfaced on map-point hover.
pub fn hover_columns(
    table: &Table,
    selection: &SelectionState,
    config: &DashboardConfig,
) -> Vec<String> {
    let columns = &config.columns;
    select_existing(
        table,
        &[
            columns.district.as_str(),
            columns.region.as_str(),
            columns.population.as_str(),
            selection.primary.as_str(),
            selection.secondary.as_str(),
        ],
    )
}

pub fn build_metrics(table: &Table, config: &DashboardConfig) -> Vec<Metric> {
    let columns = &config.columns;
    let average = |column: &str, precision: usize| {
        aggregate::mean(table, column)
            .map(|value| format!("{value:.precision$}"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    vec![
        Metric {
            label: "Districts Shown".to_string(),
            value: format_count(table.row_count()),
        },
        Metric {
            label: "Avg Literacy Rate (%)".to_string(),
            value: average(&columns.literacy_rate, 2),
        },
        Metric {
            label: "Avg Sex Ratio (F per 1000 M)".to_string(),
            value: average(&columns.sex_ratio, 1),
        },
        Metric {
            label: "Avg Internet Penetration (%)".to_string(),
            value: average(&columns.internet_penetration, 2),
        },
    ]
}

/// `ln(1 + x)` per row with missing values taken as zero.
pub fn log1p_values(table: &Table, column: &str) -> Result<Vec<f64>, TransformError> {
    let values = table
        .numeric_column(column)
        .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let value = value.unwrap_or(0.0);
            let transformed = value.ln_1p();
            if transformed.is_finite() {
                Ok(transformed)
            } else {
                Err(TransformError::Domain { row, value })
            }
        })
        .collect()
}

fn hover_values(table: &Table, row: usize, columns: &[(String, usize)]) -> Vec<HoverField> {
    columns
        .iter()
        .map(|(name, idx)| HoverField {
            name: name.clone(),
            value: table.cell(row, *idx).cloned(),
        })
        .collect()
}

fn indexed(table: &Table, names: Vec<String>) -> Vec<(String, usize)> {
    names
        .into_iter()
        .filter_map(|name| table.column_index(&name).map(|idx| (name, idx)))
        .collect()
}

fn coerced_or_missing(table: &Table, column: &str) -> Vec<Option<f64>> {
    table
        .numeric_column(column)
        .unwrap_or_else(|| vec![None; table.row_count()])
}

pub fn build_map(
    table: &Table,
    selection: &SelectionState,
    config: &DashboardConfig,
) -> (MapSpec, Vec<Notice>) {
    let columns = &config.columns;
    let mut notices = Vec::new();
    let latitudes = coerced_or_missing(table, &columns.latitude);
    let longitudes = coerced_or_missing(table, &columns.longitude);
    let sizes = coerced_or_missing(table, &selection.primary);
    let linear = coerced_or_missing(table, &selection.secondary);

    let (colors, color) = if selection.log_color {
        match log1p_values(table, &selection.secondary) {
            Ok(values) => (
                values.into_iter().map(Some).collect::<Vec<_>>(),
                ColorScale {
                    mode: ColorMode::Log,
                    name: config.map.log_scale.clone(),
                    label: format!("log1p({})", selection.secondary),
                    range: None,
                },
            ),
            Err(err) => {
                warn!("Log color transform for '{}' failed: {err}", selection.secondary);
                notices.push(Notice {
                    level: NoticeLevel::Warning,
                    section: Section::Map,
                    message: LOG_FALLBACK_WARNING.to_string(),
                });
                (linear, linear_scale(selection, config))
            }
        }
    } else {
        (linear, linear_scale(selection, config))
    };
    let color = ColorScale {
        range: summarize_values(colors.iter().copied()).map(|s| (s.min, s.max)),
        ..color
    };

    let district_idx = table.column_index(&columns.district);
    let hover = indexed(table, hover_columns(table, selection, config));
    let points = (0..table.row_count())
        .map(|row| MapPoint {
            latitude: latitudes[row],
            longitude: longitudes[row],
            size: sizes[row],
            color: colors[row],
            hover_name: district_idx
                .and_then(|idx| table.cell(row, idx))
                .map(Value::as_display),
            hover: hover_values(table, row, &hover),
        })
        .collect();

    let zoom = if selection.region.is_whole_dataset() {
        config.map.zoom_whole
    } else {
        config.map.zoom_region
    };
    let spec = MapSpec {
        size_label: selection.primary.clone(),
        size_max: config.map.size_max,
        color,
        zoom,
        style: config.map.style.clone(),
        height: config.map.height,
        points,
    };
    (spec, notices)
}

fn linear_scale(selection: &SelectionState, config: &DashboardConfig) -> ColorScale {
    ColorScale {
        mode: ColorMode::Linear,
        name: config.map.linear_scale.clone(),
        label: selection.secondary.clone(),
        range: None,
    }
}

pub fn bar_chart_title(table: &Table, selection: &SelectionState, config: &DashboardConfig) -> String {
    format!(
        "Top {} districts by {} (Descending Order)",
        config.top_n.min(table.row_count()),
        selection.secondary
    )
}

pub fn build_bar_chart(
    table: &Table,
    selection: &SelectionState,
    config: &DashboardConfig,
) -> (Option<BarChartSpec>, Vec<Notice>) {
    let top = aggregate::top_n(table, &selection.secondary, config.top_n);
    if top.is_empty() {
        let notice = Notice {
            level: NoticeLevel::Info,
            section: Section::BarChart,
            message: EMPTY_BAR_CHART_NOTICE.to_string(),
        };
        return (None, vec![notice]);
    }

    let columns = &config.columns;
    let district_idx = top.column_index(&columns.district);
    let values = coerced_or_missing(&top, &selection.secondary);
    let hover = indexed(
        &top,
        select_existing(
            &top,
            &[columns.population.as_str(), selection.primary.as_str()],
        ),
    );
    let bars = values
        .into_iter()
        .enumerate()
        .map(|(row, value)| Bar {
            label: district_idx
                .and_then(|idx| top.cell(row, idx))
                .map(Value::as_display),
            value,
            hover: hover_values(&top, row, &hover),
        })
        .collect();

    let spec = BarChartSpec {
        x_label: "District".to_string(),
        y_label: selection.secondary.clone(),
        color: config.bar.color.clone(),
        height: config.bar.height,
        tick_angle: config.bar.tick_angle,
        bars,
    };
    (Some(spec), Vec::new())
}

pub fn build_preview(table: &Table, columns: &[String], config: &DashboardConfig) -> PreviewTable {
    let projected = table.select(columns).head(config.preview_rows);
    PreviewTable {
        headers: projected.headers(),
        numeric: projected
            .schema()
            .columns
            .iter()
            .map(|c| c.is_numeric())
            .collect(),
        rows: projected.rows().to_vec(),
        total_rows: table.row_count(),
        caption: config.caption.clone(),
    }
}
