//! Chart/UI delegates that present a [`Dashboard`].
//!
//! The pipeline never draws anything itself; it hands prepared specifications
//! to a [`ChartDelegate`]. Two delegates ship with the crate: a plain-text
//! terminal renderer and a JSON emitter for external charting front ends.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};

use crate::{
    cli::OutputFormat,
    data::{display_cell, format_number},
    grid::{Alignment, bar, render_grid},
    pipeline::Dashboard,
    presentation::{BarChartSpec, MapSpec, Metric, Notice, NoticeLevel, PreviewTable, Section},
};

const BAR_WIDTH: usize = 40;
const MAP_SAMPLE_POINTS: usize = 10;

pub trait ChartDelegate {
    fn title(&mut self, title: &str) -> Result<()>;
    fn metrics(&mut self, metrics: &[Metric]) -> Result<()>;
    fn map(&mut self, map: &MapSpec) -> Result<()>;
    fn bar_chart(&mut self, title: &str, chart: Option<&BarChartSpec>) -> Result<()>;
    fn preview(&mut self, preview: &PreviewTable) -> Result<()>;
    fn notice(&mut self, notice: &Notice) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Feeds a whole dashboard in page order.
    fn present(&mut self, dashboard: &Dashboard) -> Result<()> {
        self.title(&dashboard.title)?;
        self.metrics(&dashboard.metrics)?;
        for notice in dashboard.notices_for(Section::Map) {
            self.notice(notice)?;
        }
        self.map(&dashboard.map)?;
        for notice in dashboard.notices_for(Section::BarChart) {
            self.notice(notice)?;
        }
        self.bar_chart(&dashboard.bar_title, dashboard.bar_chart.as_ref())?;
        self.preview(&dashboard.preview)?;
        self.finish()
    }
}

/// Presents `dashboard` on `out` with the delegate matching `format`.
pub fn present<W: Write>(dashboard: &Dashboard, format: OutputFormat, out: W) -> Result<()> {
    match format {
        OutputFormat::Text => TextDelegate::new(out).present(dashboard),
        OutputFormat::Json => JsonDelegate::new(out).present(dashboard),
    }
}

/// Renders dashboards as aligned plain text.
pub struct TextDelegate<W: Write> {
    out: W,
}

impl<W: Write> TextDelegate<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, text: &str) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{text}")?;
        writeln!(self.out, "{}", "=".repeat(text.chars().count()))?;
        Ok(())
    }
}

fn optional_number(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

impl<W: Write> ChartDelegate for TextDelegate<W> {
    fn title(&mut self, title: &str) -> Result<()> {
        writeln!(self.out, "{title}")?;
        Ok(())
    }

    fn metrics(&mut self, metrics: &[Metric]) -> Result<()> {
        let headers = vec!["metric".to_string(), "value".to_string()];
        let rows = metrics
            .iter()
            .map(|m| vec![m.label.clone(), m.value.clone()])
            .collect::<Vec<_>>();
        writeln!(self.out)?;
        write!(
            self.out,
            "{}",
            render_grid(&headers, &rows, &[Alignment::Left, Alignment::Right])
        )?;
        Ok(())
    }

    fn map(&mut self, map: &MapSpec) -> Result<()> {
        self.heading("Map")?;
        let placed = map
            .points
            .iter()
            .filter(|p| p.latitude.is_some() && p.longitude.is_some())
            .count();
        writeln!(
            self.out,
            "{placed} of {} point(s) placed; size = {} (max {}px), color = {} [{}], zoom {}, style {}",
            map.points.len(),
            map.size_label,
            map.size_max,
            map.color.label,
            map.color.name,
            map.zoom,
            map.style
        )?;
        if let Some((min, max)) = map.color.range {
            writeln!(
                self.out,
                "color range {} .. {}",
                format_number(min),
                format_number(max)
            )?;
        }
        if map.points.is_empty() {
            return Ok(());
        }
        let headers = ["name", "lat", "lon", "size", "color"]
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();
        let rows = map
            .points
            .iter()
            .take(MAP_SAMPLE_POINTS)
            .map(|p| {
                vec![
                    p.hover_name.clone().unwrap_or_default(),
                    optional_number(p.latitude),
                    optional_number(p.longitude),
                    optional_number(p.size),
                    optional_number(p.color),
                ]
            })
            .collect::<Vec<_>>();
        let mut alignments = vec![Alignment::Left];
        alignments.extend([Alignment::Right; 4]);
        write!(self.out, "{}", render_grid(&headers, &rows, &alignments))?;
        if map.points.len() > MAP_SAMPLE_POINTS {
            writeln!(
                self.out,
                "... {} more point(s)",
                map.points.len() - MAP_SAMPLE_POINTS
            )?;
        }
        Ok(())
    }

    fn bar_chart(&mut self, title: &str, chart: Option<&BarChartSpec>) -> Result<()> {
        self.heading(title)?;
        let Some(chart) = chart else {
            return Ok(());
        };
        let max = chart
            .bars
            .iter()
            .filter_map(|b| b.value)
            .fold(f64::NEG_INFINITY, f64::max);
        let headers = vec![
            chart.x_label.clone(),
            chart.y_label.clone(),
            String::new(),
        ];
        let rows = chart
            .bars
            .iter()
            .map(|b| {
                vec![
                    b.label.clone().unwrap_or_default(),
                    optional_number(b.value),
                    b.value.map(|v| bar(v, max, BAR_WIDTH)).unwrap_or_default(),
                ]
            })
            .collect::<Vec<_>>();
        write!(
            self.out,
            "{}",
            render_grid(
                &headers,
                &rows,
                &[Alignment::Left, Alignment::Right, Alignment::Left]
            )
        )?;
        Ok(())
    }

    fn preview(&mut self, preview: &PreviewTable) -> Result<()> {
        self.heading("Filtered Data Preview")?;
        let rows = preview
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| display_cell(cell.as_ref())).collect())
            .collect::<Vec<Vec<String>>>();
        let alignments = preview
            .numeric
            .iter()
            .map(|&numeric| if numeric { Alignment::Right } else { Alignment::Left })
            .collect::<Vec<_>>();
        write!(self.out, "{}", render_grid(&preview.headers, &rows, &alignments))?;
        if preview.total_rows > preview.rows.len() {
            writeln!(
                self.out,
                "showing {} of {} row(s)",
                preview.rows.len(),
                preview.total_rows
            )?;
        }
        writeln!(self.out, "{}", preview.caption)?;
        Ok(())
    }

    fn notice(&mut self, notice: &Notice) -> Result<()> {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
        };
        writeln!(self.out, "[{tag}] {}", notice.message)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("Flushing dashboard output")
    }
}

/// Collects each section into one JSON document written on [`ChartDelegate::finish`].
pub struct JsonDelegate<W: Write> {
    out: W,
    document: Map<String, JsonValue>,
    notices: Vec<JsonValue>,
}

impl<W: Write> JsonDelegate<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            document: Map::new(),
            notices: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn insert<T: serde::Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("Serializing dashboard section '{key}'"))?;
        self.document.insert(key.to_string(), value);
        Ok(())
    }
}

impl<W: Write> ChartDelegate for JsonDelegate<W> {
    fn title(&mut self, title: &str) -> Result<()> {
        self.insert("title", &title)
    }

    fn metrics(&mut self, metrics: &[Metric]) -> Result<()> {
        self.insert("metrics", &metrics)
    }

    fn map(&mut self, map: &MapSpec) -> Result<()> {
        self.insert("map", map)
    }

    fn bar_chart(&mut self, title: &str, chart: Option<&BarChartSpec>) -> Result<()> {
        self.insert("bar_title", &title)?;
        self.insert("bar_chart", &chart)
    }

    fn preview(&mut self, preview: &PreviewTable) -> Result<()> {
        self.insert("preview", preview)
    }

    fn notice(&mut self, notice: &Notice) -> Result<()> {
        let value = serde_json::to_value(notice).context("Serializing notice")?;
        self.notices.push(value);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let mut document = std::mem::take(&mut self.document);
        document.insert(
            "notices".to_string(),
            JsonValue::Array(std::mem::take(&mut self.notices)),
        );
        serde_json::to_writer_pretty(&mut self.out, &document)
            .context("Writing dashboard JSON")?;
        writeln!(self.out)?;
        self.out.flush().context("Flushing dashboard output")
    }

    fn present(&mut self, dashboard: &Dashboard) -> Result<()> {
        self.insert("selection", &dashboard.selection)?;
        self.title(&dashboard.title)?;
        self.metrics(&dashboard.metrics)?;
        for notice in &dashboard.notices {
            self.notice(notice)?;
        }
        self.map(&dashboard.map)?;
        self.bar_chart(&dashboard.bar_title, dashboard.bar_chart.as_ref())?;
        self.preview(&dashboard.preview)?;
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::DashboardConfig,
        data::parse_cell,
        filter::RegionFilter,
        pipeline::Explorer,
        table::Table,
    };

    fn explorer() -> Explorer {
        let headers = ["State", "District", "Latitude", "Longitude", "Population", "Sex_Ratio"];
        let rows = [
            ["Goa", "North Goa", "15.5", "73.9", "818008", "966"],
            ["Goa", "South Goa", "15.2", "74.0", "640537", "988"],
        ];
        let table = Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| parse_cell(v)).collect())
                .collect(),
        );
        Explorer::new(Arc::new(table), Arc::new(DashboardConfig::default()))
    }

    #[test]
    fn text_delegate_renders_every_section() {
        let explorer = explorer();
        let dashboard = explorer.render(&explorer.default_selection());
        let mut delegate = TextDelegate::new(Vec::new());
        delegate.present(&dashboard).unwrap();
        let text = String::from_utf8(delegate.into_inner()).unwrap();
        assert!(text.starts_with("India Census — Minimal Map Explorer"));
        assert!(text.contains("Districts Shown"));
        assert!(text.contains("Top 2 districts by Sex_Ratio (Descending Order)"));
        assert!(text.contains("Filtered Data Preview"));
        assert!(text.contains("Data source: India Census 2011"));
    }

    #[test]
    fn text_delegate_reports_empty_bar_chart() {
        let explorer = explorer();
        let mut selection = explorer.default_selection();
        selection.region = RegionFilter::Region("Kerala".into());
        let dashboard = explorer.render(&selection);
        let mut delegate = TextDelegate::new(Vec::new());
        delegate.present(&dashboard).unwrap();
        let text = String::from_utf8(delegate.into_inner()).unwrap();
        assert!(text.contains("[info] No rows to show in bar chart."));
        assert!(text.contains("Top 0 districts"));
    }

    #[test]
    fn json_delegate_emits_single_document() {
        let explorer = explorer();
        let dashboard = explorer.render(&explorer.default_selection());
        let mut delegate = JsonDelegate::new(Vec::new());
        delegate.present(&dashboard).unwrap();
        let parsed: JsonValue = serde_json::from_slice(&delegate.into_inner()).unwrap();
        assert_eq!(parsed["metrics"][0]["value"], "2");
        assert_eq!(parsed["bar_chart"]["y_label"], "Sex_Ratio");
        assert_eq!(parsed["map"]["points"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["selection"]["region"], "whole_dataset");
        assert!(parsed["notices"].as_array().unwrap().is_empty());
    }
}
