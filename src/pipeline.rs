//! The dashboard pipeline: derive → filter → aggregate → present.
//!
//! [`render`] is a pure function of the immutable base table, the selection
//! state, and the configuration. [`Explorer`] holds the shared base table for
//! a session and normalises selections before each render.

use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use crate::{
    config::DashboardConfig,
    derive::ensure_internet_penetration,
    filter::apply_filters,
    presentation::{
        self, BarChartSpec, MapSpec, Metric, Notice, PreviewTable, Section,
    },
    selection::{SelectionState, UiOptions},
    table::Table,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub title: String,
    pub selection: SelectionState,
    pub metrics: Vec<Metric>,
    pub map: MapSpec,
    pub bar_title: String,
    pub bar_chart: Option<BarChartSpec>,
    pub preview: PreviewTable,
    pub notices: Vec<Notice>,
}

impl Dashboard {
    pub fn notices_for(&self, section: Section) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.section == section)
    }
}

/// Runs the one-time derivation step and freezes the result for sharing.
pub fn prepare_base_table(table: Table, config: &DashboardConfig) -> Arc<Table> {
    Arc::new(ensure_internet_penetration(table, &config.columns))
}

/// Produces every dashboard output for one selection. The base table is only read.
pub fn render(base: &Table, selection: &SelectionState, config: &DashboardConfig) -> Dashboard {
    let working = apply_filters(base, &selection.region, &selection.search, config);
    info!(
        "Rendering {} of {} row(s) for region '{}'{}",
        working.row_count(),
        base.row_count(),
        selection.region.label(&config.whole_dataset_label),
        if selection.search.trim().is_empty() {
            String::new()
        } else {
            format!(" matching '{}'", selection.search.trim())
        }
    );

    let metrics = presentation::build_metrics(&working, config);
    let (map, mut notices) = presentation::build_map(&working, selection, config);
    let bar_title = presentation::bar_chart_title(&working, selection, config);
    let (bar_chart, bar_notices) = presentation::build_bar_chart(&working, selection, config);
    notices.extend(bar_notices);
    let preview_columns = presentation::preview_columns(&working, selection, config);
    debug!("Preview columns: {preview_columns:?}");
    let preview = presentation::build_preview(&working, &preview_columns, config);

    Dashboard {
        title: config.title.clone(),
        selection: selection.clone(),
        metrics,
        map,
        bar_title,
        bar_chart,
        preview,
        notices,
    }
}

/// A session over one loaded base table.
#[derive(Debug, Clone)]
pub struct Explorer {
    base: Arc<Table>,
    config: Arc<DashboardConfig>,
    options: UiOptions,
}

impl Explorer {
    pub fn new(base: Arc<Table>, config: Arc<DashboardConfig>) -> Self {
        let options = UiOptions::from_table(&base, &config);
        Self {
            base,
            config,
            options,
        }
    }

    pub fn base(&self) -> &Arc<Table> {
        &self.base
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn options(&self) -> &UiOptions {
        &self.options
    }

    pub fn default_selection(&self) -> SelectionState {
        self.options.default_selection(&self.config)
    }

    pub fn normalize(&self, selection: SelectionState) -> SelectionState {
        self.options.normalize(selection, &self.config)
    }

    pub fn render(&self, selection: &SelectionState) -> Dashboard {
        let selection = self.normalize(selection.clone());
        render(&self.base, &selection, &self.config)
    }
}
