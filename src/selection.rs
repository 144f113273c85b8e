//! Selection state and the option lists offered by each selector.

use log::warn;
use serde::Serialize;

use crate::{
    config::DashboardConfig,
    filter::{RegionFilter, RowFilter},
    table::Table,
};

/// The user's current choices. Owned by the shell and passed by reference
/// into every render; nothing here persists between sessions.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectionState {
    pub region: RegionFilter,
    pub primary: String,
    pub secondary: String,
    pub search: String,
    pub log_color: bool,
}

/// Options for the region, primary, and secondary selectors.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UiOptions {
    pub regions: Vec<String>,
    pub numeric_columns: Vec<String>,
}

impl UiOptions {
    pub fn from_table(table: &Table, config: &DashboardConfig) -> Self {
        let mut regions = vec![config.whole_dataset_label.clone()];
        regions.extend(RowFilter::from_config(config).region_labels(table));
        Self {
            regions,
            numeric_columns: table.schema().numeric_columns(),
        }
    }

    pub fn primary_options(&self) -> &[String] {
        &self.numeric_columns
    }

    /// Every numeric column except the chosen primary.
    pub fn secondary_options(&self, primary: &str) -> Vec<String> {
        self.numeric_columns
            .iter()
            .filter(|c| c.as_str() != primary)
            .cloned()
            .collect()
    }

    pub fn default_primary(&self, config: &DashboardConfig) -> String {
        let population = &config.columns.population;
        if self.numeric_columns.contains(population) {
            population.clone()
        } else {
            self.numeric_columns.first().cloned().unwrap_or_default()
        }
    }

    pub fn default_secondary(&self, config: &DashboardConfig) -> String {
        let columns = &config.columns;
        [&columns.literacy_rate, &columns.sex_ratio]
            .into_iter()
            .find(|name| self.numeric_columns.contains(*name))
            .cloned()
            .or_else(|| self.numeric_columns.get(1).cloned())
            .or_else(|| self.numeric_columns.first().cloned())
            .unwrap_or_default()
    }

    pub fn default_selection(&self, config: &DashboardConfig) -> SelectionState {
        let selection = SelectionState {
            region: RegionFilter::WholeDataset,
            primary: self.default_primary(config),
            secondary: self.default_secondary(config),
            search: String::new(),
            log_color: false,
        };
        self.normalize(selection, config)
    }

    /// Replaces choices the selectors could not have produced: an unknown
    /// primary falls back to the default primary, and a secondary that is
    /// unknown or equal to the primary falls back to the default secondary
    /// or the first secondary option.
    pub fn normalize(&self, mut selection: SelectionState, config: &DashboardConfig) -> SelectionState {
        if !self.numeric_columns.contains(&selection.primary) {
            let fallback = self.default_primary(config);
            if !selection.primary.is_empty() {
                warn!(
                    "Primary column '{}' is not numeric or absent; using '{}'",
                    selection.primary, fallback
                );
            }
            selection.primary = fallback;
        }

        let secondary_options = self.secondary_options(&selection.primary);
        if !secondary_options.contains(&selection.secondary) {
            let preferred = self.default_secondary(config);
            let fallback = if secondary_options.contains(&preferred) {
                preferred
            } else {
                secondary_options.first().cloned().unwrap_or_default()
            };
            if !selection.secondary.is_empty() {
                warn!(
                    "Secondary column '{}' is unavailable for primary '{}'; using '{}'",
                    selection.secondary, selection.primary, fallback
                );
            }
            selection.secondary = fallback;
        }

        if let RegionFilter::Region(region) = &selection.region
            && !self.regions.contains(region)
        {
            warn!("Region '{region}' does not occur in the dataset");
        }
        selection
    }
}
