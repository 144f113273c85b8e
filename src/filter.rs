//! Row filters driven by the region selector and the district search box.

use std::{borrow::Cow, collections::BTreeSet};

use serde::Serialize;

use crate::{config::DashboardConfig, data::Value, table::Table};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegionFilter {
    WholeDataset,
    Region(String),
}

impl RegionFilter {
    /// Interprets a selector label; `whole_label` selects the whole dataset.
    pub fn from_label(label: &str, whole_label: &str) -> Self {
        if label == whole_label {
            RegionFilter::WholeDataset
        } else {
            RegionFilter::Region(label.to_string())
        }
    }

    pub fn label<'a>(&'a self, whole_label: &'a str) -> &'a str {
        match self {
            RegionFilter::WholeDataset => whole_label,
            RegionFilter::Region(region) => region,
        }
    }

    pub fn is_whole_dataset(&self) -> bool {
        matches!(self, RegionFilter::WholeDataset)
    }
}

/// Region/district predicates bound to the configured column names.
#[derive(Debug, Clone, Copy)]
pub struct RowFilter<'a> {
    pub region_column: &'a str,
    pub district_column: &'a str,
    pub unknown_label: &'a str,
}

impl<'a> RowFilter<'a> {
    pub fn from_config(config: &'a DashboardConfig) -> Self {
        Self {
            region_column: &config.columns.region,
            district_column: &config.columns.district,
            unknown_label: &config.unknown_region_label,
        }
    }

    /// Sorted distinct region labels, with missing regions shown as the unknown label.
    pub fn region_labels(&self, table: &Table) -> Vec<String> {
        let labels = match table.column(self.region_column) {
            Some(cells) => cells
                .into_iter()
                .map(|cell| self.region_label(cell).into_owned())
                .collect::<BTreeSet<_>>(),
            None if table.is_empty() => BTreeSet::new(),
            None => BTreeSet::from([self.unknown_label.to_string()]),
        };
        labels.into_iter().collect()
    }

    pub fn region_label<'v>(&self, cell: Option<&'v Value>) -> Cow<'v, str>
    where
        'a: 'v,
    {
        match cell {
            Some(Value::Text(text)) => Cow::Borrowed(text.as_str()),
            Some(other) => Cow::Owned(other.as_display()),
            None => Cow::Borrowed(self.unknown_label),
        }
    }

    /// Applies both filters (logical AND); the input table is not modified.
    pub fn apply(&self, table: &Table, region: &RegionFilter, search_text: &str) -> Table {
        let region_idx = table.column_index(self.region_column);
        let district_idx = table.column_index(self.district_column);
        let needle = search_text.trim().to_lowercase();

        table.filter_rows(|row| {
            let region_matches = match region {
                RegionFilter::WholeDataset => true,
                RegionFilter::Region(wanted) => {
                    let cell = region_idx.and_then(|idx| row[idx].as_ref());
                    self.region_label(cell) == wanted.as_str()
                }
            };
            let search_matches = needle.is_empty()
                || district_idx
                    .and_then(|idx| row[idx].as_ref())
                    .is_some_and(|district| {
                        district.as_display().to_lowercase().contains(&needle)
                    });
            region_matches && search_matches
        })
    }
}

pub fn apply_filters(
    table: &Table,
    region_filter: &RegionFilter,
    search_text: &str,
    config: &DashboardConfig,
) -> Table {
    RowFilter::from_config(config).apply(table, region_filter, search_text)
}
