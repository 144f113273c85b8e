//! Dashboard configuration, optionally loaded from a YAML file.
//!
//! Every field has a default so a missing file, or a file that sets only a
//! few keys, still yields a complete configuration.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub title: String,
    pub caption: String,
    pub whole_dataset_label: String,
    pub unknown_region_label: String,
    pub columns: ColumnNames,
    pub top_n: usize,
    pub preview_rows: usize,
    pub fallback_numeric_columns: usize,
    pub map: MapSettings,
    pub bar: BarSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("datasets/final_india.csv"),
            title: "India Census — Minimal Map Explorer".to_string(),
            caption: "Data source: India Census 2011 - Demographic Census Data".to_string(),
            whole_dataset_label: "Whole India".to_string(),
            unknown_region_label: "Unknown".to_string(),
            columns: ColumnNames::default(),
            top_n: 10,
            preview_rows: 200,
            fallback_numeric_columns: 6,
            map: MapSettings::default(),
            bar: BarSettings::default(),
        }
    }
}

/// Canonical column names in the input file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub region: String,
    pub district: String,
    pub latitude: String,
    pub longitude: String,
    pub population: String,
    pub literacy_rate: String,
    pub sex_ratio: String,
    pub internet_households: String,
    pub total_households: String,
    pub internet_penetration: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            region: "State".to_string(),
            district: "District".to_string(),
            latitude: "Latitude".to_string(),
            longitude: "Longitude".to_string(),
            population: "Population".to_string(),
            literacy_rate: "Literacy_Rate".to_string(),
            sex_ratio: "Sex_Ratio".to_string(),
            internet_households: "Households_Internet".to_string(),
            total_households: "Households_Total".to_string(),
            internet_penetration: "Internet_Penetration".to_string(),
        }
    }
}

impl ColumnNames {
    /// Columns whose absence is fatal at load time.
    pub fn required(&self) -> [&str; 5] {
        [
            self.region.as_str(),
            self.district.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
            self.population.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MapSettings {
    pub size_max: u32,
    pub zoom_whole: u32,
    pub zoom_region: u32,
    pub style: String,
    pub linear_scale: String,
    pub log_scale: String,
    pub height: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            size_max: 30,
            zoom_whole: 4,
            zoom_region: 6,
            style: "open-street-map".to_string(),
            linear_scale: "Viridis".to_string(),
            log_scale: "Plasma".to_string(),
            height: 900,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BarSettings {
    pub color: String,
    pub height: u32,
    pub tick_angle: i32,
}

impl Default for BarSettings {
    fn default() -> Self {
        Self {
            color: "#DC3131".to_string(),
            height: 400,
            tick_angle: -45,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
