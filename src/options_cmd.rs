//! Selector option listing.
//!
//! Reports what each selector would offer for the loaded file: region labels
//! (whole-dataset sentinel first), numeric columns for the primary selector,
//! the secondary choices left once a primary is chosen, and the defaults.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    cli::{OptionsArgs, OutputFormat},
    grid::{Alignment, render_grid},
    pipeline::Explorer,
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptionsReport {
    pub regions: Vec<String>,
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub default_primary: String,
    pub default_secondary: String,
}

impl OptionsReport {
    pub fn new(explorer: &Explorer, primary: Option<&str>) -> Self {
        let defaults = explorer.default_selection();
        let chosen = primary
            .filter(|p| {
                explorer
                    .options()
                    .primary_options()
                    .iter()
                    .any(|c| c.as_str() == *p)
            })
            .unwrap_or(defaults.primary.as_str());
        Self {
            regions: explorer.options().regions.clone(),
            primary: explorer.options().primary_options().to_vec(),
            secondary: explorer.options().secondary_options(chosen),
            default_primary: defaults.primary.clone(),
            default_secondary: defaults.secondary.clone(),
        }
    }
}

pub fn execute(args: &OptionsArgs) -> Result<()> {
    let explorer = crate::open_explorer(&args.source)?;
    let report = OptionsReport::new(&explorer, args.primary.as_deref());
    let stdout = std::io::stdout();
    write_report(&report, args.format, stdout.lock())
}

pub fn write_report<W: Write>(report: &OptionsReport, format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, report).context("Writing options JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let headers = vec!["selector".to_string(), "options".to_string()];
            let rows = vec![
                vec!["region".to_string(), report.regions.join(", ")],
                vec!["primary".to_string(), report.primary.join(", ")],
                vec!["secondary".to_string(), report.secondary.join(", ")],
                vec![
                    "defaults".to_string(),
                    format!(
                        "primary={}, secondary={}",
                        report.default_primary, report.default_secondary
                    ),
                ],
            ];
            write!(
                out,
                "{}",
                render_grid(&headers, &rows, &[Alignment::Left, Alignment::Left])
            )?;
        }
    }
    out.flush().context("Flushing options output")
}
