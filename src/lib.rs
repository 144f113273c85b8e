pub mod aggregate;
pub mod cli;
pub mod config;
pub mod data;
pub mod delegate;
pub mod derive;
pub mod filter;
pub mod grid;
pub mod io_utils;
pub mod loader;
pub mod options_cmd;
pub mod pipeline;
pub mod presentation;
pub mod render_cmd;
pub mod schema;
pub mod selection;
pub mod shell;
pub mod table;

use std::{env, sync::Arc, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug};

use crate::{
    cli::{Cli, Commands, SelectionArgs, SourceArgs},
    config::DashboardConfig,
    filter::RegionFilter,
    loader::LoadOptions,
    pipeline::Explorer,
    selection::SelectionState,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("census_explorer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => render_cmd::execute(&args),
        Commands::Options(args) => options_cmd::execute(&args),
        Commands::Explore(args) => shell::execute(&args),
    }
}

/// Loads configuration and data once and wraps them in a session.
pub fn open_explorer(source: &SourceArgs) -> Result<Explorer> {
    let config = DashboardConfig::load_or_default(source.config.as_deref())?;
    let input = source
        .input
        .clone()
        .unwrap_or_else(|| config.data_path.clone());
    let options = LoadOptions {
        delimiter: io_utils::resolve_input_delimiter(&input, source.delimiter),
        encoding: io_utils::resolve_encoding(source.input_encoding.as_deref())?,
    };
    let table = loader::load_table(&input, &options, &config.columns.required())
        .with_context(|| format!("Loading census data from {input:?}"))?;
    let base = pipeline::prepare_base_table(table, &config);
    Ok(Explorer::new(base, Arc::new(config)))
}

/// Overlays command-line selection flags on the session defaults.
pub fn selection_from_args(explorer: &Explorer, args: &SelectionArgs) -> SelectionState {
    let mut selection = explorer.default_selection();
    if let Some(region) = &args.region {
        selection.region = RegionFilter::from_label(region, &explorer.config().whole_dataset_label);
    }
    if let Some(primary) = &args.primary {
        selection.primary = primary.clone();
    }
    if let Some(secondary) = &args.secondary {
        selection.secondary = secondary.clone();
    }
    if let Some(search) = &args.search {
        selection.search = search.clone();
    }
    selection.log_color = args.log_color;
    debug!("Selection from arguments: {selection:?}");
    explorer.normalize(selection)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
