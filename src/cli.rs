use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore district-level census data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the dashboard once for the given selection
    Render(RenderArgs),
    /// List the region and attribute choices offered by the selectors
    Options(OptionsArgs),
    /// Start an interactive session that re-renders after every selection change
    Explore(ExploreArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Census CSV file (defaults to the configured data path)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// YAML configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Region to keep; the whole-dataset label keeps every row
    #[arg(long)]
    pub region: Option<String>,
    /// Numeric column mapped to point size
    #[arg(long)]
    pub primary: Option<String>,
    /// Numeric column mapped to point color and ranked in the bar chart
    #[arg(long)]
    pub secondary: Option<String>,
    /// Case-insensitive district name substring
    #[arg(long)]
    pub search: Option<String>,
    /// Color points by log1p of the secondary column
    #[arg(long = "log-color")]
    pub log_color: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Primary column used to compute the secondary choices
    #[arg(long)]
    pub primary: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ExploreArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Output format for each rendered page
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_symbols() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("pipe"), Ok(b'|'));
        assert_eq!(parse_delimiter(":"), Ok(b':'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn render_args_parse_selection_flags() {
        let cli = Cli::try_parse_from([
            "census-explorer",
            "render",
            "-i",
            "census.csv",
            "--region",
            "Goa",
            "--secondary",
            "Sex_Ratio",
            "--log-color",
            "--format",
            "json",
        ])
        .expect("parse render args");
        let Commands::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.source.input, Some(PathBuf::from("census.csv")));
        assert_eq!(args.selection.region.as_deref(), Some("Goa"));
        assert!(args.selection.log_color);
        assert_eq!(args.format, OutputFormat::Json);
    }
}
