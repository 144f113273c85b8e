//! Interactive explore session.
//!
//! Each line read from the input is one widget event. Events that change the
//! selection re-run the whole pipeline against the session's base table and
//! re-present the dashboard; informational commands print without rendering.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use log::info;
use thiserror::Error;

use crate::{
    cli::{ExploreArgs, OutputFormat},
    delegate,
    filter::RegionFilter,
    options_cmd::{OptionsReport, write_report},
    pipeline::Explorer,
    selection::SelectionState,
};

const PROMPT: &str = "> ";

const HELP: &str = "\
commands:
  region <name>      keep one region (the whole-dataset label keeps all rows)
  primary <column>   numeric column for point size
  secondary <column> numeric column for point color and the bar chart
  search [text]      district substring filter; no text clears it
  log on|off         log1p color scale
  reset              restore the default selection
  show               render the current selection again
  options            list selector choices
  state              print the current selection
  help               this text
  quit               leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Region(String),
    Primary(String),
    Secondary(String),
    Search(String),
    LogColor(bool),
    Reset,
    Show,
    Options,
    State,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'; type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs a value")]
    MissingArgument(&'static str),
    #[error("Expected 'on' or 'off' after 'log', found '{0}'")]
    InvalidToggle(String),
}

impl ShellCommand {
    /// Parses one input line; blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };
        let required = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest.to_string())
            }
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "region" => ShellCommand::Region(required("region")?),
            "primary" => ShellCommand::Primary(required("primary")?),
            "secondary" => ShellCommand::Secondary(required("secondary")?),
            "search" => ShellCommand::Search(rest.to_string()),
            "log" => match rest.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" => ShellCommand::LogColor(true),
                "off" | "false" | "no" => ShellCommand::LogColor(false),
                _ => return Err(CommandError::InvalidToggle(rest.to_string())),
            },
            "reset" => ShellCommand::Reset,
            "show" => ShellCommand::Show,
            "options" => ShellCommand::Options,
            "state" => ShellCommand::State,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// The selection after this command, or `None` for commands that leave it unchanged.
    pub fn apply(&self, selection: &SelectionState, explorer: &Explorer) -> Option<SelectionState> {
        let mut next = selection.clone();
        match self {
            ShellCommand::Region(label) => {
                next.region =
                    RegionFilter::from_label(label, &explorer.config().whole_dataset_label);
            }
            ShellCommand::Primary(column) => next.primary = column.clone(),
            ShellCommand::Secondary(column) => next.secondary = column.clone(),
            ShellCommand::Search(text) => next.search = text.clone(),
            ShellCommand::LogColor(enabled) => next.log_color = *enabled,
            ShellCommand::Reset => return Some(explorer.default_selection()),
            _ => return None,
        }
        Some(explorer.normalize(next))
    }
}

pub fn execute(args: &ExploreArgs) -> Result<()> {
    let explorer = crate::open_explorer(&args.source)?;
    let selection = crate::selection_from_args(&explorer, &args.selection);
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&explorer, selection, stdin.lock(), stdout.lock(), args.format)
}

pub fn run_session<R, W>(
    explorer: &Explorer,
    initial: SelectionState,
    input: R,
    mut out: W,
    format: OutputFormat,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut selection = explorer.normalize(initial);
    let mut renders = 1usize;
    delegate::present(&explorer.render(&selection), format, &mut out)?;
    prompt(&mut out, format)?;

    for line in input.lines() {
        let line = line.context("Reading command")?;
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => {
                prompt(&mut out, format)?;
                continue;
            }
            Err(err) => {
                writeln!(out, "{err}")?;
                prompt(&mut out, format)?;
                continue;
            }
        };
        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Options => {
                let report = OptionsReport::new(explorer, Some(&selection.primary));
                write_report(&report, format, &mut out)?;
            }
            ShellCommand::State => writeln!(
                out,
                "{}",
                describe(&selection, &explorer.config().whole_dataset_label)
            )?,
            ShellCommand::Show => {
                delegate::present(&explorer.render(&selection), format, &mut out)?;
                renders += 1;
            }
            other => {
                if let Some(next) = other.apply(&selection, explorer) {
                    selection = next;
                    delegate::present(&explorer.render(&selection), format, &mut out)?;
                    renders += 1;
                }
            }
        }
        prompt(&mut out, format)?;
    }
    out.flush().context("Flushing session output")?;
    info!("Explore session ended after {renders} render(s)");
    Ok(())
}

fn prompt<W: Write>(out: &mut W, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Text {
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    Ok(())
}

pub fn describe(selection: &SelectionState, whole_label: &str) -> String {
    format!(
        "region={} primary={} secondary={} search={:?} log_color={}",
        selection.region.label(whole_label),
        selection.primary,
        selection.secondary,
        selection.search,
        if selection.log_color { "on" } else { "off" }
    )
}
