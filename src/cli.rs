use crate::config::load_config;
use crate::document::FlowDocument;
use crate::report::{GroupingReport, ReportFormat, write_report};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(
    name = "flowgroup",
    version,
    about = "Group flow diagram nodes into connected workflows"
)]
pub struct Args {
    /// Input flow document (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Config JSON file (grouping thresholds, type vocabulary)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    let document = read_document(args.input.as_deref())?;
    document.validate()?;

    let grouping = document.group(&config.grouping);
    info!(
        workflows = grouping.len(),
        ungrouped_nodes = grouping.ungrouped_nodes.len(),
        "grouped document"
    );
    let report = GroupingReport::from_grouping(&grouping);
    write_report(
        &report,
        args.format.into(),
        config.output.pretty,
        args.output.as_deref(),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

fn read_document(path: Option<&Path>) -> Result<FlowDocument> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(FlowDocument::load(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(FlowDocument::from_json(&buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from(["flowgroup", "-i", "flow.json", "-f", "json", "-vv"]).unwrap();
        assert_eq!(args.input, Some(PathBuf::from("flow.json")));
        assert!(matches!(args.format, OutputFormat::Json));
        assert_eq!(args.verbose, 2);

        let args = Args::try_parse_from(["flowgroup", "--configFile", "grouping.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("grouping.json")));
        assert!(Args::try_parse_from(["flowgroup", "--config", "grouping.json"]).is_err());
    }
}
