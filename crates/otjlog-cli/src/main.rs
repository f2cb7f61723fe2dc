//! otjlog CLI - Off-the-job evidence log builder
//!
//! Reads a month of comments from a Trello board and writes the apprentice
//! evidence log as an Excel workbook.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};
use otjlog_board::TrelloClient;
use otjlog_core::{Renderer, Report};
use otjlog_extract::{DateExtractor, Extractor};
use otjlog_ledger::{collect_ledger, PeriodFilter, RecordAssembler};
use otjlog_render::{ExcelRenderer, JsonRenderer, TextRenderer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{FileConfig, Settings};

const DEFAULT_CONFIG: &str = "config.json";

#[derive(Parser)]
#[command(name = "otjlog")]
#[command(author, version, about = "Off-the-job evidence log builder", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the monthly evidence log workbook
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (defaults to "<NAME> OTJ Log <Month> <YEAR>.xlsx")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Banner text in the title block
        #[arg(long)]
        title: Option<String>,

        /// Leave the activity, KSB and category columns without dropdowns
        #[arg(long)]
        no_dropdowns: bool,
    },

    /// Print the month's records without writing a workbook
    Preview {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show what would be extracted from a comment
    Extract {
        /// Comment text
        #[arg(value_name = "TEXT")]
        text: String,

        /// Two-digit year for dates written without one (default: current year)
        #[arg(long)]
        fallback_year: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Where the board and period come from
#[derive(Args)]
struct SourceArgs {
    /// Config file (JSON, or TOML by extension)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reporting month (1-12)
    #[arg(long)]
    month: Option<u32>,

    /// Reporting year
    #[arg(long)]
    year: Option<i32>,

    /// Apprentice name
    #[arg(long)]
    name: Option<String>,

    /// Trello API key
    #[arg(long, env = "OTJLOG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Trello API token
    #[arg(long, env = "OTJLOG_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Trello board id
    #[arg(long, env = "OTJLOG_BOARD_ID")]
    board_id: Option<String>,

    /// API root
    #[arg(long, env = "OTJLOG_BASE_URL")]
    base_url: Option<String>,
}

impl SourceArgs {
    fn settings(self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None if Path::new(DEFAULT_CONFIG).exists() => {
                FileConfig::load(Path::new(DEFAULT_CONFIG))?
            }
            None => FileConfig::default(),
        };
        let overrides = FileConfig {
            api_key: self.api_key,
            token: self.token,
            board_id: self.board_id,
            name: self.name,
            month: self.month,
            year: self.year,
            fallback_year: None,
            base_url: self.base_url,
        };
        Ok(Settings::resolve(file.merge(overrides))?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    match cli.command {
        Some(Commands::Export {
            source,
            output,
            title,
            no_dropdowns,
        }) => {
            let mut renderer = ExcelRenderer::new();
            if let Some(title) = title {
                renderer = renderer.title(title);
            }
            if no_dropdowns {
                renderer = renderer.no_dropdowns();
            }
            cmd_export(source, output, &renderer)
        }
        Some(Commands::Preview { source, format }) => cmd_preview(source, format),
        Some(Commands::Extract {
            text,
            fallback_year,
            format,
        }) => cmd_extract(&text, fallback_year, format),
        None => {
            println!("otjlog - Off-the-job evidence log builder");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

/// Fetch the board and build the month's report
fn build_report(settings: Settings) -> Result<Report> {
    let client = TrelloClient::new(settings.credentials, &settings.base_url)?;
    let assembler = RecordAssembler::new(DateExtractor::new(settings.fallback_year));
    let filter = PeriodFilter::new(settings.period);

    info!(board = client.board_id(), period = %settings.period, "collecting ledger");
    let records = collect_ledger(&client, &assembler, &filter)
        .with_context(|| format!("Failed to read board {}", client.board_id()))?;

    Ok(Report::new(settings.apprentice, settings.period, records))
}

fn cmd_export(source: SourceArgs, output: Option<PathBuf>, renderer: &ExcelRenderer) -> Result<()> {
    let report = build_report(source.settings()?)?;
    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.xlsx", report.file_stem())));

    renderer
        .save(&report, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(records = report.records.len(), hours = report.total_hours(), "workbook written");
    println!("Data successfully exported to {}", path.display());
    Ok(())
}

fn cmd_preview(source: SourceArgs, format: OutputFormat) -> Result<()> {
    let report = build_report(source.settings()?)?;
    let rendered = match format {
        OutputFormat::Text => TextRenderer::new().render(&report)?,
        OutputFormat::Json => JsonRenderer::new().render(&report)?,
    };
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn cmd_extract(text: &str, fallback_year: Option<u32>, format: OutputFormat) -> Result<()> {
    let dates = fallback_year.map_or_else(
        || DateExtractor::for_year(Local::now().year()),
        DateExtractor::new,
    );
    let result = Extractor::with_date_extractor(dates).extract(text);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
            println!("date:     {}", or_dash(result.date.map(|d| d.to_string())));
            println!("duration: {}", or_dash(result.duration.map(|h| h.to_string())));
            println!("category: {}", or_dash(result.category.map(|c| c.to_string())));
            println!("text:     {}", result.residual_text);
        }
    }
    Ok(())
}
