//! lorekeeper-parse: Flatten D&D 5e API data into worksheets
//!
//! Usage:
//!   # Every entity type into the Google spreadsheet from URL_FOR_GSHEET
//!   lorekeeper-parse
//!
//!   # Everything except spells and classes
//!   lorekeeper-parse --skip spells --skip classes
//!
//!   # Only magic items, written as CSV files under ./sheets
//!   lorekeeper-parse --only magic-items --backend csv
//!
//!   # Parse without writing anywhere
//!   lorekeeper-parse --backend dry-run

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use lorekeeper::driver::ParseStatus;
use lorekeeper::{
    ApiClient, Config, CsvWorkbook, EntityKind, GoogleSheets, HttpTransport, JsonCache,
    MemoryWorkbook, Registry, SheetWriter, Workbook,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Google Sheets (needs URL_FOR_GSHEET and GSHEET_ACCESS_TOKEN)
    Google,
    /// One CSV file per worksheet in --output-dir
    Csv,
    /// Keep everything in memory and only report row counts
    DryRun,
}

#[derive(Parser, Debug)]
#[command(name = "lorekeeper-parse")]
#[command(about = "Flatten D&D 5e API data into worksheets", long_about = None)]
struct Args {
    /// Entity types to skip (repeatable)
    #[arg(long, value_name = "TYPE")]
    skip: Vec<EntityKind>,

    /// Only run these entity types (repeatable); overrides --skip
    #[arg(long, value_name = "TYPE")]
    only: Vec<EntityKind>,

    /// Where the rows go
    #[arg(long, value_enum, default_value_t = Backend::Google)]
    backend: Backend,

    /// API root (default: DND_API_URL or the public dnd5eapi.co)
    #[arg(long)]
    api_url: Option<String>,

    /// JSON cache directory (default: CACHE_DIR or ./cache)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Directory for the csv backend (default: OUTPUT_DIR or ./sheets)
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Spreadsheet URL or id for the google backend
    #[arg(long, env = "URL_FOR_GSHEET")]
    sheet: Option<String>,

    /// Debug-level logging for this crate
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    // .env must be loaded before clap reads env fallbacks
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    lorekeeper::logging::init(args.verbose);

    // Build config
    let mut config = Config::from_env();
    if let Some(url) = args.api_url.clone() {
        config.api_url = url;
    }
    if let Some(dir) = args.cache_dir.clone() {
        config.cache_dir = dir;
    }
    if let Some(dir) = args.output_dir.clone() {
        config.output_dir = dir;
    }
    if let Some(sheet) = args.sheet.clone() {
        config.sheet_url = Some(sheet);
    }

    match args.backend {
        Backend::Google => {
            let Some(url) = config.sheet_url.as_deref() else {
                bail!("no spreadsheet given: set URL_FOR_GSHEET or pass --sheet");
            };
            let Some(token) = config.sheet_token.as_deref() else {
                bail!("GSHEET_ACCESS_TOKEN is not set");
            };
            let book = GoogleSheets::new(url, token).context("Failed to open spreadsheet")?;
            run(&args, &config, book)
        }
        Backend::Csv => {
            let book = CsvWorkbook::new(&config.output_dir).with_context(|| {
                format!("Failed to create output directory {}", config.output_dir.display())
            })?;
            run(&args, &config, book)
        }
        Backend::DryRun => run(&args, &config, MemoryWorkbook::new()),
    }
}

fn run<W: Workbook>(args: &Args, config: &Config, workbook: W) -> Result<()> {
    let transport = HttpTransport::new().context("Failed to build HTTP client")?;
    let mut client = ApiClient::new(&config.api_url, transport, JsonCache::new(&config.cache_dir));
    let mut writer = SheetWriter::new(workbook);
    let registry = Registry::standard();

    let report = if args.only.is_empty() {
        registry.run_except(&mut client, &mut writer, &config.sheet_names, &args.skip)
    } else {
        registry.run_only(&mut client, &mut writer, &config.sheet_names, &args.only)
    };

    let mut failures = 0;
    for (kind, status) in &report {
        println!("{}: {}", kind, status);
        if let ParseStatus::Success(sheets) = status {
            for (sheet, rows) in sheets {
                println!("  {} ({} rows)", sheet, rows);
            }
        } else {
            failures += 1;
        }
    }

    if failures > 0 {
        eprintln!("⚠ {} of {} entity types did not complete", failures, report.len());
    }
    Ok(())
}
