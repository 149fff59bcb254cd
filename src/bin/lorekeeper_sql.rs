//! lorekeeper-sql: Turn an exported sheet CSV into one SQL INSERT statement
//!
//! Usage:
//!   lorekeeper-sql classes_skills "csv/DnD entities data - Classes_Skills.csv"
//!   lorekeeper-sql public.spells spells.csv --output spells.sql

use anyhow::{Context, Result};
use clap::Parser;
use lorekeeper::sql::{convert_file, DEFAULT_OUTPUT};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lorekeeper-sql")]
#[command(about = "Convert a CSV export into a SQL INSERT statement", long_about = None)]
struct Args {
    /// Target table, e.g. public.spells
    table: String,

    /// CSV file with a header row
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    lorekeeper::logging::init(false);

    let rows = convert_file(&args.table, &args.input, &args.output)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    if rows == 0 {
        eprintln!("Warning: no data rows in {}", args.input.display());
    } else {
        println!("{} rows written to {}", rows, args.output.display());
    }
    Ok(())
}
