//! Sheetwire CLI - A1 conversions and offline save planning

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use sheetwire::api::{BatchUpdateRequest, Sheet};
use sheetwire::prelude::*;
use sheetwire::{column_number_to_letters, letters_to_column_number};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetwire")]
#[command(
    author,
    version,
    about = "A1 reference conversions and batch update planning"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a column number to letters, or letters to a number
    #[command(alias = "col")]
    Column {
        /// Column number (1-based) or letters
        value: String,
    },

    /// Decode an A1 reference or range into 0-based coordinates
    Parse {
        /// A1 reference, e.g. B7, A1:C4 or 'My Sheet'!A1
        reference: String,
    },

    /// Encode 0-based coordinates as an A1 reference
    Format {
        /// Row index (0-based)
        row: u32,

        /// Column index (0-based)
        col: u32,
    },

    /// Show a summary of a sheet resource
    Info {
        /// Sheet resource JSON (properties plus optional grid data)
        sheet: PathBuf,
    },

    /// Print the batch update request that would save a set of edits
    Plan {
        /// Sheet resource JSON (properties plus grid data of the edited cells)
        sheet: PathBuf,

        /// JSON object of edits, e.g. {"A1": 3, "B1": "=A1*2", "C1": null}
        edits: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not ask for the saved ranges back
        #[arg(long)]
        no_fetch_back: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Column { value } => convert_column(&value),
        Commands::Parse { reference } => parse_reference(&reference),
        Commands::Format { row, col } => {
            println!("{}", CellAddress::new(row, col));
            Ok(())
        }
        Commands::Info { sheet } => show_info(&sheet),
        Commands::Plan {
            sheet,
            edits,
            output,
            no_fetch_back,
        } => plan(&sheet, &edits, output.as_deref(), !no_fetch_back),
    }
}

fn convert_column(value: &str) -> Result<()> {
    let converted = match value.parse::<u32>() {
        Ok(n) => column_number_to_letters(n)?,
        Err(_) => letters_to_column_number(value)?.to_string(),
    };
    println!("{}", converted);
    Ok(())
}

fn parse_reference(reference: &str) -> Result<()> {
    let range = A1Range::parse(reference)
        .with_context(|| format!("Failed to parse '{}'", reference))?;

    if let Some(sheet) = &range.sheet {
        println!("sheet\t{}", sheet);
    }
    println!("start\t{}\t{}", range.start.row, range.start.col);
    if let Some(end) = range.end {
        println!("end\t{}\t{}", end.row, end.col);
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse '{}'", path.display()))
}

fn load_sheet(path: &Path) -> Result<Worksheet> {
    let sheet: Sheet = read_json(path)?;
    Ok(Worksheet::from_sheet(sheet))
}

fn show_info(path: &Path) -> Result<()> {
    let sheet = load_sheet(path)?;

    println!("Sheet: \"{}\" (id {})", sheet.title(), sheet.sheet_id());
    println!(
        "  Grid: {} rows x {} columns",
        sheet.row_count(),
        sheet.column_count()
    );
    if let Ok(last) = sheet.last_column_letter() {
        println!("  Last column: {}", last);
    }
    println!("  Cells loaded: {}", sheet.cells_loaded());
    Ok(())
}

/// Stage every edit on the sheet
fn apply_edits(sheet: &mut Worksheet, edits: Map<String, Value>) -> Result<()> {
    for (address, value) in edits {
        let input = CellInput::try_from(value)
            .with_context(|| format!("Invalid value for {}", address))?;
        sheet
            .cell_by_a1_mut(&address)
            .with_context(|| format!("Cannot edit {}", address))?
            .set_value(input)
            .with_context(|| format!("Cannot edit {}", address))?;
    }
    Ok(())
}

fn build_plan(sheet: &mut Worksheet, edits: Value, fetch_back: bool) -> Result<BatchUpdateRequest> {
    let Value::Object(edits) = edits else {
        bail!("Edits must be a JSON object of A1 address to value");
    };
    apply_edits(sheet, edits)?;

    let batch = sheet.plan_save();
    tracing::info!(
        "{} edits in {} update runs",
        batch.addresses().count(),
        batch.groups.len()
    );
    Ok(batch.to_request(fetch_back))
}

fn plan(sheet: &Path, edits: &Path, output: Option<&Path>, fetch_back: bool) -> Result<()> {
    let mut worksheet = load_sheet(sheet)?;
    let edits: Value = read_json(edits)?;

    let request = build_plan(&mut worksheet, edits, fetch_back)?;
    if request.requests.is_empty() {
        eprintln!("Warning: nothing to save");
    }
    let body = serde_json::to_string_pretty(&request)?;

    if let Some(output_path) = output {
        std::fs::write(output_path, &body)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!(
            "Wrote {} requests to '{}'",
            request.requests.len(),
            output_path.display()
        );
    } else {
        let mut stdout = io::stdout();
        stdout
            .write_all(body.as_bytes())
            .and_then(|_| stdout.write_all(b"\n"))
            .context("Failed to write to stdout")?;
    }

    Ok(())
}
