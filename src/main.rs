use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use invoice_export::config::{config_dir, init_config, load_config_with_env, Config};
use invoice_export::error::Result;
use invoice_export::logging;
use invoice_export::pipeline::{build_groups, export, parse_now};
use invoice_export::remote::{
    Destination, GreenInvoiceClient, InvoiceSource, JsonFileSource, PublishSink, SheetsClient,
};
use invoice_export::table::render_summary;

#[derive(Parser)]
#[command(name = "invoice-export")]
#[command(
    version,
    about = "Group open invoices by client and export them as CSV / Google Sheets",
    long_about = None
)]
struct Cli {
    /// Path to config directory (default: XDG config dir)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log debug events (dropped invoices, requests) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Fetch open invoices, write the grouped CSV and publish it to the spreadsheet
    Export {
        /// Read a saved invoice search response instead of calling the API
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write CSV to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip publishing to Google Sheets
        #[arg(long)]
        no_publish: bool,

        /// Reference time for due-date status (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, default: now)
        #[arg(long)]
        now: Option<String>,

        /// Spreadsheet name (overrides config)
        #[arg(long)]
        spreadsheet: Option<String>,

        /// Worksheet name (overrides config)
        #[arg(long)]
        worksheet: Option<String>,
    },

    /// Show a per-client summary of open invoices
    Clients {
        /// Read a saved invoice search response instead of calling the API
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Reference time for due-date status (default: now)
        #[arg(long)]
        now: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Export {
            input,
            output,
            no_publish,
            now,
            spreadsheet,
            worksheet,
        } => cmd_export(
            &cfg_dir,
            input,
            output,
            !no_publish,
            now.as_deref(),
            spreadsheet,
            worksheet,
        ),
        Commands::Clients { input, now } => cmd_clients(&cfg_dir, input, now.as_deref()),
    }
}

/// Initialize config directory with the template
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config(cfg_dir)?;

    println!("Initialized invoice-export config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Add API credentials:  $EDITOR {}", path.display());
    println!("  2. Export:               invoice-export export --output invoices.csv");

    Ok(())
}

fn reference_time(now: Option<&str>) -> Result<NaiveDateTime> {
    match now {
        Some(value) => parse_now(value),
        None => Ok(Local::now().naive_local()),
    }
}

fn invoice_source(config: &Config, input: Option<PathBuf>) -> Result<Box<dyn InvoiceSource>> {
    let source: Box<dyn InvoiceSource> = match input {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(GreenInvoiceClient::from_settings(&config.greeninvoice)?),
    };
    Ok(source)
}

/// Fetch, flatten, publish and write the CSV
fn cmd_export(
    cfg_dir: &Path,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    publish: bool,
    now: Option<&str>,
    spreadsheet: Option<String>,
    worksheet: Option<String>,
) -> Result<()> {
    let now = reference_time(now)?;
    let config = load_config_with_env(cfg_dir)?;
    let source = invoice_source(&config, input)?;

    let sheets = if publish {
        Some(SheetsClient::from_settings(&config.sheets)?)
    } else {
        None
    };
    let destination = Destination {
        spreadsheet: spreadsheet.unwrap_or_else(|| config.sheets.spreadsheet.clone()),
        worksheet: worksheet.unwrap_or_else(|| config.sheets.worksheet.clone()),
    };
    let sink = sheets
        .as_ref()
        .map(|client| (client as &dyn PublishSink, &destination));

    let csv = export(source.as_ref(), sink, now)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &csv)?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(csv.as_bytes())?;
            stdout.flush()?;
        }
    }

    if publish {
        eprintln!(
            "Published to '{}' / '{}'",
            destination.spreadsheet, destination.worksheet
        );
    }

    Ok(())
}

/// Print the per-client summary table
fn cmd_clients(cfg_dir: &Path, input: Option<PathBuf>, now: Option<&str>) -> Result<()> {
    let now = reference_time(now)?;
    let config = load_config_with_env(cfg_dir)?;
    let source = invoice_source(&config, input)?;

    let groups = build_groups(source.as_ref(), now)?;

    if groups.is_empty() {
        println!("No open invoices.");
        return Ok(());
    }

    println!("{}", render_summary(&groups));
    println!();
    println!("Total: {} clients", groups.len());

    Ok(())
}
