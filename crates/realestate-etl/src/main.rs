//! CLI entry point: clean a real-estate sales CSV and optionally load it into a table.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use realestate_etl::{EtlConfig, EtlJob, LoadStatus, RunReport, write_report};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean a real-estate sales CSV and replace-load it into a SQL table",
    long_about = "Cleans a real-estate sales export and writes realestate_cleaned_final.csv \
                  next to the source file. When a database URL is given the cleaned data \
                  also replaces the target table.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  DATABASE_URL    Connection string used when --db_url is not given\n  \
                  RUST_LOG        Overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  # Clean only\n  \
                  realestate-etl --csv data/realestate.csv\n\n  \
                  # Clean and load into MySQL\n  \
                  realestate-etl --csv data/realestate.csv --db_url mysql://etl:pw@localhost/sales"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(long)]
    csv: PathBuf,

    /// Database connection string (postgres://, mysql://, sqlite:)
    #[arg(long = "db_url", env = "DATABASE_URL")]
    db_url: Option<String>,

    /// Destination table name [default: realestate_clean]
    ///
    /// Takes precedence over `table_name` in the --config file.
    #[arg(long)]
    table: Option<String>,

    /// JSON file overriding column names and load settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Write a JSON run report next to the cleaned file
    ///
    /// The report will be saved as <cleaned_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<EtlConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Could not read config {}: {}", path.display(), e))?;
            EtlConfig::from_json(&json)?
        }
        None => EtlConfig::default(),
    };
    if let Some(table) = &args.table {
        config.table_name = table.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads DATABASE_URL
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    if !args.csv.exists() {
        return Err(anyhow!("Input file not found: {}", args.csv.display()));
    }

    let config = load_config(&args)?;
    let mut job = EtlJob::new(&args.csv).config(config);
    if let Some(url) = &args.db_url {
        job = job.db_url(url);
    }

    let outcome = job.run().await.map_err(|e| {
        error!("ETL run failed: {}", e);
        anyhow!("ETL run failed: {}", e)
    })?;

    let summary = &outcome.result.summary;
    info!(
        "Cleaned {} rows, {} -> {} columns",
        summary.rows, summary.columns_before, summary.columns_after
    );
    for skipped in summary.skipped_rules() {
        info!("Skipped {}: {}", skipped.rule, skipped.detail);
    }

    if args.emit_report {
        let report = RunReport {
            source: &args.csv,
            cleaned_file: &outcome.cleaned_path,
            load: &outcome.load,
            summary,
        };
        let path = write_report(&report)?;
        info!("Report written to: {}", path.display());
    }

    match &outcome.load {
        LoadStatus::Loaded { table, rows } => {
            info!("Data loaded to table {} ({} rows)", table, rows);
            Ok(())
        }
        LoadStatus::Skipped => {
            info!("No database URL provided, cleaned file only");
            Ok(())
        }
        LoadStatus::Failed { table, reason } => {
            warn!(
                "Cleaned file kept at {} despite the failed load",
                outcome.cleaned_path.display()
            );
            Err(anyhow!("Loading table '{}' failed: {}", table, reason))
        }
    }
}
