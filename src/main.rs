use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use incident_loader::{DatasetLoader, LoaderConfig, LogReporter, DEFAULT_PATH};

/// Load an incident table, drop rows without coordinates and show what a
/// map widget would receive.
#[derive(Debug, Parser)]
#[command(name = "incident-loader", version, about)]
struct Cli {
    /// Input file (.csv, .json or .parquet)
    #[arg(default_value = DEFAULT_PATH)]
    path: PathBuf,

    /// Rename coordinate columns to latitude/longitude
    #[arg(long)]
    map: bool,

    /// Write the cleaned table to this CSV file
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Print the cleaned table as JSON records
    #[arg(long)]
    json: bool,

    /// Loader configuration (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LoaderConfig::from_json_file(path)?,
        None => LoaderConfig::default(),
    };
    let loader = DatasetLoader::new(config, Arc::new(LogReporter));

    let dataset = loader.load(&cli.path, cli.map);
    if dataset.is_empty() {
        // the loader already reported why
        std::process::exit(1);
    }

    println!("{} records, columns: {}", dataset.len(), dataset.columns.join(", "));

    if let Some(out) = &cli.out {
        dataset
            .write_csv(out)
            .with_context(|| format!("writing {}", out.display()))?;
        println!("Wrote cleaned table to {}", out.display());
    }

    if cli.json {
        let text = serde_json::to_string_pretty(&dataset.to_json_records())
            .context("serializing records")?;
        println!("{text}");
    }

    Ok(())
}
