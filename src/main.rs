use anyhow::{anyhow, Context, Result};
use chartflow::{dispatch, ChartDto, Dataset};
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "chartflow")]
#[command(about = "Map a declarative chart config and its rows to renderer-ready chart data", long_about = None)]
struct Args {
    /// Chart DTO JSON file ({"config": ..., "data": [...]}); reads stdin when omitted
    config: Option<PathBuf>,

    /// Replace the DTO's rows with a .csv or .json file
    #[arg(long)]
    data: Option<PathBuf>,

    /// Active view id (defaults to the config's defaultView)
    #[arg(long)]
    view: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

fn read_dto(path: Option<&Path>) -> Result<ChartDto> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read chart config {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read chart config from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("Failed to parse chart config JSON")
}

fn read_dataset(path: &Path) -> Result<Dataset> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match extension.to_ascii_lowercase().as_str() {
        "csv" => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            Dataset::from_csv(file).with_context(|| format!("Failed to load CSV data from {}", path.display()))
        }
        "json" => {
            let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text).context("Failed to parse data JSON")?;
            Dataset::from_json(&value).with_context(|| format!("Failed to load JSON data from {}", path.display()))
        }
        _ => Err(anyhow!(
            "Unsupported data file '{}': expected a .csv or .json extension",
            path.display()
        )),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut dto = read_dto(args.config.as_deref())?;
    if let Some(path) = &args.data {
        let dataset = read_dataset(path)?;
        debug!(path = %path.display(), rows = dataset.rows.len(), columns = ?dataset.headers(), "loaded data");
        dto.data = dataset.into_rows();
    }

    let active_view = args.view.as_deref().or(dto.config.default_view.as_deref());
    let output = dispatch(&dto, active_view);

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize chart output")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
