//! Reprojection job runner.
//!
//! Reads a YAML job file, resamples the input grid and writes the result
//! as JSON.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use reproject::{InterpolationOrder, ReprojectConfig};
use reproject_cli::{job, run_job};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reproject-cli")]
#[command(about = "Resample sky grids between world coordinate systems")]
struct Args {
    /// Job file (YAML)
    job: PathBuf,

    /// Override the job's output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Interpolation order (nearest, bilinear, bicubic or 0, 1, 3)
    #[arg(long, env = "REPROJECT_ORDER")]
    order: Option<InterpolationOrder>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(args: &Args) -> Result<()> {
    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(args.log_level.to_lowercase()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if args.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args)?;

    let mut job = job::load_job(&args.job)?;
    if let Some(output) = &args.output {
        job.output = output.clone();
    }

    let mut config = job.config.unwrap_or_else(ReprojectConfig::from_env);
    if let Some(order) = args.order {
        config.order = order;
    }

    info!(job = ?args.job, task = job.task.name(), "Starting reprojection job");
    let summary = run_job(&job, config)?;
    info!(
        shape = ?summary.shape,
        coverage = summary.coverage,
        "Done"
    );

    Ok(())
}
