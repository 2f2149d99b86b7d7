mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod simd;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::input::TiffStackSource;
use crate::model::config::{ConfigError, ExperimentConfig};
use crate::pipeline::run_pipeline;
use crate::pipeline::stage5_report::{Stage5Input, write_reports};
use crate::report::{ReportError, ToolMeta};

const TOOL_NAME: &str = "kira-contrastqc";

#[derive(Debug, Parser)]
#[command(name = TOOL_NAME, version, about = "Bright-pixel contrast over time for fluorescence stacks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyse every configured group and write reports and figures.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Directory holding the strain folders.
    #[arg(long)]
    root: PathBuf,
    /// Output directory.
    #[arg(long)]
    out: PathBuf,
    #[arg(long, value_enum, default_value_t = Preset::Replicates)]
    preset: Preset,
    /// JSON experiment config; replaces the preset.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    threshold: Option<f64>,
    #[arg(long)]
    frame_limit: Option<usize>,
    #[arg(long)]
    frame_interval_ms: Option<f64>,
    #[arg(long)]
    no_figures: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Full-sensor replicate acquisitions, symmetric bottom population.
    Replicates,
    /// Cropped cells, fixed background reference.
    Crops,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(&args),
    };
    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), AppError> {
    let config = resolve_config(args)?;
    tracing::info!(
        "SIMD backend: {}; layout {}; bottom population {}; q={}, frame_limit={}",
        simd::backend_name(),
        config.layout.name(),
        config.bottom.describe(),
        config.threshold,
        config.frame_limit
    );

    let output = run_pipeline(&args.root, &config, &TiffStackSource);

    let input = Stage5Input {
        output: &output,
        config: &config,
        root: &args.root,
        tool: tool_meta(),
        render_figures: !args.no_figures,
    };
    write_reports(&input, &args.out)?;
    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<ExperimentConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::from_json_path(path)?,
        None => match args.preset {
            Preset::Replicates => ExperimentConfig::replicates_v1(),
            Preset::Crops => ExperimentConfig::crops_v1(),
        },
    };
    if let Some(q) = args.threshold {
        config.threshold = q;
    }
    if let Some(limit) = args.frame_limit {
        config.frame_limit = limit;
    }
    if let Some(interval) = args.frame_interval_ms {
        config.frame_interval_ms = interval;
    }
    config.validate()?;
    Ok(config)
}

/// `git_hash` is the commit recorded by the build script; absent outside a git checkout.
fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("KIRA_CONTRASTQC_GIT_HASH").map(str::to_string),
        simd_backend: simd::backend_name().to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
