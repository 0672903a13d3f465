use std::path::PathBuf;
use std::process;

use clap::Parser;

use diskprobe::config::{PersistMode, ProbeConfig, RowSchema};
use diskprobe::probe::Prober;
use diskprobe::util::SizeUnit;
use diskprobe::{ProbeError, Result};

/// Sequential disk-load prober: times copy, chunked write, and whole-file
/// read trials against a source file and records them to a CSV log.
#[derive(Debug, Parser)]
#[command(name = "diskprobe", version, about)]
struct Cli {
    /// Source file to probe
    #[arg(required_unless_present = "config")]
    source: Option<PathBuf>,

    /// Work file path, or a directory to place the work file in
    /// (defaults to the current directory)
    #[arg(short, long, default_value = ".")]
    work: PathBuf,

    /// Number of trials to run
    #[arg(short = 'n', long, default_value_t = 10)]
    trials: u32,

    /// Unit for the reported source size: bytes, kb, mb or gb
    #[arg(short, long, default_value = "mb")]
    unit: String,

    /// Append to the results log instead of overwriting it
    #[arg(long)]
    append: bool,

    /// Include the source file name column in the results log
    #[arg(long)]
    with_name: bool,

    /// Include the source size column in the results log
    #[arg(long)]
    with_size: bool,

    /// Results log path (defaults to results.csv in the work directory)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Load the full probe configuration from a TOML file instead of flags
    #[arg(long, conflicts_with_all = ["source", "log"])]
    config: Option<PathBuf>,
}

fn build_config(cli: Cli) -> Result<ProbeConfig> {
    if let Some(path) = &cli.config {
        return ProbeConfig::from_file(path);
    }

    let source = cli
        .source
        .ok_or_else(|| ProbeError::Config("a source file is required".to_string()))?;
    let unit: SizeUnit = cli.unit.parse()?;

    let mode = if cli.append {
        PersistMode::Append
    } else {
        PersistMode::Overwrite
    };

    let mut config = ProbeConfig::new(source, cli.work, cli.trials)
        .with_size_unit(unit)
        .with_persist_mode(mode)
        .with_schema(RowSchema {
            include_file_name: cli.with_name,
            include_file_size: cli.with_size,
        });
    if let Some(log) = cli.log {
        config = config.with_log_path(log);
    }
    Ok(config)
}

fn run() -> Result<()> {
    let config = build_config(Cli::parse())?;
    Prober::new(config)?.run()
}

fn main() {
    if let Err(err) = run() {
        eprintln!("diskprobe: {}", err);
        process::exit(1);
    }
}
