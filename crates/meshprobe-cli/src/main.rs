//! meshprobe CLI - build manifold solids from mesh JSON and time extraction.
//!
//! Usage: meshprobe [OPTIONS] [INPUTS]...
//!
//! With no inputs, reads `cutter.json` from the working directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use meshprobe_cli::{process_inputs, ProbeConfig};

#[derive(Parser)]
#[command(name = "meshprobe")]
#[command(version, about = "Build manifold solids from mesh JSON and time mesh extraction", long_about = None)]
struct Cli {
    /// Mesh JSON files to process
    inputs: Vec<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write each extracted mesh to <DIR>/<stem>.mesh.json
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Merge coincident vertices before building the solid
    #[arg(long)]
    merge: bool,

    /// Distance under which vertices are merged
    #[arg(long, value_name = "DIST")]
    merge_tolerance: Option<f64>,

    /// Print a JSON summary line per file to stdout
    #[arg(long)]
    summary: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<(ProbeConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => ProbeConfig::load(path)?,
            None => ProbeConfig::default(),
        };
        if !self.inputs.is_empty() {
            config.inputs = self.inputs;
        }
        if self.output.is_some() {
            config.output_dir = self.output;
        }
        if self.merge {
            config.auto_merge = true;
        }
        if self.merge_tolerance.is_some() {
            config.merge_tolerance = self.merge_tolerance;
        }
        Ok((config, self.summary))
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(0) => {}
        Ok(failed) => {
            log::error!("{failed} input(s) failed");
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(1);
        }
    }
}

/// Process every input; returns the number of inputs that failed.
fn run(cli: Cli) -> Result<usize> {
    let (config, summary) = cli.into_config()?;
    Ok(process_inputs(&config, summary))
}
