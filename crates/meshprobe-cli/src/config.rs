//! Run configuration: an optional TOML file, overridden by CLI flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use meshprobe_kernel::{NativeEngine, DEFAULT_MERGE_TOLERANCE};
use serde::Deserialize;

/// Input used when neither the command line nor the config names one.
pub const DEFAULT_INPUT: &str = "cutter.json";

/// Settings for a meshprobe run.
///
/// ```toml
/// inputs = ["cutter.json", "part.json"]
/// output_dir = "out"
/// auto_merge = true
/// merge_tolerance = 1e-5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Mesh JSON files to process, in order.
    pub inputs: Vec<PathBuf>,
    /// Directory to write extracted meshes into.
    pub output_dir: Option<PathBuf>,
    /// Merge coincident vertices before building the solid.
    pub auto_merge: bool,
    /// Merge distance; defaults to [`DEFAULT_MERGE_TOLERANCE`].
    pub merge_tolerance: Option<f64>,
}

impl ProbeConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid meshprobe config")
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Inputs to process, falling back to [`DEFAULT_INPUT`].
    pub fn inputs(&self) -> Vec<PathBuf> {
        if self.inputs.is_empty() {
            vec![PathBuf::from(DEFAULT_INPUT)]
        } else {
            self.inputs.clone()
        }
    }

    /// Engine configured from these settings.
    pub fn engine(&self) -> NativeEngine {
        NativeEngine {
            auto_merge: self.auto_merge,
            merge_tolerance: self.merge_tolerance.unwrap_or(DEFAULT_MERGE_TOLERANCE),
        }
    }
}
