//! Load, map, construct, extract: one input file end to end.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use meshprobe_ir::{load_json, map_fields, JsonKeyType, MeshDescription};
use meshprobe_kernel::{GeometryEngine, Properties, Solid};
use serde_json::json;

use crate::config::ProbeConfig;

/// What a single run produced.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Input file.
    pub path: PathBuf,
    /// `typeof` of every top-level key in the input.
    pub key_types: Vec<(String, JsonKeyType)>,
    /// Fields present on the mapped description.
    pub keys: Vec<&'static str>,
    /// Properties of the constructed solid.
    pub properties: Properties,
    /// Wall-clock time spent in mesh extraction.
    pub extract_time: Duration,
    /// The extracted mesh.
    pub mesh: MeshDescription,
}

impl ProbeReport {
    /// Extraction time in fractional milliseconds.
    pub fn extract_ms(&self) -> f64 {
        self.extract_time.as_secs_f64() * 1000.0
    }

    /// One-line machine-readable summary.
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "path": self.path.display().to_string(),
            "numTri": self.mesh.num_tri(),
            "numVert": self.mesh.num_vert(),
            "properties": self.properties,
            "extractMs": self.extract_ms(),
        })
    }
}

/// Run the full pipeline for one JSON file.
pub fn create_manifold_from_json<E: GeometryEngine>(engine: &E, path: &Path) -> Result<ProbeReport> {
    let parsed = load_json(path)?;

    let key_types = JsonKeyType::of_keys(&parsed);
    log::info!("Types of keys in the parsed JSON:");
    for (key, ty) in &key_types {
        log::info!("{key}: {ty}");
    }

    let desc = map_fields(&parsed)?;
    let keys = desc.keys();
    log::info!("Mesh options keys: {keys:?}");

    let mesh = engine
        .make_mesh(desc)
        .with_context(|| format!("{} engine rejected mesh buffers", engine.name()))?;
    let solid = engine
        .make_solid(&mesh)
        .with_context(|| format!("{} engine could not build a manifold", engine.name()))?;
    let properties = solid.properties();
    log::info!("Manifold object created: {properties}");

    let start = Instant::now();
    let extracted = solid.extract_mesh();
    let extract_time = start.elapsed();

    let report = ProbeReport {
        path: path.to_path_buf(),
        key_types,
        keys,
        properties,
        extract_time,
        mesh: extracted,
    };
    log::info!("Execution time for getMesh: {} ms", report.extract_ms());
    Ok(report)
}

/// Write an extracted mesh as `<dir>/<stem>.mesh.json` and return the path.
pub fn write_mesh(dir: &Path, input: &Path, mesh: &MeshDescription) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let out = dir.join(format!("{stem}.mesh.json"));
    std::fs::write(&out, mesh.to_json()?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(out)
}

/// Process every input the config names, one after the other.
///
/// A failing file is logged and skipped; the rest are still processed.
/// Writes extracted meshes when `output_dir` is set and prints a summary line
/// per file when `summary` is true. Returns the number of inputs that failed.
pub fn process_inputs(config: &ProbeConfig, summary: bool) -> usize {
    let engine = config.engine();
    let mut failed = 0;

    for input in config.inputs() {
        log::info!("Processing {}", input.display());
        let report = match create_manifold_from_json(&engine, &input) {
            Ok(report) => report,
            Err(e) => {
                log::error!("{}: {e:#}", input.display());
                failed += 1;
                continue;
            }
        };

        if let Some(dir) = &config.output_dir {
            match write_mesh(dir, &input, &report.mesh) {
                Ok(path) => log::info!("Wrote {}", path.display()),
                Err(e) => {
                    log::error!("{e:#}");
                    failed += 1;
                }
            }
        }

        if summary {
            println!("{}", report.summary());
        }
    }

    failed
}
