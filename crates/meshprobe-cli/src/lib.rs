//! Driver library behind the `meshprobe` binary.

pub mod config;
pub mod pipeline;

pub use config::{ProbeConfig, DEFAULT_INPUT};
pub use pipeline::{create_manifold_from_json, process_inputs, write_mesh, ProbeReport};
