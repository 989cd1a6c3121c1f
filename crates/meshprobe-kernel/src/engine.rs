//! The seam between the driver and a geometry engine.
//!
//! A [`GeometryEngine`] turns a [`MeshDescription`] into an engine-side mesh
//! handle, then into a validated [`Solid`]. The driver only ever talks to
//! these traits, so a binding to an external library can replace
//! [`NativeEngine`] without touching the pipeline.

use meshprobe_ir::MeshDescription;

use crate::error::Result;
use crate::manifold::{Manifold, Properties};
use crate::mesh::{Mesh, DEFAULT_MERGE_TOLERANCE};

/// A validated solid produced by an engine.
pub trait Solid {
    /// Surface area and volume.
    fn properties(&self) -> Properties;

    /// Re-derive mesh buffers from the solid's internal representation.
    fn extract_mesh(&self) -> MeshDescription;
}

/// A geometry engine with a mesh constructor and a solid constructor.
pub trait GeometryEngine {
    /// Engine-side mesh handle.
    type Mesh;
    /// Engine-side solid handle.
    type Solid: Solid;

    /// Short engine name for diagnostics.
    fn name(&self) -> &str;

    /// Build a mesh handle from description buffers.
    fn make_mesh(&self, desc: MeshDescription) -> Result<Self::Mesh>;

    /// Build a solid from a mesh handle, rejecting non-manifold input.
    fn make_solid(&self, mesh: &Self::Mesh) -> Result<Self::Solid>;
}

/// Engine backed by this crate's [`Mesh`] and [`Manifold`].
#[derive(Debug, Clone, Copy)]
pub struct NativeEngine {
    /// Fill merge vectors for coincident vertices before building solids.
    pub auto_merge: bool,
    /// Distance under which [`Mesh::merge`] joins positions.
    pub merge_tolerance: f64,
}

impl Default for NativeEngine {
    fn default() -> Self {
        Self {
            auto_merge: false,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
        }
    }
}

impl GeometryEngine for NativeEngine {
    type Mesh = Mesh;
    type Solid = Manifold;

    fn name(&self) -> &str {
        "native"
    }

    fn make_mesh(&self, desc: MeshDescription) -> Result<Mesh> {
        let mut mesh = Mesh::new(desc)?;
        if self.auto_merge && mesh.merge(self.merge_tolerance) {
            log::info!("merged coincident vertices (tolerance {})", self.merge_tolerance);
        }
        Ok(mesh)
    }

    fn make_solid(&self, mesh: &Mesh) -> Result<Manifold> {
        Manifold::new(mesh)
    }
}

impl Solid for Manifold {
    fn properties(&self) -> Properties {
        Manifold::properties(self)
    }

    fn extract_mesh(&self) -> MeshDescription {
        self.get_mesh()
    }
}
