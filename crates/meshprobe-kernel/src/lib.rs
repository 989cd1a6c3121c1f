#![warn(missing_docs)]

//! Native geometry engine for meshprobe.
//!
//! Turns [`MeshDescription`] buffers into a validated manifold solid and back:
//! 1. **Mesh**: length and index validation, optional vertex merging
//! 2. **Manifold**: merge resolution, halfedge pairing, manifold check
//! 3. **Extraction**: compacted buffers with merge vectors and run metadata
//!
//! The [`GeometryEngine`] and [`Solid`] traits are the seam the driver
//! programs against.

pub mod engine;
pub mod error;
pub mod manifold;
pub mod mesh;

pub use engine::{GeometryEngine, NativeEngine, Solid};
pub use error::{KernelError, Result};
pub use manifold::{reserve_ids, Manifold, Properties};
pub use mesh::{Mesh, DEFAULT_MERGE_TOLERANCE};
pub use meshprobe_ir::MeshDescription;
