//! Validated mesh buffers.
//!
//! [`Mesh`] wraps a [`MeshDescription`] whose buffer lengths and indices have
//! been checked, so the manifold builder can index without bounds errors.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use meshprobe_ir::MeshDescription;
use nalgebra::Point3;

use crate::error::{KernelError, Result};

/// Default distance below which [`Mesh::merge`] treats positions as equal.
pub const DEFAULT_MERGE_TOLERANCE: f64 = 1e-6;

/// Number of floats describing one run transform (3x4, column-major).
pub const TRANSFORM_LEN: usize = 12;

/// A mesh description that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    desc: MeshDescription,
}

impl Mesh {
    /// Validate a description and wrap it.
    ///
    /// Optional buffers that are present but empty are treated as absent, the
    /// way an empty typed array serializes from JS (`{}`).
    pub fn new(mut desc: MeshDescription) -> Result<Self> {
        drop_empty(&mut desc.face_id);
        drop_empty(&mut desc.halfedge_tangent);
        drop_empty(&mut desc.merge_from_vert);
        drop_empty(&mut desc.merge_to_vert);
        drop_empty(&mut desc.run_index);
        drop_empty(&mut desc.run_original_id);
        drop_empty(&mut desc.run_transform);
        validate(&desc)?;
        Ok(Self { desc })
    }

    /// The underlying buffers.
    pub fn description(&self) -> &MeshDescription {
        &self.desc
    }

    /// Unwrap into the underlying buffers.
    pub fn into_description(self) -> MeshDescription {
        self.desc
    }

    /// Properties per vertex.
    pub fn num_prop(&self) -> usize {
        self.desc.num_prop as usize
    }

    /// Number of property vertices.
    pub fn num_vert(&self) -> usize {
        self.desc.num_vert()
    }

    /// Number of triangles.
    pub fn num_tri(&self) -> usize {
        self.desc.num_tri()
    }

    /// Position of property vertex `v`.
    pub fn position(&self, v: usize) -> Point3<f64> {
        let base = v * self.num_prop();
        let p = &self.desc.vert_properties[base..base + 3];
        Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)
    }

    /// Property vertex indices of triangle `t`.
    pub fn tri(&self, t: usize) -> [u32; 3] {
        let c = &self.desc.tri_verts[3 * t..3 * t + 3];
        [c[0], c[1], c[2]]
    }

    /// Merge pairs as `(from, to)`.
    pub fn merge_pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let from = self.desc.merge_from_vert.as_deref().unwrap_or_default();
        let to = self.desc.merge_to_vert.as_deref().unwrap_or_default();
        from.iter().copied().zip(to.iter().copied())
    }

    /// Add merge pairs for vertices whose positions coincide within
    /// `tolerance`.
    ///
    /// Positions are snapped to a grid of cell size `tolerance`; vertices in
    /// the same cell merge into the lowest-indexed one. Vertices that are
    /// already the source of a merge pair are left alone. Returns `true` if
    /// any pair was added.
    pub fn merge(&mut self, tolerance: f64) -> bool {
        let cell = if tolerance > 0.0 { tolerance } else { f64::EPSILON };
        let mut from = self.desc.merge_from_vert.clone().unwrap_or_default();
        let mut to = self.desc.merge_to_vert.clone().unwrap_or_default();
        let already: HashSet<u32> = from.iter().copied().collect();
        let before = from.len();

        let mut first_in_cell: HashMap<[i64; 3], u32> = HashMap::new();
        for v in 0..self.num_vert() {
            let p = self.position(v);
            let key = [
                (p.x / cell).round() as i64,
                (p.y / cell).round() as i64,
                (p.z / cell).round() as i64,
            ];
            match first_in_cell.entry(key) {
                Entry::Occupied(e) => {
                    let v = v as u32;
                    if !already.contains(&v) {
                        from.push(v);
                        to.push(*e.get());
                    }
                }
                Entry::Vacant(e) => {
                    e.insert(v as u32);
                }
            }
        }

        if from.len() == before {
            return false;
        }
        log::debug!("merge added {} vertex pairs", from.len() - before);
        self.desc.merge_from_vert = Some(from);
        self.desc.merge_to_vert = Some(to);
        true
    }

    /// Offsets into `triVerts` bounding each run, always at least `[0, len]`.
    pub fn run_index(&self) -> Vec<u32> {
        match self.desc.run_index.as_deref() {
            Some(ri) if !ri.is_empty() => ri.to_vec(),
            _ => vec![0, self.desc.tri_verts.len() as u32],
        }
    }
}

fn drop_empty<T>(buffer: &mut Option<Vec<T>>) {
    if buffer.as_ref().is_some_and(Vec::is_empty) {
        *buffer = None;
    }
}

fn validate(desc: &MeshDescription) -> Result<()> {
    if desc.num_prop < 3 {
        return Err(KernelError::MissingPositionProperties(desc.num_prop));
    }
    let num_prop = desc.num_prop as usize;
    if desc.vert_properties.len() % num_prop != 0 {
        return Err(KernelError::PropertiesWrongLength {
            len: desc.vert_properties.len(),
            num_prop: desc.num_prop,
        });
    }
    if desc.tri_verts.len() % 3 != 0 {
        return Err(KernelError::TriVertsWrongLength(desc.tri_verts.len()));
    }

    let num_vert = desc.num_vert();
    let num_tri = desc.num_tri();

    for (i, &vert) in desc.tri_verts.iter().enumerate() {
        if vert as usize >= num_vert {
            return Err(KernelError::VertexOutOfBounds {
                tri: i / 3,
                vert,
                num_vert,
            });
        }
    }

    for (v, props) in desc.vert_properties.chunks_exact(num_prop).enumerate() {
        if !props[..3].iter().all(|x| x.is_finite()) {
            return Err(KernelError::NonFiniteVertex(v));
        }
    }

    let from = desc.merge_from_vert.as_deref().unwrap_or_default();
    let to = desc.merge_to_vert.as_deref().unwrap_or_default();
    if from.len() != to.len() {
        return Err(KernelError::MergeVectorsDifferentLengths {
            from: from.len(),
            to: to.len(),
        });
    }
    if let Some(&index) = from.iter().chain(to).find(|&&i| i as usize >= num_vert) {
        return Err(KernelError::MergeIndexOutOfBounds { index, num_vert });
    }

    if let Some(face_id) = &desc.face_id {
        if face_id.len() != num_tri {
            return Err(KernelError::FaceIdWrongLength {
                len: face_id.len(),
                expected: num_tri,
            });
        }
    }

    if let Some(tangents) = &desc.halfedge_tangent {
        let expected = 4 * desc.tri_verts.len();
        if tangents.len() != expected {
            return Err(KernelError::TangentsWrongLength {
                len: tangents.len(),
                expected,
            });
        }
    }

    validate_runs(desc)
}

fn validate_runs(desc: &MeshDescription) -> Result<()> {
    let num_runs = desc.run_original_id.as_ref().map_or(1, Vec::len);

    if let Some(run_index) = desc.run_index.as_deref().filter(|ri| !ri.is_empty()) {
        let expected = num_runs + 1;
        if run_index.len() != expected {
            return Err(KernelError::RunIndexWrongLength {
                len: run_index.len(),
                expected,
            });
        }
        if run_index[0] != 0 {
            return Err(KernelError::InvalidRunIndex(format!(
                "first offset is {}, expected 0",
                run_index[0]
            )));
        }
        if run_index.windows(2).any(|w| w[1] < w[0]) {
            return Err(KernelError::InvalidRunIndex("offsets decrease".into()));
        }
        let last = run_index[run_index.len() - 1] as usize;
        if last != desc.tri_verts.len() {
            return Err(KernelError::InvalidRunIndex(format!(
                "last offset is {last}, expected {}",
                desc.tri_verts.len()
            )));
        }
    } else if num_runs > 1 {
        return Err(KernelError::RunIndexWrongLength {
            len: 0,
            expected: num_runs + 1,
        });
    }

    if let Some(transform) = &desc.run_transform {
        let expected = TRANSFORM_LEN * num_runs;
        if transform.len() != expected {
            return Err(KernelError::TransformWrongLength {
                len: transform.len(),
                expected,
            });
        }
    }

    Ok(())
}
