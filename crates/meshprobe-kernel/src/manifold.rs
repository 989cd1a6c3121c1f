//! Manifold solids built from validated meshes.
//!
//! Construction resolves merge vectors into shared position vertices, builds
//! three halfedges per triangle, and pairs every halfedge with exactly one
//! opposite. Any open or over-shared edge makes the input non-manifold.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use meshprobe_ir::MeshDescription;
use nalgebra::{Matrix3x4, Point3};
use serde::Serialize;

use crate::error::{KernelError, Result};
use crate::mesh::{Mesh, TRANSFORM_LEN};

static NEXT_ORIGINAL_ID: AtomicU32 = AtomicU32::new(1);

/// Reserve `n` consecutive original mesh IDs and return the first.
pub fn reserve_ids(n: u32) -> u32 {
    NEXT_ORIGINAL_ID.fetch_add(n, Ordering::Relaxed)
}

/// Measured properties of a solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    /// Total surface area.
    pub surface_area: f64,
    /// Enclosed volume (signed; positive for outward-facing triangles).
    pub volume: f64,
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ surfaceArea: {}, volume: {} }}",
            self.surface_area, self.volume
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Halfedge {
    start: u32,
    end: u32,
    paired: u32,
}

/// A closed, oriented 2-manifold triangle mesh.
#[derive(Debug, Clone)]
pub struct Manifold {
    mesh: Mesh,
    /// Position vertex of every property vertex; `u32::MAX` if unreferenced.
    prop_to_pos: Vec<u32>,
    positions: Vec<Point3<f64>>,
    halfedges: Vec<Halfedge>,
    run_original_id: Vec<u32>,
}

impl Manifold {
    /// Build a manifold from a validated mesh.
    pub fn new(mesh: &Mesh) -> Result<Self> {
        let roots = merge_roots(mesh);

        // Compact referenced roots into position vertices in first-use order.
        let mut root_to_pos: HashMap<u32, u32> = HashMap::new();
        let mut positions = Vec::new();
        let mut prop_to_pos = vec![u32::MAX; mesh.num_vert()];
        for &v in &mesh.description().tri_verts {
            let root = roots[v as usize];
            let pos = *root_to_pos.entry(root).or_insert_with(|| {
                positions.push(mesh.position(root as usize));
                (positions.len() - 1) as u32
            });
            prop_to_pos[v as usize] = pos;
        }

        let mut halfedges = Vec::with_capacity(3 * mesh.num_tri());
        for t in 0..mesh.num_tri() {
            let [a, b, c] = mesh.tri(t).map(|v| prop_to_pos[v as usize]);
            if a == b || b == c || c == a {
                return Err(KernelError::DegenerateTriangle(t));
            }
            for (start, end) in [(a, b), (b, c), (c, a)] {
                halfedges.push(Halfedge {
                    start,
                    end,
                    paired: u32::MAX,
                });
            }
        }
        pair_halfedges(&mut halfedges)?;

        let run_original_id = match &mesh.description().run_original_id {
            Some(ids) => ids.clone(),
            None => vec![reserve_ids(1)],
        };

        log::debug!(
            "built manifold: {} verts, {} halfedges, {} runs",
            positions.len(),
            halfedges.len(),
            run_original_id.len()
        );

        Ok(Self {
            mesh: mesh.clone(),
            prop_to_pos,
            positions,
            halfedges,
            run_original_id,
        })
    }

    /// True if the solid has no triangles.
    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// Number of position vertices after merging.
    pub fn num_vert(&self) -> usize {
        self.positions.len()
    }

    /// Number of edges.
    pub fn num_edge(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Number of triangles.
    pub fn num_tri(&self) -> usize {
        self.halfedges.len() / 3
    }

    /// Genus, assuming a single connected component.
    pub fn genus(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        let euler = self.num_vert() as i64 - self.num_edge() as i64 + self.num_tri() as i64;
        1 - euler / 2
    }

    /// Axis-aligned bounds, or `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    /// Surface area and volume.
    pub fn properties(&self) -> Properties {
        let mut surface_area = 0.0;
        let mut volume = 0.0;
        for tri in self.halfedges.chunks_exact(3) {
            let p0 = self.positions[tri[0].start as usize].coords;
            let p1 = self.positions[tri[1].start as usize].coords;
            let p2 = self.positions[tri[2].start as usize].coords;
            surface_area += 0.5 * (p1 - p0).cross(&(p2 - p0)).norm();
            volume += p0.dot(&p1.cross(&p2));
        }
        Properties {
            surface_area,
            volume: volume / 6.0,
        }
    }

    /// Original mesh ID of each run.
    pub fn run_original_ids(&self) -> &[u32] {
        &self.run_original_id
    }

    /// Transform of each run; identity when the input carried none.
    pub fn run_transforms(&self) -> Vec<Matrix3x4<f32>> {
        match &self.mesh.description().run_transform {
            Some(t) => t
                .chunks_exact(TRANSFORM_LEN)
                .map(|c| Matrix3x4::from_column_slice(c))
                .collect(),
            None => vec![Matrix3x4::identity(); self.run_original_id.len()],
        }
    }

    /// Re-derive mesh buffers from the solid.
    ///
    /// Only property vertices referenced by a triangle survive, renumbered in
    /// first-use order. Property vertices sharing a position vertex are tied
    /// together by merge vectors pointing at the first of them.
    pub fn get_mesh(&self) -> MeshDescription {
        let src = self.mesh.description();
        let num_prop = self.mesh.num_prop();

        let mut old_to_new: HashMap<u32, u32> = HashMap::new();
        let mut vert_properties = Vec::new();
        let mut tri_verts = Vec::with_capacity(src.tri_verts.len());
        let mut canonical: HashMap<u32, u32> = HashMap::new();
        let mut merge_from_vert = Vec::new();
        let mut merge_to_vert = Vec::new();

        for &v in &src.tri_verts {
            let new = match old_to_new.get(&v) {
                Some(&new) => new,
                None => {
                    let new = old_to_new.len() as u32;
                    old_to_new.insert(v, new);
                    let base = v as usize * num_prop;
                    vert_properties.extend_from_slice(&src.vert_properties[base..base + num_prop]);

                    let pos = self.prop_to_pos[v as usize];
                    match canonical.get(&pos) {
                        Some(&first) => {
                            merge_from_vert.push(new);
                            merge_to_vert.push(first);
                        }
                        None => {
                            canonical.insert(pos, new);
                        }
                    }
                    new
                }
            };
            tri_verts.push(new);
        }

        let run_transform = self
            .run_transforms()
            .iter()
            .flat_map(|m| m.as_slice().to_vec())
            .collect();

        MeshDescription {
            num_prop: src.num_prop,
            tri_verts,
            vert_properties,
            face_id: src.face_id.clone(),
            halfedge_tangent: src.halfedge_tangent.clone(),
            merge_from_vert: Some(merge_from_vert),
            merge_to_vert: Some(merge_to_vert),
            run_index: Some(self.mesh.run_index()),
            run_original_id: Some(self.run_original_id.clone()),
            run_transform: Some(run_transform),
        }
    }
}

/// Resolve merge vectors into a root property vertex per vertex.
///
/// Pairs are treated as undirected links, so chains and cycles collapse to
/// the lowest index in each group.
fn merge_roots(mesh: &Mesh) -> Vec<u32> {
    let mut parent: Vec<u32> = (0..mesh.num_vert() as u32).collect();

    fn find(parent: &mut [u32], mut v: u32) -> u32 {
        while parent[v as usize] != v {
            let grand = parent[parent[v as usize] as usize];
            parent[v as usize] = grand;
            v = grand;
        }
        v
    }

    for (from, to) in mesh.merge_pairs() {
        let a = find(&mut parent, from);
        let b = find(&mut parent, to);
        if a != b {
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            parent[hi as usize] = lo;
        }
    }

    (0..parent.len() as u32)
        .map(|v| find(&mut parent, v))
        .collect()
}

fn pair_halfedges(halfedges: &mut [Halfedge]) -> Result<()> {
    let mut directed: HashMap<(u32, u32), Vec<u32>> = HashMap::new();
    for (i, he) in halfedges.iter().enumerate() {
        directed.entry((he.start, he.end)).or_default().push(i as u32);
    }

    for i in 0..halfedges.len() {
        let (start, end) = (halfedges[i].start, halfedges[i].end);
        let forward = directed.get(&(start, end)).map_or(0, Vec::len);
        let backward = directed.get(&(end, start)).map_or(&[][..], Vec::as_slice);
        if forward != 1 || backward.len() != 1 {
            return Err(KernelError::NotManifold {
                start,
                end,
                forward,
                backward: backward.len(),
            });
        }
        halfedges[i].paired = backward[0];
    }

    debug_assert!(halfedges
        .iter()
        .enumerate()
        .all(|(i, he)| halfedges[he.paired as usize].paired == i as u32));
    Ok(())
}
