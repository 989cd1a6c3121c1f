#![warn(missing_docs)]

//! Mesh description records for meshprobe.
//!
//! A [`MeshDescription`] is the flat, typed form of a triangle mesh that the
//! geometry engine consumes: one `u32` buffer of triangle corners, one `f32`
//! buffer of interleaved vertex properties, and a handful of optional
//! auxiliary buffers.
//!
//! JSON inputs are rarely in that shape. Exporters frequently write typed
//! arrays as objects keyed by index (`{"0": 1, "1": 2}`), so loading goes
//! through [`mapper::map_fields`] which applies lenient, JavaScript-style
//! conversion rules instead of strict deserialization.
//!
//! # Example
//!
//! ```rust,no_run
//! let desc = meshprobe_ir::load_mesh_description("cutter.json").unwrap();
//! println!("{} triangles", desc.num_tri());
//! ```

pub mod error;
pub mod load;
pub mod mapper;

pub use error::{IrError, Result};
pub use load::{load_json, load_mesh_description, parse_json, JsonKeyType};
pub use mapper::map_fields;

use serde::{Deserialize, Serialize};

/// Flattened triangle mesh buffers, keyed the way manifold-style engines
/// name them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshDescription {
    /// Number of scalar properties per vertex; the first three are x, y, z.
    #[serde(default)]
    pub num_prop: u32,
    /// Flattened triangle vertex indices, three per triangle.
    #[serde(default)]
    pub tri_verts: Vec<u32>,
    /// Flattened per-vertex properties, `num_prop` per vertex.
    #[serde(default)]
    pub vert_properties: Vec<f32>,
    /// Per-triangle face identifier.
    #[serde(rename = "faceID", default, skip_serializing_if = "Option::is_none")]
    pub face_id: Option<Vec<u32>>,
    /// Per-halfedge tangent vectors, four floats per halfedge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halfedge_tangent: Option<Vec<f32>>,
    /// Property vertices to be merged into [`Self::merge_to_vert`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_from_vert: Option<Vec<u32>>,
    /// Merge targets, paired by position with [`Self::merge_from_vert`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_to_vert: Option<Vec<u32>>,
    /// Offsets into `tri_verts` at which each run starts, plus the end offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_index: Option<Vec<u32>>,
    /// Original mesh ID for each run.
    #[serde(rename = "runOriginalID", default, skip_serializing_if = "Option::is_none")]
    pub run_original_id: Option<Vec<u32>>,
    /// Column-major 3x4 transform per run, twelve floats each.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_transform: Option<Vec<f32>>,
}

impl MeshDescription {
    /// Create a description from positions only (`num_prop == 3`).
    pub fn from_positions(vert_properties: Vec<f32>, tri_verts: Vec<u32>) -> Self {
        Self {
            num_prop: 3,
            tri_verts,
            vert_properties,
            ..Default::default()
        }
    }

    /// Number of triangles.
    pub fn num_tri(&self) -> usize {
        self.tri_verts.len() / 3
    }

    /// Number of property vertices, or 0 when `num_prop` is 0.
    pub fn num_vert(&self) -> usize {
        if self.num_prop == 0 {
            0
        } else {
            self.vert_properties.len() / self.num_prop as usize
        }
    }

    /// JSON names of the fields present on this record, in declaration order.
    ///
    /// Required fields are always listed; optional ones only when set.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = vec!["numProp", "triVerts", "vertProperties"];
        let optional: [(&'static str, bool); 7] = [
            ("faceID", self.face_id.is_some()),
            ("halfedgeTangent", self.halfedge_tangent.is_some()),
            ("mergeFromVert", self.merge_from_vert.is_some()),
            ("mergeToVert", self.merge_to_vert.is_some()),
            ("runIndex", self.run_index.is_some()),
            ("runOriginalID", self.run_original_id.is_some()),
            ("runTransform", self.run_transform.is_some()),
        ];
        keys.extend(optional.iter().filter(|(_, set)| *set).map(|(k, _)| *k));
        keys
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_list_only_present_optionals() {
        let mut desc = MeshDescription::from_positions(vec![0.0; 9], vec![0, 1, 2]);
        assert_eq!(desc.keys(), vec!["numProp", "triVerts", "vertProperties"]);

        desc.face_id = Some(vec![7]);
        desc.run_original_id = Some(vec![1]);
        assert_eq!(
            desc.keys(),
            vec!["numProp", "triVerts", "vertProperties", "faceID", "runOriginalID"]
        );
    }

    #[test]
    fn counts() {
        let desc = MeshDescription {
            num_prop: 4,
            tri_verts: vec![0, 1, 2, 2, 1, 0],
            vert_properties: vec![0.0; 12],
            ..Default::default()
        };
        assert_eq!(desc.num_tri(), 2);
        assert_eq!(desc.num_vert(), 3);
        assert_eq!(MeshDescription::default().num_vert(), 0);
    }

    #[test]
    fn serde_uses_engine_field_names() {
        let mut desc = MeshDescription::from_positions(vec![1.0, 2.0, 3.0], vec![]);
        desc.face_id = Some(vec![4]);
        desc.run_original_id = Some(vec![9]);
        let json = desc.to_json().unwrap();
        assert!(json.contains(r#""numProp": 3"#));
        assert!(json.contains(r#""faceID""#));
        assert!(json.contains(r#""runOriginalID""#));
        assert!(!json.contains("mergeFromVert"));

        let restored: MeshDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(desc, restored);
    }
}
