//! Error types for mesh and manifold construction.

use thiserror::Error;

/// Reasons the engine rejects a mesh description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Fewer than three properties per vertex, so there is no position.
    #[error("numProp is {0}, need at least 3 for x, y, z")]
    MissingPositionProperties(u32),

    /// `vertProperties` is not a whole number of vertices.
    #[error("vertProperties has {len} values, not a multiple of numProp = {num_prop}")]
    PropertiesWrongLength {
        /// Length of `vertProperties`.
        len: usize,
        /// Properties per vertex.
        num_prop: u32,
    },

    /// `triVerts` is not a whole number of triangles.
    #[error("triVerts has {0} entries, not a multiple of 3")]
    TriVertsWrongLength(usize),

    /// A triangle references a vertex that does not exist.
    #[error("triangle {tri} references vertex {vert}, but there are only {num_vert} vertices")]
    VertexOutOfBounds {
        /// Triangle index.
        tri: usize,
        /// Offending vertex index.
        vert: u32,
        /// Number of vertices.
        num_vert: usize,
    },

    /// A vertex position is NaN or infinite.
    #[error("vertex {0} has a non-finite position")]
    NonFiniteVertex(usize),

    /// `mergeFromVert` and `mergeToVert` differ in length.
    #[error("merge vectors differ in length: {from} from, {to} to")]
    MergeVectorsDifferentLengths {
        /// Length of `mergeFromVert`.
        from: usize,
        /// Length of `mergeToVert`.
        to: usize,
    },

    /// A merge vector references a vertex that does not exist.
    #[error("merge vector references vertex {index}, but there are only {num_vert} vertices")]
    MergeIndexOutOfBounds {
        /// Offending vertex index.
        index: u32,
        /// Number of vertices.
        num_vert: usize,
    },

    /// `faceID` does not have one entry per triangle.
    #[error("faceID has {len} entries, expected {expected}")]
    FaceIdWrongLength {
        /// Length of `faceID`.
        len: usize,
        /// Number of triangles.
        expected: usize,
    },

    /// `halfedgeTangent` does not have four floats per halfedge.
    #[error("halfedgeTangent has {len} values, expected {expected}")]
    TangentsWrongLength {
        /// Length of `halfedgeTangent`.
        len: usize,
        /// Expected length.
        expected: usize,
    },

    /// `runIndex` has the wrong number of entries for the runs declared.
    #[error("runIndex has {len} entries, expected {expected}")]
    RunIndexWrongLength {
        /// Length of `runIndex`.
        len: usize,
        /// Expected length.
        expected: usize,
    },

    /// `runIndex` is not a valid partition of `triVerts`.
    #[error("invalid runIndex: {0}")]
    InvalidRunIndex(String),

    /// `runTransform` does not have twelve floats per run.
    #[error("runTransform has {len} values, expected {expected}")]
    TransformWrongLength {
        /// Length of `runTransform`.
        len: usize,
        /// Expected length.
        expected: usize,
    },

    /// A triangle collapses onto fewer than three distinct vertices.
    #[error("triangle {0} is degenerate after merging")]
    DegenerateTriangle(usize),

    /// An edge is open or shared by more than two triangles.
    #[error("not manifold: edge ({start}, {end}) has {forward} forward and {backward} backward halfedges")]
    NotManifold {
        /// Start position vertex of the edge.
        start: u32,
        /// End position vertex of the edge.
        end: u32,
        /// Halfedges running start to end.
        forward: usize,
        /// Halfedges running end to start.
        backward: usize,
    },
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
