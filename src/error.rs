//! Error types for endfoot.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`MarchError`].
pub type Result<T> = std::result::Result<T, MarchError>;

/// Errors that can occur while preparing a mesh graph, placing seeds or
/// growing wavefronts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarchError {
    /// The mesh has no faces or no vertices.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A padded neighbor table has the wrong shape for its vertex count.
    #[error("neighbor table has {rows} rows but the mesh has {vertices} vertices")]
    NeighborTableShape {
        /// Rows in the table.
        rows: usize,
        /// Vertices in the mesh.
        vertices: usize,
    },

    /// A neighbor table entry is neither the sentinel nor a valid vertex id.
    #[error("vertex {vertex} lists invalid neighbor {neighbor}")]
    InvalidNeighborIndex {
        /// The vertex whose row holds the entry.
        vertex: usize,
        /// The offending entry.
        neighbor: i64,
    },

    /// A seed vertex passed to a wavefront solver is out of range.
    #[error("seed {seed} refers to vertex {vertex}, but the mesh has {num_vertices} vertices")]
    InvalidSeedVertex {
        /// The seed index.
        seed: usize,
        /// The vertex id.
        vertex: usize,
        /// Number of vertices in the graph.
        num_vertices: usize,
    },

    /// Two seeds were handed to a wavefront solver on the same vertex.
    #[error("seeds {first} and {second} both start on vertex {vertex}")]
    DuplicateSeedVertex {
        /// The shared vertex.
        vertex: usize,
        /// The first seed on that vertex.
        first: usize,
        /// The second seed on that vertex.
        second: usize,
    },

    /// Colliding seeds could not all be moved to free vertices within the
    /// ring search limit.
    #[error(
        "cannot place {pending} of the seeds {seeds:?} colliding on vertex {vertex} \
         within {rings} rings ({placed} placed)"
    )]
    UnresolvableCollision {
        /// The vertex the seeds collided on.
        vertex: usize,
        /// All seed indices that collided on `vertex`.
        seeds: Vec<usize>,
        /// Seeds successfully moved before the search ran out.
        placed: usize,
        /// Seeds still without a vertex.
        pending: usize,
        /// Number of rings searched.
        rings: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MarchError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MarchError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error signals seeds packed too densely for the mesh.
    pub fn is_unresolvable_collision(&self) -> bool {
        matches!(self, MarchError::UnresolvableCollision { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolvable_collision_message() {
        let err = MarchError::UnresolvableCollision {
            vertex: 7,
            seeds: vec![1, 4],
            placed: 0,
            pending: 1,
            rings: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("vertex 7"));
        assert!(msg.contains("[1, 4]"));
        assert!(err.is_unresolvable_collision());
    }

    #[test]
    fn test_invalid_param() {
        let err = MarchError::invalid_param("cutoff_distance", -1.0, "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid parameter: cutoff_distance = -1 (must be non-negative)"
        );
        assert!(!err.is_unresolvable_collision());
    }
}
