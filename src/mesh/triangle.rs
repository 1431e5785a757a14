//! Indexed triangle meshes.
//!
//! [`TriangleMesh`] is a minimal face-vertex surface that knows its vertex
//! 1-rings. It is the crate's stand-in for whatever mesh library produces the
//! input surface; anything implementing [`SurfaceMesh`] can be used instead.

use std::collections::BTreeSet;

use nalgebra::Point3;

use super::padded::PaddedNeighbors;
use crate::error::{MarchError, Result};

/// The view of a triangulated surface the reconstruction needs.
pub trait SurfaceMesh {
    /// Number of vertices.
    fn num_vertices(&self) -> usize;

    /// Vertex positions, indexed by vertex id.
    fn positions(&self) -> &[Point3<f64>];

    /// Per-vertex neighbor ids as a sentinel-padded table.
    fn neighbor_table(&self) -> PaddedNeighbors;
}

/// A triangle mesh stored as positions plus vertex index triples.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    positions: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
    rings: Vec<Vec<usize>>,
}

impl TriangleMesh {
    /// Build a mesh from vertices and triangle faces.
    ///
    /// # Arguments
    /// * `vertices` - List of vertex positions
    /// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
    ///
    /// # Example
    /// ```
    /// use endfoot::mesh::{SurfaceMesh, TriangleMesh};
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.5, 1.0, 0.0),
    /// ];
    /// let mesh = TriangleMesh::from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
    /// assert_eq!(mesh.num_vertices(), 3);
    /// assert_eq!(mesh.vertex_neighbors(0), &[1, 2]);
    /// ```
    pub fn from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<Self> {
        if faces.is_empty() || vertices.is_empty() {
            return Err(MarchError::EmptyMesh);
        }

        for (fi, face) in faces.iter().enumerate() {
            for &vi in face {
                if vi >= vertices.len() {
                    return Err(MarchError::InvalidVertexIndex { face: fi, vertex: vi });
                }
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                return Err(MarchError::DegenerateFace { face: fi });
            }
        }

        let mut ring_sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); vertices.len()];
        for &[a, b, c] in faces {
            for (u, w) in [(a, b), (b, c), (c, a)] {
                ring_sets[u].insert(w);
                ring_sets[w].insert(u);
            }
        }

        Ok(Self {
            positions: vertices.to_vec(),
            faces: faces.to_vec(),
            rings: ring_sets
                .into_iter()
                .map(|s| s.into_iter().collect())
                .collect(),
        })
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// All faces as vertex index triples.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// The sorted 1-ring of a vertex.
    #[inline]
    pub fn vertex_neighbors(&self, v: usize) -> &[usize] {
        &self.rings[v]
    }

    /// Compute the valence (degree) of a vertex.
    #[inline]
    pub fn valence(&self, v: usize) -> usize {
        self.rings[v].len()
    }

    /// Average length over all unique edges.
    pub fn average_edge_length(&self) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for (v, ring) in self.rings.iter().enumerate() {
            for &w in ring.iter().filter(|&&w| w > v) {
                total += (self.positions[w] - self.positions[v]).norm();
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}

impl SurfaceMesh for TriangleMesh {
    fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    fn neighbor_table(&self) -> PaddedNeighbors {
        let rows: Vec<Vec<i64>> = self
            .rings
            .iter()
            .map(|ring| ring.iter().map(|&w| w as i64).collect())
            .collect();
        PaddedNeighbors::from_rows(&rows)
    }
}
