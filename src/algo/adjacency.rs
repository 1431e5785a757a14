//! Compact (CSR) vertex adjacency.
//!
//! [`MeshGraph`] flattens a padded neighbor table into a value array plus an
//! offsets array, so the neighbors of vertex `i` are
//! `neighbors[offsets[i]..offsets[i + 1]]`. Coordinates are stored in single
//! precision alongside, which is all the wavefront solver needs.

use log::{debug, warn};
use nalgebra::Point3;

use crate::error::{MarchError, Result};
use crate::mesh::{PaddedNeighbors, SurfaceMesh};

/// Immutable vertex graph of a triangulated surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGraph {
    neighbors: Vec<usize>,
    offsets: Vec<usize>,
    coordinates: Vec<Point3<f32>>,
}

impl MeshGraph {
    /// Flatten a padded neighbor table.
    ///
    /// Each row contributes its non-sentinel entries in order. A row made only
    /// of sentinels yields an empty span; such isolated vertices are reported
    /// but not rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use endfoot::algo::MeshGraph;
    /// use endfoot::mesh::PaddedNeighbors;
    /// use nalgebra::Point3;
    ///
    /// let table = PaddedNeighbors::from_rows(&[vec![1, 2], vec![0, -1], vec![0, -1]]);
    /// let positions: Vec<Point3<f64>> = vec![Point3::origin(); 3];
    /// let graph = MeshGraph::from_padded(&table, &positions).unwrap();
    ///
    /// assert_eq!(graph.offsets(), &[0, 2, 3, 4]);
    /// assert_eq!(graph.neighbors(), &[1, 2, 0, 0]);
    /// ```
    pub fn from_padded(table: &PaddedNeighbors, positions: &[Point3<f64>]) -> Result<Self> {
        let n = positions.len();
        if table.num_rows() != n {
            return Err(MarchError::NeighborTableShape {
                rows: table.num_rows(),
                vertices: n,
            });
        }

        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        let mut neighbors = Vec::with_capacity(n * table.width());

        for (v, row) in table.rows().enumerate() {
            for &entry in row {
                if entry == PaddedNeighbors::SENTINEL {
                    continue;
                }
                if entry < 0 || entry as usize >= n {
                    return Err(MarchError::InvalidNeighborIndex {
                        vertex: v,
                        neighbor: entry,
                    });
                }
                neighbors.push(entry as usize);
            }
            offsets.push(neighbors.len());
        }

        let coordinates = positions.iter().map(|p| p.cast::<f32>()).collect();

        let graph = Self {
            neighbors,
            offsets,
            coordinates,
        };

        let isolated = graph.isolated_vertices();
        if !isolated.is_empty() {
            warn!(
                "{} of {} vertices have no neighbors (first: {})",
                isolated.len(),
                n,
                isolated[0]
            );
        }
        debug!(
            "flattened adjacency: {} vertices, {} directed edges",
            n,
            graph.neighbors.len()
        );

        Ok(graph)
    }

    /// Flatten the adjacency of any [`SurfaceMesh`].
    pub fn from_mesh<M: SurfaceMesh + ?Sized>(mesh: &M) -> Result<Self> {
        Self::from_padded(&mesh.neighbor_table(), mesh.positions())
    }

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.coordinates.len()
    }

    /// Check if the graph has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// The 1-ring of a vertex.
    #[inline]
    pub fn neighbors_of(&self, v: usize) -> &[usize] {
        &self.neighbors[self.offsets[v]..self.offsets[v + 1]]
    }

    /// Number of neighbors of a vertex.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.offsets[v + 1] - self.offsets[v]
    }

    /// Whether `w` is in the 1-ring of `v`.
    #[inline]
    pub fn are_adjacent(&self, v: usize, w: usize) -> bool {
        self.neighbors_of(v).contains(&w)
    }

    /// The flattened neighbor array.
    #[inline]
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// The offsets array, `num_vertices() + 1` long.
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Vertex coordinates in single precision.
    #[inline]
    pub fn coordinates(&self) -> &[Point3<f32>] {
        &self.coordinates
    }

    /// Position of a vertex, widened to `f64`.
    #[inline]
    pub fn position(&self, v: usize) -> Point3<f64> {
        self.coordinates[v].cast::<f64>()
    }

    /// Euclidean distance between two vertices.
    #[inline]
    pub fn edge_length(&self, v: usize, w: usize) -> f64 {
        (self.position(w) - self.position(v)).norm()
    }

    /// Squared Euclidean distance between two vertices.
    #[inline]
    pub fn squared_distance(&self, v: usize, w: usize) -> f64 {
        (self.position(w) - self.position(v)).norm_squared()
    }

    /// Vertices with an empty 1-ring.
    pub fn isolated_vertices(&self) -> Vec<usize> {
        (0..self.num_vertices())
            .filter(|&v| self.degree(v) == 0)
            .collect()
    }
}
