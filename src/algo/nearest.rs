//! Nearest-vertex queries.
//!
//! Seeds are snapped to mesh vertices before any wavefront can start from
//! them. The query itself is delegated to a spatial index behind the
//! [`NearestVertexIndex`] trait; [`KdTreeIndex`] is the default, built on
//! `kiddo`'s immutable k-d tree.

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::Point3;

use crate::error::{MarchError, Result};

/// Seed-to-vertex assignment together with the snapping distances.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedMapping {
    /// Vertex id assigned to each seed.
    pub closest: Vec<usize>,
    /// Euclidean distance from each seed to the vertex it first snapped to.
    pub distances: Vec<f64>,
}

impl SeedMapping {
    /// Number of seeds.
    #[inline]
    pub fn len(&self) -> usize {
        self.closest.len()
    }

    /// Check if there are no seeds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.closest.is_empty()
    }
}

/// A spatial index answering exact nearest-vertex queries.
pub trait NearestVertexIndex {
    /// Find the closest vertex to every seed in one batch.
    fn nearest(&self, seeds: &[Point3<f64>]) -> SeedMapping;
}

/// Nearest-vertex index backed by a balanced k-d tree.
pub struct KdTreeIndex {
    tree: ImmutableKdTree<f64, 3>,
    num_vertices: usize,
}

impl KdTreeIndex {
    /// Build the index over vertex positions.
    pub fn new(positions: &[Point3<f64>]) -> Result<Self> {
        if positions.is_empty() {
            return Err(MarchError::EmptyMesh);
        }
        let entries: Vec<[f64; 3]> = positions.iter().map(|p| [p.x, p.y, p.z]).collect();
        let tree: ImmutableKdTree<f64, 3> = ImmutableKdTree::new_from_slice(&entries);
        Ok(Self {
            tree,
            num_vertices: entries.len(),
        })
    }

    /// Number of indexed vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Closest vertex to a single point and the Euclidean distance to it.
    pub fn nearest_one(&self, point: &Point3<f64>) -> (usize, f64) {
        let query = [point.x, point.y, point.z];
        let found = self.tree.nearest_one::<SquaredEuclidean>(&query);
        (found.item as usize, found.distance.sqrt())
    }
}

impl NearestVertexIndex for KdTreeIndex {
    fn nearest(&self, seeds: &[Point3<f64>]) -> SeedMapping {
        let (closest, distances) = seeds.iter().map(|p| self.nearest_one(p)).unzip();
        SeedMapping { closest, distances }
    }
}

impl std::fmt::Debug for KdTreeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KdTreeIndex")
            .field("num_vertices", &self.num_vertices)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{shapes, SurfaceMesh};
    use approx::assert_relative_eq;

    fn brute_force(positions: &[Point3<f64>], p: &Point3<f64>) -> f64 {
        positions
            .iter()
            .map(|q| (q - p).norm())
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_exact_on_vertices() {
        let mesh = shapes::grid(5, 1.0).unwrap();
        let index = KdTreeIndex::new(mesh.positions()).unwrap();

        for (v, p) in mesh.positions().iter().enumerate() {
            let (found, dist) = index.nearest_one(p);
            assert_eq!(found, v);
            assert_relative_eq!(dist, 0.0);
        }
    }

    #[test]
    fn test_matches_brute_force() {
        let mesh = shapes::tube(6, 10, 1.0, 4.0).unwrap();
        let positions = mesh.positions();
        let index = KdTreeIndex::new(positions).unwrap();

        let seeds: Vec<Point3<f64>> = (0..25)
            .map(|k| {
                let t = k as f64 * 0.37;
                Point3::new(1.3 * t.cos(), 1.3 * t.sin(), (k as f64 * 0.17) % 4.0)
            })
            .collect();

        let mapping = index.nearest(&seeds);
        assert_eq!(mapping.len(), seeds.len());

        for (s, p) in seeds.iter().enumerate() {
            let expected = brute_force(positions, p);
            assert_relative_eq!(mapping.distances[s], expected, epsilon = 1e-9);
            let snapped = (positions[mapping.closest[s]] - p).norm();
            assert_relative_eq!(snapped, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_keeps_double_precision() {
        let positions = vec![Point3::new(16384.0, 0.0, 0.0), Point3::new(16384.0005, 0.0, 0.0)];
        let index = KdTreeIndex::new(&positions).unwrap();
        assert_eq!(index.num_vertices(), 2);

        let (v, d) = index.nearest_one(&Point3::new(16384.0004, 0.0, 0.0));
        assert_eq!(v, 1);
        assert_relative_eq!(d, 1e-4, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_positions() {
        let positions: Vec<Point3<f64>> = Vec::new();
        assert_eq!(KdTreeIndex::new(&positions).unwrap_err(), MarchError::EmptyMesh);
    }

    #[test]
    fn test_empty_seed_batch() {
        let mesh = shapes::grid(1, 1.0).unwrap();
        let index = KdTreeIndex::new(mesh.positions()).unwrap();
        assert!(index.nearest(&[]).is_empty());
    }
}
