//! # Endfoot
//!
//! Seed placement and wavefront growth for endfeet reconstruction on
//! triangulated surfaces.
//!
//! Given a surface (typically a vessel wall) and a set of seed points near
//! it, endfoot snaps every seed to a mesh vertex, moves seeds that would
//! share a vertex onto distinct, non-adjacent vertices, and grows one
//! wavefront per seed across the surface. Each vertex ends up owned by the
//! seed whose front reached it first, within a cutoff distance.
//!
//! ## Features
//!
//! - **Compact adjacency**: padded neighbor tables flattened to offsets/values
//! - **Exact nearest-vertex queries**: balanced k-d tree via `kiddo`
//! - **Deterministic collision relocation**: expanding-ring search with a
//!   shared occupancy set
//! - **Pluggable solver**: fast marching bundled, any [`algo::WavefrontSolver`]
//!   accepted
//! - **Batch runs**: independent seed sets in parallel with `rayon`
//!
//! ## Quick Start
//!
//! ```
//! use endfoot::prelude::*;
//! use nalgebra::Point3;
//!
//! // An open cylinder standing in for a vessel wall
//! let mesh = shapes::tube(12, 16, 1.0, 6.0).unwrap();
//!
//! // Two seeds close enough to snap to the same vertex
//! let seeds = vec![Point3::new(1.2, 0.0, 2.8), Point3::new(1.1, 0.0, 2.8)];
//!
//! let result = reconstruct(&mesh, &seeds, &ReconstructOptions::new(2.0)).unwrap();
//! assert_eq!(result.relocation.num_moved(), 1);
//! assert_ne!(result.seed_vertices[0], result.seed_vertices[1]);
//!
//! for (seed, size) in result.group_sizes().iter().enumerate() {
//!     println!("seed {} owns {} vertices", seed, size);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use endfoot::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        reconstruct, reconstruct_batch, reconstruct_with, FastMarching, MeshGraph, Progress,
        Reconstruction, ReconstructOptions, RelocationOptions, WavefrontResult, WavefrontSolver,
    };
    pub use crate::error::{MarchError, Result};
    pub use crate::mesh::{shapes, PaddedNeighbors, SurfaceMesh, TriangleMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::algo::{find_adjacent_pair, is_injective, MarchStatus};
    use nalgebra::Point3;

    #[test]
    fn test_tube_reconstruction() {
        let mesh = shapes::tube(16, 24, 1.0, 8.0).unwrap();
        let graph = MeshGraph::from_mesh(&mesh).unwrap();

        // Three seeds piled on one spot, one far away
        let seeds = vec![
            Point3::new(1.3, 0.0, 4.1),
            Point3::new(1.2, 0.01, 4.1),
            Point3::new(1.25, -0.01, 4.1),
            Point3::new(-1.2, 0.0, 1.0),
        ];
        let options = ReconstructOptions::new(2.0);
        let result = reconstruct(&mesh, &seeds, &options).unwrap();

        assert_eq!(result.num_seeds(), 4);
        assert!(is_injective(&result.seed_vertices));
        assert_eq!(result.relocation.num_moved(), 2);
        assert_eq!(find_adjacent_pair(&graph, &result.seed_vertices), None);

        // The closest of the piled seeds keeps the snapped vertex
        let snapped = mesh
            .positions()
            .iter()
            .enumerate()
            .min_by(|a, b| {
                let da = (a.1 - seeds[1]).norm();
                let db = (b.1 - seeds[1]).norm();
                da.total_cmp(&db)
            })
            .map(|(v, _)| v)
            .unwrap();
        assert_eq!(result.seed_vertices[1], snapped);

        for (g, &v) in result.seed_vertices.iter().enumerate() {
            assert_eq!(result.wavefront.group(v), Some(g));
            assert_eq!(result.wavefront.travel_time(v), 0.0);
        }

        // Nothing is reached beyond the cutoff of its owner
        for v in 0..graph.num_vertices() {
            match result.wavefront.group(v) {
                Some(g) => {
                    let owner = result.seed_vertices[g];
                    assert!(graph.squared_distance(v, owner) <= 4.0 + 1e-9);
                    assert_eq!(result.wavefront.status(v), MarchStatus::Visited);
                }
                None => assert_eq!(result.wavefront.status(v), MarchStatus::Far),
            }
        }
    }
}
