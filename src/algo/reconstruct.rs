//! End-to-end endfeet reconstruction.
//!
//! Flattens the mesh adjacency, snaps seeds to their nearest vertices,
//! relocates seeds that collide on a vertex, then grows one wavefront per
//! seed with the squared cutoff distance. The solver output is returned
//! unmodified alongside the final seed vertices.
//!
//! # Example
//!
//! ```
//! use endfoot::algo::{reconstruct, ReconstructOptions};
//! use endfoot::mesh::shapes;
//! use nalgebra::Point3;
//!
//! let mesh = shapes::grid(10, 1.0).unwrap();
//! let seeds = vec![Point3::new(1.1, 0.9, 0.3), Point3::new(8.0, 8.2, -0.1)];
//!
//! let result = reconstruct(&mesh, &seeds, &ReconstructOptions::new(3.0)).unwrap();
//! assert_eq!(result.seed_vertices, vec![12, 96]);
//! assert_eq!(result.wavefront.group(12), Some(0));
//! ```

use log::info;
use nalgebra::Point3;
use rayon::prelude::*;

use super::adjacency::MeshGraph;
use super::march::{FastMarching, WavefrontResult, WavefrontSolver};
use super::nearest::{KdTreeIndex, NearestVertexIndex};
use super::relocate::{deduplicate_seeds, RelocationOptions, RelocationReport};
use super::Progress;
use crate::error::{MarchError, Result};
use crate::mesh::SurfaceMesh;

/// Options for [`reconstruct`].
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// Maximum straight-line distance a front may reach from its seed.
    pub cutoff_distance: f64,

    /// Collision relocation settings.
    pub relocation: RelocationOptions,

    /// Whether [`reconstruct_batch`] runs seed sets in parallel (default: true).
    pub parallel: bool,
}

impl ReconstructOptions {
    /// Create options with the given cutoff distance.
    pub fn new(cutoff_distance: f64) -> Self {
        Self {
            cutoff_distance,
            relocation: RelocationOptions::default(),
            parallel: true,
        }
    }

    /// Set the cutoff distance.
    pub fn with_cutoff_distance(mut self, cutoff_distance: f64) -> Self {
        self.cutoff_distance = cutoff_distance;
        self
    }

    /// Set the number of rings searched when relocating a seed.
    pub fn with_max_rings(mut self, max_rings: usize) -> Self {
        self.relocation = self.relocation.with_max_rings(max_rings);
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// The cutoff squared, after validation.
    fn squared_cutoff(&self) -> Result<f64> {
        let c = self.cutoff_distance;
        if !c.is_finite() || c < 0.0 {
            return Err(MarchError::invalid_param(
                "cutoff_distance",
                c,
                "must be finite and non-negative",
            ));
        }
        Ok(c * c)
    }
}

/// Output of a reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// Final vertex of each seed, pairwise distinct.
    pub seed_vertices: Vec<usize>,

    /// Seeds moved off a shared vertex.
    pub relocation: RelocationReport,

    /// Per-vertex owner, travel time and status.
    pub wavefront: WavefrontResult,
}

impl Reconstruction {
    /// Number of seeds.
    #[inline]
    pub fn num_seeds(&self) -> usize {
        self.seed_vertices.len()
    }

    /// Vertices owned by each seed.
    pub fn group_sizes(&self) -> Vec<usize> {
        self.wavefront.group_sizes(self.num_seeds())
    }
}

/// Reconstruct endfeet from seed points with the bundled solver.
pub fn reconstruct<M: SurfaceMesh + ?Sized>(
    mesh: &M,
    seeds: &[Point3<f64>],
    options: &ReconstructOptions,
) -> Result<Reconstruction> {
    reconstruct_with_progress(mesh, seeds, options, &FastMarching::default(), &Progress::none())
}

/// Reconstruct endfeet with a caller-supplied wavefront solver.
pub fn reconstruct_with<M, S>(
    mesh: &M,
    seeds: &[Point3<f64>],
    options: &ReconstructOptions,
    solver: &S,
) -> Result<Reconstruction>
where
    M: SurfaceMesh + ?Sized,
    S: WavefrontSolver + ?Sized,
{
    reconstruct_with_progress(mesh, seeds, options, solver, &Progress::none())
}

/// [`reconstruct_with`] with progress reporting.
pub fn reconstruct_with_progress<M, S>(
    mesh: &M,
    seeds: &[Point3<f64>],
    options: &ReconstructOptions,
    solver: &S,
    progress: &Progress,
) -> Result<Reconstruction>
where
    M: SurfaceMesh + ?Sized,
    S: WavefrontSolver + ?Sized,
{
    let squared_cutoff = options.squared_cutoff()?;

    progress.report(0, 4, "Flattening adjacency");
    let graph = MeshGraph::from_mesh(mesh)?;
    let index = KdTreeIndex::new(mesh.positions())?;

    run_stages(&graph, &index, seeds, options, squared_cutoff, solver, progress)
}

/// Reconstruct several independent seed sets on the same mesh.
///
/// The mesh is flattened and indexed once; every seed set then runs with
/// its own relocation state. Results come back in input order, and a failure
/// in one set does not affect the others.
pub fn reconstruct_batch<M, S>(
    mesh: &M,
    seed_sets: &[Vec<Point3<f64>>],
    options: &ReconstructOptions,
    solver: &S,
) -> Result<Vec<Result<Reconstruction>>>
where
    M: SurfaceMesh + ?Sized,
    S: WavefrontSolver + Sync + ?Sized,
{
    let squared_cutoff = options.squared_cutoff()?;
    let graph = MeshGraph::from_mesh(mesh)?;
    let index = KdTreeIndex::new(mesh.positions())?;
    let none = Progress::none();

    let run = |seeds: &Vec<Point3<f64>>| {
        run_stages(&graph, &index, seeds, options, squared_cutoff, solver, &none)
    };

    let results = if options.parallel {
        seed_sets.par_iter().map(run).collect()
    } else {
        seed_sets.iter().map(run).collect()
    };

    Ok(results)
}

fn run_stages<S: WavefrontSolver + ?Sized>(
    graph: &MeshGraph,
    index: &KdTreeIndex,
    seeds: &[Point3<f64>],
    options: &ReconstructOptions,
    squared_cutoff: f64,
    solver: &S,
    progress: &Progress,
) -> Result<Reconstruction> {
    progress.report(1, 4, "Snapping seeds");
    let mapping = index.nearest(seeds);

    progress.report(2, 4, "Resolving collisions");
    let (seed_vertices, relocation) = deduplicate_seeds(graph, &mapping, &options.relocation)?;
    if !relocation.is_empty() {
        info!("relocated {} seed(s)", relocation.num_moved());
    }

    progress.report(3, 4, "Growing wavefronts");
    let wavefront = solver.grow(graph, &seed_vertices, squared_cutoff)?;
    progress.report(4, 4, "Done");

    Ok(Reconstruction {
        seed_vertices,
        relocation,
        wavefront,
    })
}
