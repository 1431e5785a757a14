//! Seed placement and wavefront growth.
//!
//! The pipeline, in order:
//!
//! - **Adjacency**: padded neighbor table flattened into a compact graph
//! - **Nearest**: seeds snapped to their closest vertex through a k-d tree
//! - **Collision**: seeds grouped by shared vertex
//! - **Relocation**: colliding seeds moved to free vertices ring by ring
//! - **Marching**: one wavefront per seed, cut off by distance
//!
//! [`reconstruct`] runs the whole pipeline.

pub mod adjacency;
pub mod collision;
pub mod march;
pub mod nearest;
pub mod progress;
pub mod reconstruct;
pub mod relocate;

pub use adjacency::MeshGraph;
pub use collision::CollisionGroups;
pub use march::{FastMarching, MarchStatus, WavefrontResult, WavefrontSolver};
pub use nearest::{KdTreeIndex, NearestVertexIndex, SeedMapping};
pub use progress::Progress;
pub use reconstruct::{
    reconstruct, reconstruct_batch, reconstruct_with, reconstruct_with_progress, Reconstruction,
    ReconstructOptions,
};
pub use relocate::{
    deduplicate_seeds, deduplicate_seeds_with_progress, expanding_rings, find_adjacent_pair,
    is_injective, rank_by_distance, resolve_collisions, resolve_collisions_with_progress,
    Occupied, RelocationOptions, RelocationReport, SeedMove, DEFAULT_MAX_RINGS,
};
