//! Surface mesh input.
//!
//! This module defines the boundary between endfoot and whatever produces the
//! triangulated surface.
//!
//! # Overview
//!
//! Reconstruction only needs two things from a mesh: vertex positions and a
//! per-vertex neighbor table. The [`SurfaceMesh`] trait captures exactly that,
//! with neighbor ids delivered the way most mesh libraries export them: a
//! dense [`PaddedNeighbors`] table whose short rows are filled with a sentinel.
//!
//! [`TriangleMesh`] is a small indexed triangle mesh implementing the trait,
//! and [`shapes`] generates test surfaces.
//!
//! ```
//! use endfoot::mesh::{SurfaceMesh, TriangleMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh = TriangleMesh::from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.neighbor_table().width(), 2);
//! ```

mod padded;
pub mod shapes;
mod triangle;

pub use padded::PaddedNeighbors;
pub use triangle::{SurfaceMesh, TriangleMesh};
