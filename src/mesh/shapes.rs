//! Procedural surfaces.
//!
//! Small generators used by the CLI, benchmarks and tests. They are not a
//! substitute for loading real surfaces, which is left to mesh libraries.

use std::f64::consts::TAU;

use nalgebra::Point3;

use super::triangle::TriangleMesh;
use crate::error::{MarchError, Result};

/// A flat `n x n` grid of squares in the XY plane, each split into two triangles.
///
/// Vertex `j * (n + 1) + i` sits at `(i * spacing, j * spacing, 0)`.
pub fn grid(n: usize, spacing: f64) -> Result<TriangleMesh> {
    if n == 0 {
        return Err(MarchError::invalid_param("n", n, "must be at least 1"));
    }
    if !(spacing > 0.0 && spacing.is_finite()) {
        return Err(MarchError::invalid_param("spacing", spacing, "must be positive"));
    }

    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64 * spacing, j as f64 * spacing, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    TriangleMesh::from_triangles(&vertices, &faces)
}

/// An open cylinder along +Z, the usual stand-in for a vessel segment.
///
/// `rings` circles of `segments` vertices each; ring `r` lies at
/// `z = length * r / (rings - 1)`.
pub fn tube(rings: usize, segments: usize, radius: f64, length: f64) -> Result<TriangleMesh> {
    if rings < 2 {
        return Err(MarchError::invalid_param("rings", rings, "must be at least 2"));
    }
    if segments < 3 {
        return Err(MarchError::invalid_param("segments", segments, "must be at least 3"));
    }
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(MarchError::invalid_param("radius", radius, "must be positive"));
    }
    if !(length > 0.0 && length.is_finite()) {
        return Err(MarchError::invalid_param("length", length, "must be positive"));
    }

    let mut vertices = Vec::with_capacity(rings * segments);
    for r in 0..rings {
        let z = length * r as f64 / (rings - 1) as f64;
        for s in 0..segments {
            let angle = TAU * s as f64 / segments as f64;
            vertices.push(Point3::new(radius * angle.cos(), radius * angle.sin(), z));
        }
    }

    let mut faces = Vec::with_capacity((rings - 1) * segments * 2);
    for r in 0..rings - 1 {
        for s in 0..segments {
            let next = (s + 1) % segments;
            let v00 = r * segments + s;
            let v01 = r * segments + next;
            let v10 = (r + 1) * segments + s;
            let v11 = (r + 1) * segments + next;

            faces.push([v00, v01, v11]);
            faces.push([v00, v11, v10]);
        }
    }

    TriangleMesh::from_triangles(&vertices, &faces)
}
