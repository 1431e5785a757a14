//! Multi-source wavefront growth on a mesh graph.
//!
//! Every seed vertex starts a front at time zero. Fronts expand with unit
//! speed over the surface, and each vertex is owned by the first front to
//! reach it. A front never enters vertices farther (in straight-line distance)
//! than the cutoff from its own seed vertex.
//!
//! The numerics sit behind [`WavefrontSolver`] so a different solver can be
//! plugged into reconstruction. [`FastMarching`] is the bundled one: a
//! Dijkstra-ordered march whose arrival times use the first-order triangle
//! update where two accepted vertices of the same front span a triangle with
//! the target, and the plain edge update otherwise.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use log::debug;
use nalgebra::Point3;

use super::adjacency::MeshGraph;
use crate::error::{MarchError, Result};

/// Marching state of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarchStatus {
    /// Arrival time is final.
    Visited,
    /// Reached by a front, arrival time still tentative.
    Trial,
    /// Never reached.
    Far,
}

impl MarchStatus {
    /// Integer code: `1` visited, `0` trial, `-1` far.
    #[inline]
    pub fn code(self) -> i8 {
        match self {
            MarchStatus::Visited => 1,
            MarchStatus::Trial => 0,
            MarchStatus::Far => -1,
        }
    }
}

/// Per-vertex output of a wavefront growth.
#[derive(Debug, Clone, PartialEq)]
pub struct WavefrontResult {
    groups: Vec<Option<usize>>,
    travel_times: Vec<f64>,
    statuses: Vec<MarchStatus>,
}

impl WavefrontResult {
    /// Assemble a result from per-vertex arrays of equal length.
    pub fn new(
        groups: Vec<Option<usize>>,
        travel_times: Vec<f64>,
        statuses: Vec<MarchStatus>,
    ) -> Result<Self> {
        if groups.len() != travel_times.len() || groups.len() != statuses.len() {
            return Err(MarchError::invalid_param(
                "travel_times",
                travel_times.len(),
                "per-vertex arrays must have equal length",
            ));
        }
        Ok(Self {
            groups,
            travel_times,
            statuses,
        })
    }

    /// A result where no vertex was reached.
    pub fn unreached(num_vertices: usize) -> Self {
        Self {
            groups: vec![None; num_vertices],
            travel_times: vec![f64::INFINITY; num_vertices],
            statuses: vec![MarchStatus::Far; num_vertices],
        }
    }

    /// Get the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Seed index owning a vertex, `None` if unreached.
    #[inline]
    pub fn group(&self, v: usize) -> Option<usize> {
        self.groups[v]
    }

    /// Arrival time at a vertex, `f64::INFINITY` if unreached.
    #[inline]
    pub fn travel_time(&self, v: usize) -> f64 {
        self.travel_times[v]
    }

    /// Marching state of a vertex.
    #[inline]
    pub fn status(&self, v: usize) -> MarchStatus {
        self.statuses[v]
    }

    /// Owning seed of every vertex.
    #[inline]
    pub fn groups(&self) -> &[Option<usize>] {
        &self.groups
    }

    /// Arrival time of every vertex.
    #[inline]
    pub fn travel_times(&self) -> &[f64] {
        &self.travel_times
    }

    /// State of every vertex.
    #[inline]
    pub fn statuses(&self) -> &[MarchStatus] {
        &self.statuses
    }

    /// Owning seed per vertex with `-1` for unreached vertices.
    pub fn group_codes(&self) -> Vec<i64> {
        self.groups
            .iter()
            .map(|g| g.map_or(-1, |g| g as i64))
            .collect()
    }

    /// [`MarchStatus::code`] per vertex.
    pub fn status_codes(&self) -> Vec<i8> {
        self.statuses.iter().map(|s| s.code()).collect()
    }

    /// Count the vertices whose arrival time is final.
    pub fn visited_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|&&s| s == MarchStatus::Visited)
            .count()
    }

    /// Vertices owned by seed `group`, ascending.
    pub fn group_vertices(&self, group: usize) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| **g == Some(group))
            .map(|(v, _)| v)
            .collect()
    }

    /// Number of vertices owned by each of `num_groups` seeds.
    pub fn group_sizes(&self, num_groups: usize) -> Vec<usize> {
        let mut sizes = vec![0; num_groups];
        for g in self.groups.iter().flatten() {
            if *g < num_groups {
                sizes[*g] += 1;
            }
        }
        sizes
    }

    /// Largest finite arrival time, if any vertex was reached.
    pub fn max_travel_time(&self) -> Option<f64> {
        self.travel_times
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .fold(None, |acc, t| Some(acc.map_or(t, |m: f64| m.max(t))))
    }
}

/// A multi-source wavefront solver on a mesh graph.
pub trait WavefrontSolver {
    /// Grow one front from each seed vertex.
    ///
    /// `seeds[g]` is the start vertex of front `g`; seeds must be distinct.
    /// Vertices farther than `sqrt(squared_cutoff)` from a front's seed are
    /// never entered by that front.
    fn grow(&self, graph: &MeshGraph, seeds: &[usize], squared_cutoff: f64)
        -> Result<WavefrontResult>;
}

/// Fast marching on the vertex graph.
#[derive(Debug, Clone)]
pub struct FastMarching {
    /// Use triangle updates in addition to edge updates (default: true).
    /// Without them the march reduces to multi-source Dijkstra.
    pub triangle_updates: bool,
}

impl Default for FastMarching {
    fn default() -> Self {
        Self {
            triangle_updates: true,
        }
    }
}

impl FastMarching {
    /// Set whether to use triangle updates.
    pub fn with_triangle_updates(mut self, enabled: bool) -> Self {
        self.triangle_updates = enabled;
        self
    }

    fn arrival_time(
        &self,
        graph: &MeshGraph,
        from: usize,
        to: usize,
        group: usize,
        state: &MarchState,
    ) -> f64 {
        let target = graph.position(to);
        let t_from = state.times[from];
        let p_from = graph.position(from);

        let mut best = t_from + (target - p_from).norm();
        if !self.triangle_updates {
            return best;
        }

        for &other in graph.neighbors_of(to) {
            if other == from
                || state.statuses[other] != MarchStatus::Visited
                || state.groups[other] != Some(group)
                || !graph.are_adjacent(from, other)
            {
                continue;
            }
            let t = triangle_update(
                &p_from,
                t_from,
                &graph.position(other),
                state.times[other],
                &target,
            );
            if t < best {
                best = t;
            }
        }

        best
    }
}

impl WavefrontSolver for FastMarching {
    fn grow(
        &self,
        graph: &MeshGraph,
        seeds: &[usize],
        squared_cutoff: f64,
    ) -> Result<WavefrontResult> {
        let n = graph.num_vertices();
        check_seeds(seeds, n)?;
        if squared_cutoff.is_nan() || squared_cutoff < 0.0 {
            return Err(MarchError::invalid_param(
                "squared_cutoff",
                squared_cutoff,
                "must be non-negative",
            ));
        }

        let mut state = MarchState::new(n);
        let mut heap = BinaryHeap::with_capacity(seeds.len());

        for (group, &s) in seeds.iter().enumerate() {
            state.times[s] = 0.0;
            state.groups[s] = Some(group);
            state.statuses[s] = MarchStatus::Trial;
            heap.push(MarchEntry::new(s, 0.0));
        }

        while let Some(entry) = heap.pop() {
            let u = entry.vertex;

            // Skip stale entries and vertices already finalized
            if state.statuses[u] == MarchStatus::Visited || entry.time > state.times[u] {
                continue;
            }
            state.statuses[u] = MarchStatus::Visited;

            let Some(group) = state.groups[u] else {
                continue;
            };
            let origin = seeds[group];

            for &w in graph.neighbors_of(u) {
                if state.statuses[w] == MarchStatus::Visited {
                    continue;
                }
                if graph.squared_distance(w, origin) > squared_cutoff {
                    continue;
                }

                let t = self.arrival_time(graph, u, w, group, &state);
                if t < state.times[w] {
                    state.times[w] = t;
                    state.groups[w] = Some(group);
                    state.statuses[w] = MarchStatus::Trial;
                    heap.push(MarchEntry::new(w, t));
                }
            }
        }

        let result = WavefrontResult {
            groups: state.groups,
            travel_times: state.times,
            statuses: state.statuses,
        };
        debug!(
            "fast marching: {} fronts reached {} of {} vertices",
            seeds.len(),
            result.visited_count(),
            n
        );
        Ok(result)
    }
}

/// Mutable per-vertex arrays of one march.
struct MarchState {
    times: Vec<f64>,
    groups: Vec<Option<usize>>,
    statuses: Vec<MarchStatus>,
}

impl MarchState {
    fn new(n: usize) -> Self {
        Self {
            times: vec![f64::INFINITY; n],
            groups: vec![None; n],
            statuses: vec![MarchStatus::Far; n],
        }
    }
}

/// Entry in the marching priority queue.
#[derive(Debug, Clone)]
struct MarchEntry {
    vertex: usize,
    time: f64,
}

impl MarchEntry {
    fn new(vertex: usize, time: f64) -> Self {
        Self { vertex, time }
    }
}

impl PartialEq for MarchEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MarchEntry {}

impl PartialOrd for MarchEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MarchEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior; lower vertex id wins ties
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Arrival time at `c` from the segment `a`-`b`, times interpolated linearly
/// along the segment.
///
/// Minimizes `t(P) + |c - P|` over `P` on the segment; with `P` at an
/// endpoint this is the edge update, so the result never exceeds it.
fn triangle_update(a: &Point3<f64>, ta: f64, b: &Point3<f64>, tb: f64, c: &Point3<f64>) -> f64 {
    let edge = b - a;
    let len = edge.norm();
    if len <= f64::EPSILON {
        return ta.min(tb) + (c - a).norm();
    }

    let dir = edge / len;
    let w = c - a;
    let along = w.dot(&dir);
    let across = (w - dir * along).norm();
    let slope = (tb - ta) / len;

    let s = if slope.abs() < 1.0 {
        along - slope * across / (1.0 - slope * slope).sqrt()
    } else if slope >= 1.0 {
        0.0
    } else {
        len
    };
    let s = s.clamp(0.0, len);

    ta + slope * s + ((along - s).powi(2) + across * across).sqrt()
}

fn check_seeds(seeds: &[usize], num_vertices: usize) -> Result<()> {
    let mut first_seed: HashMap<usize, usize> = HashMap::with_capacity(seeds.len());
    for (seed, &vertex) in seeds.iter().enumerate() {
        if vertex >= num_vertices {
            return Err(MarchError::InvalidSeedVertex {
                seed,
                vertex,
                num_vertices,
            });
        }
        if let Some(&first) = first_seed.get(&vertex) {
            return Err(MarchError::DuplicateSeedVertex {
                vertex,
                first,
                second: seed,
            });
        }
        first_seed.insert(vertex, seed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::shapes;
    use approx::assert_relative_eq;

    fn grid_graph(n: usize) -> MeshGraph {
        MeshGraph::from_mesh(&shapes::grid(n, 1.0).unwrap()).unwrap()
    }

    /// Shortest edge path on the grid triangulation from (0, 0) to (i, j).
    fn grid_edge_distance(i: usize, j: usize) -> f64 {
        let diag = i.min(j) as f64;
        let straight = (i as f64 - j as f64).abs();
        diag * std::f64::consts::SQRT_2 + straight
    }

    #[test]
    fn test_triangle_update_flat() {
        // Planar wave travelling along +y: both endpoints at time 0.
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.5, 1.0, 0.0);
        assert_relative_eq!(triangle_update(&a, 0.0, &b, 0.0, &c), 1.0, epsilon = 1e-12);

        // Point source at the origin: time along ab is the distance to a.
        let c = Point3::new(1.0, 1.0, 0.0);
        let t = triangle_update(&a, 0.0, &b, 1.0, &c);
        assert_relative_eq!(t, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_update_never_exceeds_edges() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.2, 0.0);
        let c = Point3::new(0.3, 1.1, 0.4);
        for &(ta, tb) in &[(0.0, 0.0), (0.0, 3.0), (2.0, 0.5), (1.0, 1.2)] {
            let t = triangle_update(&a, ta, &b, tb, &c);
            assert!(t <= ta + (c - a).norm() + 1e-12);
            assert!(t <= tb + (c - b).norm() + 1e-12);
            assert!(t >= ta.min(tb));
        }
    }

    #[test]
    fn test_edge_only_matches_graph_distance() {
        let n = 6;
        let graph = grid_graph(n);
        let solver = FastMarching::default().with_triangle_updates(false);
        let result = solver.grow(&graph, &[0], f64::INFINITY).unwrap();

        assert_eq!(result.visited_count(), graph.num_vertices());
        for j in 0..=n {
            for i in 0..=n {
                let v = j * (n + 1) + i;
                assert_relative_eq!(result.travel_time(v), grid_edge_distance(i, j), epsilon = 1e-9);
                assert_eq!(result.group(v), Some(0));
            }
        }
    }

    #[test]
    fn test_triangle_updates_bounded_by_euclidean() {
        let n = 8;
        let graph = grid_graph(n);
        let with = FastMarching::default()
            .grow(&graph, &[0], f64::INFINITY)
            .unwrap();
        let without = FastMarching::default()
            .with_triangle_updates(false)
            .grow(&graph, &[0], f64::INFINITY)
            .unwrap();

        for v in 0..graph.num_vertices() {
            let euclid = graph.edge_length(0, v);
            assert!(with.travel_time(v) >= euclid - 1e-9, "vertex {} below euclidean", v);
        }

        // Straight lines along edges are exact.
        assert_relative_eq!(with.travel_time(4), 4.0, epsilon = 1e-9);
        let diag = 3 * (n + 1) + 3;
        assert_relative_eq!(with.travel_time(diag), 3.0 * 2.0_f64.sqrt(), epsilon = 1e-9);

        // Off-axis vertices get strictly closer to the true distance.
        let total_with: f64 = with.travel_times().iter().sum();
        let total_without: f64 = without.travel_times().iter().sum();
        assert!(total_with < total_without);
    }

    #[test]
    fn test_two_fronts_partition_grid() {
        let n = 10;
        let graph = grid_graph(n);
        let last = graph.num_vertices() - 1;
        let result = FastMarching::default()
            .grow(&graph, &[0, last], f64::INFINITY)
            .unwrap();

        assert_eq!(result.visited_count(), graph.num_vertices());
        assert_eq!(result.group(0), Some(0));
        assert_eq!(result.group(last), Some(1));
        assert_eq!(result.travel_time(0), 0.0);
        assert_eq!(result.travel_time(last), 0.0);

        // Vertices well inside one half belong to the nearer seed.
        assert_eq!(result.group(n + 2), Some(0));
        assert_eq!(result.group(last - n - 2), Some(1));

        let sizes = result.group_sizes(2);
        assert_eq!(sizes.iter().sum::<usize>(), graph.num_vertices());
        assert!(sizes[0] > 0 && sizes[1] > 0);
        assert_eq!(result.group_vertices(1).len(), sizes[1]);
    }

    #[test]
    fn test_cutoff_limits_front() {
        let n = 10;
        let graph = grid_graph(n);
        let center = 5 * (n + 1) + 5;
        let result = FastMarching::default().grow(&graph, &[center], 4.0).unwrap();

        for v in 0..graph.num_vertices() {
            let within = graph.squared_distance(v, center) <= 4.0 + 1e-9;
            if within {
                assert_eq!(result.status(v), MarchStatus::Visited, "vertex {}", v);
                assert_eq!(result.group(v), Some(0));
                assert!(result.travel_time(v).is_finite());
            } else {
                assert_eq!(result.status(v), MarchStatus::Far, "vertex {}", v);
                assert_eq!(result.group(v), None);
                assert_eq!(result.travel_time(v), f64::INFINITY);
            }
        }
        assert_eq!(result.group_codes()[0], -1);
        assert_eq!(result.status_codes()[center], 1);
        assert!(result.max_travel_time().unwrap() <= 2.0 * 2.0 + 1e-9);
    }

    #[test]
    fn test_zero_cutoff_keeps_seeds_only() {
        let graph = grid_graph(4);
        let result = FastMarching::default().grow(&graph, &[0, 24], 0.0).unwrap();
        assert_eq!(result.visited_count(), 2);
        assert_eq!(result.group_sizes(2), vec![1, 1]);
    }

    #[test]
    fn test_no_seeds() {
        let graph = grid_graph(3);
        let result = FastMarching::default().grow(&graph, &[], 10.0).unwrap();
        assert_eq!(result, WavefrontResult::unreached(graph.num_vertices()));
        assert_eq!(result.max_travel_time(), None);
    }

    #[test]
    fn test_rejects_bad_seeds() {
        let graph = grid_graph(3);
        let solver = FastMarching::default();

        assert_eq!(
            solver.grow(&graph, &[0, 99], 1.0).unwrap_err(),
            MarchError::InvalidSeedVertex {
                seed: 1,
                vertex: 99,
                num_vertices: 16
            }
        );
        assert_eq!(
            solver.grow(&graph, &[3, 5, 3], 1.0).unwrap_err(),
            MarchError::DuplicateSeedVertex {
                vertex: 3,
                first: 0,
                second: 2
            }
        );
        assert!(solver.grow(&graph, &[0], -1.0).is_err());
        assert!(solver.grow(&graph, &[0], f64::NAN).is_err());
    }

    #[test]
    fn test_result_shape_validation() {
        assert!(WavefrontResult::new(vec![None], vec![0.0, 1.0], vec![MarchStatus::Far]).is_err());
        let result =
            WavefrontResult::new(vec![Some(0)], vec![0.0], vec![MarchStatus::Visited]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(MarchStatus::Trial.code(), 0);
    }
}
