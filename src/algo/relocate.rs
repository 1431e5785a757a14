//! Relocation of colliding seeds.
//!
//! When several seeds snap to the same vertex, the closest one keeps it and
//! the others are moved outwards, ring by ring, to vertices whose 1-ring is
//! still unclaimed. Claims accumulate in an [`Occupied`] set shared by all
//! collision groups of one pass, so a relocated seed never lands on, or next
//! to, any other seed's vertex.
//!
//! # Algorithm
//!
//! For each colliding vertex `v`, in ascending id order:
//! 1. Claim the 1-ring of `v`.
//! 2. Rank the colliding seeds by distance to `v`, ascending (stable, so ties
//!    keep ascending seed order). The first keeps `v`.
//! 3. Walk the rings around `v` from ring 2 outwards, candidates in ascending
//!    id order. A candidate is free when neither it nor any of its neighbors
//!    is claimed; the next pending seed moves there and the candidate plus
//!    its 1-ring are claimed.
//! 4. If the rings run out before every seed is placed, the pass fails with
//!    [`MarchError::UnresolvableCollision`].

use std::collections::{BTreeSet, HashSet};

use log::{debug, info};

use super::adjacency::MeshGraph;
use super::collision::CollisionGroups;
use super::nearest::SeedMapping;
use super::Progress;
use crate::error::{MarchError, Result};

/// Number of rings searched around a collision unless configured otherwise.
pub const DEFAULT_MAX_RINGS: usize = 5;

/// Options for seed relocation.
#[derive(Debug, Clone)]
pub struct RelocationOptions {
    /// Number of rings around a colliding vertex to generate.
    /// Candidates come from ring 2 up to this ring.
    pub max_rings: usize,
}

impl Default for RelocationOptions {
    fn default() -> Self {
        Self {
            max_rings: DEFAULT_MAX_RINGS,
        }
    }
}

impl RelocationOptions {
    /// Set the number of rings to search.
    pub fn with_max_rings(mut self, max_rings: usize) -> Self {
        self.max_rings = max_rings;
        self
    }
}

/// Vertices already claimed by placed seeds and their neighborhoods.
#[derive(Debug, Clone, Default)]
pub struct Occupied {
    claimed: HashSet<usize>,
}

impl Occupied {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from every vertex currently assigned to a seed.
    pub fn from_assignment(closest: &[usize]) -> Self {
        Self {
            claimed: closest.iter().copied().collect(),
        }
    }

    /// Whether `v` is claimed.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.claimed.contains(&v)
    }

    /// Claim a single vertex.
    #[inline]
    pub fn claim(&mut self, v: usize) {
        self.claimed.insert(v);
    }

    /// Claim the 1-ring of `v`, not `v` itself.
    pub fn claim_ring(&mut self, graph: &MeshGraph, v: usize) {
        self.claimed.extend(graph.neighbors_of(v).iter().copied());
    }

    /// Claim `v` together with its 1-ring.
    pub fn claim_with_ring(&mut self, graph: &MeshGraph, v: usize) {
        self.claim(v);
        self.claim_ring(graph, v);
    }

    /// Whether a seed may be placed on `v`.
    pub fn is_free(&self, graph: &MeshGraph, v: usize) -> bool {
        !self.contains(v) && !graph.neighbors_of(v).iter().any(|&w| self.contains(w))
    }

    /// Number of claimed vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Check if nothing is claimed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// A seed moved off a shared vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedMove {
    /// The seed index.
    pub seed: usize,
    /// The vertex the seed collided on.
    pub from: usize,
    /// The vertex it was moved to.
    pub to: usize,
    /// Ring of `from` that `to` belongs to.
    pub ring: usize,
}

/// Summary of a relocation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationReport {
    /// Number of collision groups resolved.
    pub groups_resolved: usize,
    /// Every seed move, in the order it was made.
    pub moves: Vec<SeedMove>,
}

impl RelocationReport {
    /// Number of seeds that changed vertex.
    #[inline]
    pub fn num_moved(&self) -> usize {
        self.moves.len()
    }

    /// True when nothing had to move.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Rings of vertices around `v`, nearest first.
///
/// Ring 1 is the 1-ring of `v`, ring `k + 1` holds the unvisited neighbors of
/// ring `k`. Each ring is sorted by vertex id. Generation stops after
/// `max_rings` rings or as soon as a ring comes out empty.
///
/// # Example
///
/// ```
/// use endfoot::algo::{expanding_rings, MeshGraph};
/// use endfoot::mesh::shapes;
///
/// let mesh = shapes::grid(4, 1.0).unwrap();
/// let graph = MeshGraph::from_mesh(&mesh).unwrap();
/// let rings = expanding_rings(&graph, 12, 2);
///
/// assert_eq!(rings.len(), 2);
/// assert_eq!(rings[0], vec![6, 7, 11, 13, 17, 18]);
/// ```
pub fn expanding_rings(graph: &MeshGraph, v: usize, max_rings: usize) -> Vec<Vec<usize>> {
    let mut visited: HashSet<usize> = HashSet::new();
    visited.insert(v);

    let mut rings: Vec<Vec<usize>> = Vec::with_capacity(max_rings);
    let mut frontier = vec![v];

    for _ in 0..max_rings {
        let mut next: BTreeSet<usize> = BTreeSet::new();
        for &u in &frontier {
            for &w in graph.neighbors_of(u) {
                if visited.insert(w) {
                    next.insert(w);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next.into_iter().collect();
        rings.push(frontier.clone());
    }

    rings
}

/// Order colliding seeds by distance to their vertex, closest first.
///
/// The sort is stable, so seeds at equal distance stay in the order given.
pub fn rank_by_distance(seeds: &[usize], distances: &[f64]) -> Vec<usize> {
    let mut ranked = seeds.to_vec();
    ranked.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));
    ranked
}

/// Resolve every collision in `groups`, updating `closest` in place.
///
/// `groups` must be built from `closest`; a group naming a seed that is not
/// on its vertex is rejected. `occupied` is the accumulator shared across
/// groups; start it with [`Occupied::from_assignment`]. On error `closest` is
/// left partially updated and should be discarded.
pub fn resolve_collisions(
    graph: &MeshGraph,
    closest: &mut [usize],
    groups: &CollisionGroups,
    distances: &[f64],
    options: &RelocationOptions,
    occupied: &mut Occupied,
) -> Result<RelocationReport> {
    resolve_collisions_with_progress(
        graph,
        closest,
        groups,
        distances,
        options,
        occupied,
        &Progress::none(),
    )
}

/// Resolve collisions with progress reporting (one step per colliding vertex).
pub fn resolve_collisions_with_progress(
    graph: &MeshGraph,
    closest: &mut [usize],
    groups: &CollisionGroups,
    distances: &[f64],
    options: &RelocationOptions,
    occupied: &mut Occupied,
    progress: &Progress,
) -> Result<RelocationReport> {
    check_assignment(graph, closest, distances)?;
    check_groups(groups, closest)?;

    let total = groups.num_collisions();
    let mut report = RelocationReport::default();

    for (step, (vertex, seeds)) in groups.collisions().enumerate() {
        progress.report(step, total, "Resolving seed collisions");

        let moves = resolve_group(graph, vertex, seeds, closest, distances, options, occupied)?;
        debug!(
            "vertex {}: kept seed {}, moved {} seed(s)",
            vertex,
            closest_seed(seeds, distances),
            moves.len()
        );

        report.moves.extend(moves);
        report.groups_resolved += 1;
    }
    progress.report(total, total, "Resolving seed collisions");

    Ok(report)
}

/// Group, resolve, and return a collision-free copy of the assignment.
///
/// The input mapping is not modified, so a failed pass leaves no partial
/// result behind. An assignment that is already injective comes back as is.
///
/// # Example
///
/// ```
/// use endfoot::algo::{deduplicate_seeds, MeshGraph, RelocationOptions, SeedMapping};
/// use endfoot::mesh::shapes;
///
/// let mesh = shapes::grid(10, 1.0).unwrap();
/// let graph = MeshGraph::from_mesh(&mesh).unwrap();
/// let mapping = SeedMapping {
///     closest: vec![60, 60],
///     distances: vec![0.3, 0.1],
/// };
///
/// let (closest, report) =
///     deduplicate_seeds(&graph, &mapping, &RelocationOptions::default()).unwrap();
/// assert_eq!(closest[1], 60);
/// assert_ne!(closest[0], 60);
/// assert_eq!(report.num_moved(), 1);
/// ```
pub fn deduplicate_seeds(
    graph: &MeshGraph,
    mapping: &SeedMapping,
    options: &RelocationOptions,
) -> Result<(Vec<usize>, RelocationReport)> {
    deduplicate_seeds_with_progress(graph, mapping, options, &Progress::none())
}

/// [`deduplicate_seeds`] with progress reporting.
pub fn deduplicate_seeds_with_progress(
    graph: &MeshGraph,
    mapping: &SeedMapping,
    options: &RelocationOptions,
    progress: &Progress,
) -> Result<(Vec<usize>, RelocationReport)> {
    let groups = CollisionGroups::from_assignment(&mapping.closest);
    if groups.is_injective() {
        check_assignment(graph, &mapping.closest, &mapping.distances)?;
        return Ok((mapping.closest.clone(), RelocationReport::default()));
    }

    info!(
        "{} seed(s) collide on {} vertices",
        groups.num_displaced() + groups.num_collisions(),
        groups.num_collisions()
    );

    let mut closest = mapping.closest.clone();
    let mut occupied = Occupied::from_assignment(&closest);
    let report = resolve_collisions_with_progress(
        graph,
        &mut closest,
        &groups,
        &mapping.distances,
        options,
        &mut occupied,
        progress,
    )?;

    Ok((closest, report))
}

/// True when no two seeds share a vertex.
pub fn is_injective(closest: &[usize]) -> bool {
    let mut seen = HashSet::with_capacity(closest.len());
    closest.iter().all(|&v| seen.insert(v))
}

/// First pair of seeds whose vertices are adjacent, if any.
pub fn find_adjacent_pair(graph: &MeshGraph, closest: &[usize]) -> Option<(usize, usize)> {
    for a in 0..closest.len() {
        for b in a + 1..closest.len() {
            if graph.are_adjacent(closest[a], closest[b]) {
                return Some((a, b));
            }
        }
    }
    None
}

fn resolve_group(
    graph: &MeshGraph,
    vertex: usize,
    seeds: &[usize],
    closest: &mut [usize],
    distances: &[f64],
    options: &RelocationOptions,
    occupied: &mut Occupied,
) -> Result<Vec<SeedMove>> {
    let rings = expanding_rings(graph, vertex, options.max_rings);
    occupied.claim_ring(graph, vertex);

    let ranked = rank_by_distance(seeds, distances);
    let pending = &ranked[1..];
    let mut moves = Vec::with_capacity(pending.len());

    'rings: for (k, ring) in rings.iter().enumerate().skip(1) {
        for &candidate in ring {
            if moves.len() == pending.len() {
                break 'rings;
            }
            if !occupied.is_free(graph, candidate) {
                continue;
            }

            let seed = pending[moves.len()];
            closest[seed] = candidate;
            occupied.claim_with_ring(graph, candidate);
            moves.push(SeedMove {
                seed,
                from: vertex,
                to: candidate,
                ring: k + 1,
            });
        }
    }

    if moves.len() < pending.len() {
        return Err(MarchError::UnresolvableCollision {
            vertex,
            seeds: seeds.to_vec(),
            placed: moves.len(),
            pending: pending.len() - moves.len(),
            rings: options.max_rings,
        });
    }

    Ok(moves)
}

fn closest_seed(seeds: &[usize], distances: &[f64]) -> usize {
    rank_by_distance(seeds, distances)[0]
}

fn check_groups(groups: &CollisionGroups, closest: &[usize]) -> Result<()> {
    for (vertex, seeds) in groups.iter() {
        if let Some(&seed) = seeds
            .iter()
            .find(|&&s| closest.get(s) != Some(&vertex))
        {
            return Err(MarchError::invalid_param(
                "groups",
                format!("seed {} on vertex {}", seed, vertex),
                "must be grouped from the same assignment",
            ));
        }
    }
    Ok(())
}

fn check_assignment(graph: &MeshGraph, closest: &[usize], distances: &[f64]) -> Result<()> {
    if closest.len() != distances.len() {
        return Err(MarchError::invalid_param(
            "distances",
            distances.len(),
            "must have one entry per seed",
        ));
    }
    let n = graph.num_vertices();
    if let Some((seed, &vertex)) = closest.iter().enumerate().find(|&(_, &v)| v >= n) {
        return Err(MarchError::InvalidSeedVertex {
            seed,
            vertex,
            num_vertices: n,
        });
    }
    Ok(())
}
