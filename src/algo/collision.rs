//! Detection of seeds sharing a vertex.

use std::collections::BTreeMap;

/// Seeds grouped by the vertex they are assigned to.
///
/// Groups are kept in ascending vertex order, and the seed indices inside a
/// group are ascending, so every traversal is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionGroups {
    groups: BTreeMap<usize, Vec<usize>>,
}

impl CollisionGroups {
    /// Group seed indices by assigned vertex.
    ///
    /// # Example
    ///
    /// ```
    /// use endfoot::algo::CollisionGroups;
    ///
    /// let groups = CollisionGroups::from_assignment(&[4, 2, 4, 7]);
    /// assert!(!groups.is_injective());
    /// assert_eq!(groups.group(4), &[0, 2]);
    /// assert_eq!(groups.collisions().count(), 1);
    /// ```
    pub fn from_assignment(closest: &[usize]) -> Self {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (seed, &vertex) in closest.iter().enumerate() {
            groups.entry(vertex).or_default().push(seed);
        }
        Self { groups }
    }

    /// Seeds assigned to `vertex` (empty if none).
    pub fn group(&self, vertex: usize) -> &[usize] {
        self.groups.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All groups, including singletons.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.groups.iter().map(|(&v, seeds)| (v, seeds.as_slice()))
    }

    /// Only the groups with two or more seeds.
    pub fn collisions(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.iter().filter(|(_, seeds)| seeds.len() > 1)
    }

    /// Number of distinct vertices in use.
    #[inline]
    pub fn num_vertices_used(&self) -> usize {
        self.groups.len()
    }

    /// Number of vertices with a collision.
    pub fn num_collisions(&self) -> usize {
        self.collisions().count()
    }

    /// Number of seeds that will have to move (all but one per collision).
    pub fn num_displaced(&self) -> usize {
        self.collisions().map(|(_, seeds)| seeds.len() - 1).sum()
    }

    /// True when no two seeds share a vertex.
    pub fn is_injective(&self) -> bool {
        self.groups.values().all(|seeds| seeds.len() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injective_assignment() {
        let groups = CollisionGroups::from_assignment(&[3, 1, 2, 0]);
        assert!(groups.is_injective());
        assert_eq!(groups.num_vertices_used(), 4);
        assert_eq!(groups.num_collisions(), 0);
        assert_eq!(groups.num_displaced(), 0);
    }

    #[test]
    fn test_groups_sorted() {
        let groups = CollisionGroups::from_assignment(&[5, 5, 1, 5, 1, 9]);

        let collisions: Vec<_> = groups.collisions().collect();
        assert_eq!(collisions, vec![(1, &[2, 4][..]), (5, &[0, 1, 3][..])]);
        assert_eq!(groups.group(9), &[5]);
        assert!(groups.group(2).is_empty());
        assert_eq!(groups.num_displaced(), 3);
    }

    #[test]
    fn test_empty_assignment() {
        let groups = CollisionGroups::from_assignment(&[]);
        assert!(groups.is_injective());
        assert_eq!(groups.num_vertices_used(), 0);
    }
}
