//! Padded per-vertex neighbor tables.
//!
//! Mesh libraries commonly hand out vertex adjacency as a dense 2D table with
//! one row per vertex, padded to the largest valence with a sentinel value.

use crate::error::{MarchError, Result};

/// A dense, row-major table of neighbor ids padded with [`PaddedNeighbors::SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedNeighbors {
    entries: Vec<i64>,
    num_rows: usize,
    width: usize,
}

impl PaddedNeighbors {
    /// Marker for an unused slot in a row.
    pub const SENTINEL: i64 = -1;

    /// Wrap a flat row-major buffer of `num_rows * width` entries.
    pub fn from_flat(entries: Vec<i64>, num_rows: usize, width: usize) -> Result<Self> {
        if entries.len() != num_rows * width {
            return Err(MarchError::invalid_param(
                "entries",
                entries.len(),
                "length must equal num_rows * width",
            ));
        }
        Ok(Self {
            entries,
            num_rows,
            width,
        })
    }

    /// Build a table from ragged rows, padding each to the longest one.
    pub fn from_rows<R: AsRef<[i64]>>(rows: &[R]) -> Self {
        let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut entries = Vec::with_capacity(rows.len() * width);
        for row in rows {
            let row = row.as_ref();
            entries.extend_from_slice(row);
            entries.extend(std::iter::repeat(Self::SENTINEL).take(width - row.len()));
        }
        Self {
            entries,
            num_rows: rows.len(),
            width,
        }
    }

    /// Number of rows (one per vertex).
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Padded row width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The raw row for a vertex, sentinel padding included.
    #[inline]
    pub fn row(&self, v: usize) -> &[i64] {
        &self.entries[v * self.width..(v + 1) * self.width]
    }

    /// Iterate over all rows in vertex order.
    pub fn rows(&self) -> impl Iterator<Item = &[i64]> + '_ {
        (0..self.num_rows).map(move |v| self.row(v))
    }

    /// Iterate over the non-sentinel entries of a row.
    pub fn row_neighbors(&self, v: usize) -> impl Iterator<Item = i64> + '_ {
        self.row(v)
            .iter()
            .copied()
            .filter(|&n| n != Self::SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_pads_with_sentinel() {
        let table = PaddedNeighbors::from_rows(&[vec![1, 2, 3], vec![0], vec![]]);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.width(), 3);
        assert_eq!(table.row(1), &[0, -1, -1]);
        assert_eq!(table.row(2), &[-1, -1, -1]);
        assert_eq!(table.row_neighbors(0).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(table.row_neighbors(2).count(), 0);
    }

    #[test]
    fn test_from_flat_checks_length() {
        assert!(PaddedNeighbors::from_flat(vec![1, -1, 0], 2, 2).is_err());

        let table = PaddedNeighbors::from_flat(vec![1, -1, 0, -1], 2, 2).unwrap();
        assert_eq!(table.rows().count(), 2);
        assert_eq!(table.row(1), &[0, -1]);
    }

    #[test]
    fn test_empty_table() {
        let rows: Vec<Vec<i64>> = Vec::new();
        let table = PaddedNeighbors::from_rows(&rows);
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.width(), 0);
    }
}
