//! Dense pairwise win-count matrix.

use crate::error::{Error, Result};

/// `n x n` matrix where `get(i, j)` counts recorded duels in which arm `i` beat arm `j`.
///
/// Counts only ever grow.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WinMatrix {
    n: usize,
    counts: Vec<u64>,
}

impl WinMatrix {
    /// All-zero matrix over `n` arms.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            counts: vec![0; n * n],
        }
    }

    /// Build from explicit rows.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] if any row length differs from the number of rows.
    pub fn from_rows(rows: &[Vec<u64>]) -> Result<Self> {
        let n = rows.len();
        let mut counts = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(Error::LengthMismatch {
                    expected: n,
                    actual: row.len(),
                });
            }
            counts.extend_from_slice(row);
        }
        Ok(Self { n, counts })
    }

    /// Number of arms.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Wins of `i` over `j`. Panics if either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.n + j]
    }

    /// Total recorded duels between `i` and `j`, in either direction.
    pub fn duels_between(&self, i: usize, j: usize) -> u64 {
        self.get(i, j) + self.get(j, i)
    }

    /// Empirical rate at which `i` beats `j`; `0.5` when the pair has never met.
    pub fn win_rate(&self, i: usize, j: usize) -> f64 {
        let total = self.duels_between(i, j);
        if total == 0 {
            0.5
        } else {
            self.get(i, j) as f64 / total as f64
        }
    }

    /// Record one win of `winner` over `loser`.
    pub(crate) fn wins_against(&mut self, winner: usize, loser: usize) {
        let cell = &mut self.counts[winner * self.n + loser];
        *cell = cell.saturating_add(1);
    }

    /// Sum of every cell.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Row-major view of the counts.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.counts.chunks(self.n.max(1))
    }
}
