//! All-different constraints over a cell list.

use varoku_core::{CandidateGrid, Grid, Position, ValueSet};

use super::Elimination;

/// All-different over a list of cells.
///
/// Rows, columns, and blocks are the implicit lines of every puzzle; the
/// same constraint also expresses diagonals, hyper regions, and pyramid
/// regions, which are nothing more than extra cell lists that must not
/// repeat a value.
///
/// When the line covers as many cells as the grid has values, the
/// consistency check additionally requires every value to still be placeable
/// somewhere on the line; shorter lists only forbid repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineConstraint {
    cells: Vec<Position>,
}

impl LineConstraint {
    /// Creates an all-different constraint over `cells`.
    #[must_use]
    pub fn new(cells: Vec<Position>) -> Self {
        Self { cells }
    }

    /// Returns the cells this constraint governs.
    #[must_use]
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Eliminates every assigned value from the candidates of the other
    /// cells on the line.
    ///
    /// A peer that is already pinned to the same value loses its only
    /// candidate, which surfaces the contradiction as an empty set.
    pub(super) fn prune(
        &self,
        grid: &Grid,
        candidates: &CandidateGrid,
        out: &mut Vec<Elimination>,
    ) {
        for &pos in &self.cells {
            let Some(value) = grid.get(pos) else {
                continue;
            };
            for &peer in &self.cells {
                if peer != pos && candidates.at(peer).contains(value) {
                    out.push(Elimination::new(peer, value));
                }
            }
        }
    }

    pub(super) fn is_consistent(&self, grid: &Grid, candidates: &CandidateGrid) -> bool {
        let mut seen = ValueSet::EMPTY;
        for &pos in &self.cells {
            if let Some(value) = grid.get(pos) {
                if !seen.insert(value) {
                    return false;
                }
            }
        }
        // A full-length line must still offer a home to every value.
        let size = grid.geometry().size();
        if self.cells.len() == usize::from(size) {
            for value in 1..=size {
                if !self.cells.iter().any(|&pos| candidates.at(pos).contains(value)) {
                    return false;
                }
            }
        }
        true
    }

    pub(super) fn is_satisfied(&self, grid: &Grid) -> bool {
        let mut seen = ValueSet::EMPTY;
        for &pos in &self.cells {
            let Some(value) = grid.get(pos) else {
                return false;
            };
            if !seen.insert(value) {
                return false;
            }
        }
        true
    }
}
