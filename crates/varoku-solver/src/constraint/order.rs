//! Greater-than pair constraints.

use varoku_core::{CandidateGrid, Grid, Position};

use super::Elimination;

/// An ordered pair of cells: the value of `above` must be strictly greater
/// than the value of `below`.
///
/// Pruning works from the pair's current bounds: `above` cannot take any
/// value at or below the smallest candidate of `below`, and `below` cannot
/// take any value at or above the largest candidate of `above`. Assigned
/// cells are singletons, so the same rule covers them without a special
/// case. Chains and cycles of pairs resolve through repeated passes, each
/// one tightening a bound until the state settles or a cell runs out of
/// candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreaterThanConstraint {
    above: Position,
    below: Position,
}

impl GreaterThanConstraint {
    /// Creates a constraint requiring `value(above) > value(below)`.
    #[must_use]
    pub const fn new(above: Position, below: Position) -> Self {
        Self { above, below }
    }

    /// Returns the cell holding the greater value.
    #[must_use]
    pub const fn above(&self) -> Position {
        self.above
    }

    /// Returns the cell holding the lesser value.
    #[must_use]
    pub const fn below(&self) -> Position {
        self.below
    }

    pub(super) fn prune(
        &self,
        _grid: &Grid,
        candidates: &CandidateGrid,
        out: &mut Vec<Elimination>,
    ) {
        let above = candidates.at(self.above);
        let below = candidates.at(self.below);
        if let Some(floor) = below.min() {
            for value in above {
                if value > floor {
                    break;
                }
                out.push(Elimination::new(self.above, value));
            }
        }
        if let Some(ceiling) = above.max() {
            for value in below {
                if value >= ceiling {
                    out.push(Elimination::new(self.below, value));
                }
            }
        }
    }

    pub(super) fn is_consistent(&self, grid: &Grid, candidates: &CandidateGrid) -> bool {
        if let (Some(a), Some(b)) = (grid.get(self.above), grid.get(self.below)) {
            return a > b;
        }
        match (candidates.at(self.above).max(), candidates.at(self.below).min()) {
            (Some(max_above), Some(min_below)) => max_above > min_below,
            // an empty candidate set is reported by the validator, not here
            _ => true,
        }
    }

    pub(super) fn is_satisfied(&self, grid: &Grid) -> bool {
        match (grid.get(self.above), grid.get(self.below)) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use varoku_core::{Geometry, ValueSet};

    use super::*;

    fn geometry_4() -> Geometry {
        Geometry::new(2, 2).unwrap()
    }

    fn pair() -> GreaterThanConstraint {
        GreaterThanConstraint::new(Position::new(0, 0), Position::new(1, 0))
    }

    fn removed_at(out: &[Elimination], pos: Position) -> ValueSet {
        out.iter()
            .filter(|e| e.pos == pos)
            .map(|e| e.value)
            .collect()
    }

    #[test]
    fn test_prune_trims_both_bounds() {
        let geometry = geometry_4();
        let grid = Grid::new(geometry);
        let candidates = CandidateGrid::full(geometry);

        let mut out = Vec::new();
        pair().prune(&grid, &candidates, &mut out);

        // above > below forbids 1 above and 4 below
        assert_eq!(removed_at(&out, Position::new(0, 0)), ValueSet::singleton(1));
        assert_eq!(removed_at(&out, Position::new(1, 0)), ValueSet::singleton(4));
    }

    #[test]
    fn test_prune_against_assigned_cell() {
        let geometry = geometry_4();
        let mut grid = Grid::new(geometry);
        grid.set(Position::new(1, 0), 2);
        let candidates = CandidateGrid::from_grid(&grid);

        let mut out = Vec::new();
        pair().prune(&grid, &candidates, &mut out);

        // above must exceed 2
        assert_eq!(
            removed_at(&out, Position::new(0, 0)),
            ValueSet::from_iter([1, 2])
        );
    }

    #[test]
    fn test_consistency_on_assigned_pair() {
        let geometry = geometry_4();
        let mut grid = Grid::new(geometry);
        grid.set(Position::new(0, 0), 3);
        grid.set(Position::new(1, 0), 1);
        let candidates = CandidateGrid::from_grid(&grid);
        assert!(pair().is_consistent(&grid, &candidates));
        assert!(pair().is_satisfied(&grid));

        grid.set(Position::new(1, 0), 3);
        let candidates = CandidateGrid::from_grid(&grid);
        assert!(!pair().is_consistent(&grid, &candidates));
        assert!(!pair().is_satisfied(&grid));
    }

    #[test]
    fn test_inconsistent_when_bounds_cross() {
        let geometry = geometry_4();
        let grid = Grid::new(geometry);
        let mut candidates = CandidateGrid::full(geometry);
        // above can be at most 2, below at least 3
        candidates.remove(Position::new(0, 0), 3);
        candidates.remove(Position::new(0, 0), 4);
        candidates.remove(Position::new(1, 0), 1);
        candidates.remove(Position::new(1, 0), 2);

        assert!(!pair().is_consistent(&grid, &candidates));
    }
}
