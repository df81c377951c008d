//! Per-cell candidate tracking.
//!
//! [`CandidateGrid`] pairs every cell of a grid with the [`ValueSet`] of
//! values not yet proven impossible for it. A filled cell's set is exactly
//! the singleton of its value; an empty cell's set shrinks monotonically as
//! constraints eliminate candidates. Restoring a removed candidate is the
//! undo log's job, never this type's.
//!
//! # Examples
//!
//! ```
//! use varoku_core::{CandidateGrid, Geometry, Position};
//!
//! let geometry = Geometry::new(2, 2)?;
//! let mut candidates = CandidateGrid::full(geometry);
//!
//! assert_eq!(candidates.at(Position::new(0, 0)).len(), 4);
//! candidates.remove(Position::new(0, 0), 3);
//! assert_eq!(candidates.at(Position::new(0, 0)).len(), 3);
//! # Ok::<(), varoku_core::GeometryError>(())
//! ```

use crate::{Geometry, Grid, Position, ValueSet};

/// The candidate sets of every cell of an N×N grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGrid {
    geometry: Geometry,
    cells: Vec<ValueSet>,
}

impl CandidateGrid {
    /// Creates a candidate grid where every cell admits every value.
    #[must_use]
    pub fn full(geometry: Geometry) -> Self {
        Self {
            geometry,
            cells: vec![ValueSet::full(geometry.size()); geometry.cell_count()],
        }
    }

    /// Creates a candidate grid matching `grid`: filled cells collapse to
    /// their value's singleton, empty cells admit every value.
    ///
    /// No cross-cell elimination happens here; that is constraint
    /// propagation's job.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let mut candidates = Self::full(grid.geometry());
        for (pos, value) in grid.assigned() {
            candidates.pin(pos, value);
        }
        candidates
    }

    /// Returns the geometry this grid was built for.
    #[must_use]
    #[inline]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Returns the candidate set of the cell at `pos`.
    #[must_use]
    #[inline]
    pub fn at(&self, pos: Position) -> ValueSet {
        self.cells[self.geometry.index_of(pos)]
    }

    /// Removes `value` as a candidate at `pos`. Returns `true` if the set
    /// changed.
    #[inline]
    pub fn remove(&mut self, pos: Position, value: u8) -> bool {
        let index = self.geometry.index_of(pos);
        self.cells[index].remove(value)
    }

    /// Re-adds `value` as a candidate at `pos`. Returns `true` if the set
    /// changed.
    ///
    /// Used only to restore a prior state when unwinding speculative work.
    #[inline]
    pub fn insert(&mut self, pos: Position, value: u8) -> bool {
        let index = self.geometry.index_of(pos);
        self.cells[index].insert(value)
    }

    /// Collapses the cell at `pos` to the singleton `{value}`.
    #[inline]
    pub fn pin(&mut self, pos: Position, value: u8) {
        let index = self.geometry.index_of(pos);
        self.cells[index] = ValueSet::singleton(value);
    }

    /// Returns the first cell (row-major) whose candidate set is empty, or
    /// `None` if every cell still admits at least one value.
    ///
    /// An empty candidate set is a contradiction: no value can legally fill
    /// that cell.
    #[must_use]
    pub fn first_contradiction(&self) -> Option<Position> {
        self.cells
            .iter()
            .position(|set| set.is_empty())
            .map(|index| self.geometry.position_at(index))
    }
}
