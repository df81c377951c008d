//! Puzzle definitions.
//!
//! A [`Puzzle`] bundles a grid geometry, the given cell values, and the full
//! [`ConstraintSet`] the solution must satisfy. Row, column, and block
//! all-different constraints are always present; variant rules are added
//! through the builder methods. Everything is validated eagerly, so a puzzle
//! that constructs successfully can be handed to the solver without further
//! checks. An unsolvable puzzle is a solver *result*, not a construction
//! error.

use derive_more::{Display, Error, From};
use varoku_core::{Geometry, GeometryError, Grid, Position};

use crate::constraint::{
    CageConstraint, ConstraintSet, GreaterThanConstraint, LineConstraint, SandwichConstraint,
};

/// A fully specified puzzle: geometry, givens, and constraints.
///
/// # Examples
///
/// A classic 9×9 puzzle with a killer cage:
///
/// ```
/// use varoku_core::Position;
/// use varoku_solver::Puzzle;
///
/// let mut puzzle = Puzzle::new(3, 3)?;
/// puzzle.add_cage(vec![Position::new(0, 0), Position::new(1, 0)], 10)?;
/// puzzle.set_given(Position::new(4, 4), 5)?;
/// # Ok::<(), varoku_solver::PuzzleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Puzzle {
    geometry: Geometry,
    givens: Grid,
    constraints: ConstraintSet,
}

/// Errors reported while building a [`Puzzle`].
///
/// These are the only hard failures the engine raises: every one of them
/// means the puzzle definition itself is malformed. They all surface before
/// any search begins.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum PuzzleError {
    /// The block dimensions are invalid.
    #[from]
    Geometry(GeometryError),

    /// A cell reference lies outside the grid.
    #[display("cell {pos} is outside the {size}×{size} grid")]
    #[from(ignore)]
    CellOutOfBounds {
        /// The offending cell.
        pos: Position,
        /// The grid side.
        size: u8,
    },

    /// A constraint names the same cell twice.
    #[display("cell {pos} appears twice in one constraint")]
    #[from(ignore)]
    DuplicateCell {
        /// The repeated cell.
        pos: Position,
    },

    /// A constraint was declared without any cells.
    #[display("constraint has no cells")]
    EmptyConstraint,

    /// A given value lies outside `1..=size`.
    #[display("given value {value} is outside 1..={size}")]
    #[from(ignore)]
    GivenOutOfRange {
        /// The given value.
        value: u8,
        /// The grid side.
        size: u8,
    },

    /// A whole-grid given set was built for a different geometry.
    #[display("givens were built for a {found}×{found} grid, expected {expected}×{expected}")]
    #[from(ignore)]
    GivensGeometryMismatch {
        /// Side of the puzzle's grid.
        expected: u8,
        /// Side of the supplied grid.
        found: u8,
    },

    /// A variant was requested on a grid size it is not defined for.
    #[display("this variant requires a {required}×{required} grid, not {size}×{size}")]
    #[from(ignore)]
    UnsupportedSize {
        /// The grid side the variant needs.
        required: u8,
        /// The puzzle's actual grid side.
        size: u8,
    },
}

impl Puzzle {
    /// Creates a classic puzzle with `block_rows × block_cols` blocks and the
    /// implicit row, column, and block constraints.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Geometry`] for invalid block dimensions.
    pub fn new(block_rows: u8, block_cols: u8) -> Result<Self, PuzzleError> {
        let geometry = Geometry::new(block_rows, block_cols)?;
        let mut constraints = ConstraintSet::new();
        for i in 0..geometry.size() {
            constraints.push(LineConstraint::new(geometry.row_positions(i)));
            constraints.push(LineConstraint::new(geometry.column_positions(i)));
            constraints.push(LineConstraint::new(geometry.block_positions(i)));
        }
        Ok(Self {
            geometry,
            givens: Grid::new(geometry),
            constraints,
        })
    }

    /// Returns the puzzle's geometry.
    #[must_use]
    #[inline]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Returns the given cell values.
    #[must_use]
    #[inline]
    pub const fn givens(&self) -> &Grid {
        &self.givens
    }

    /// Returns the puzzle's constraints.
    #[must_use]
    #[inline]
    pub const fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Sets one given cell value.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::CellOutOfBounds`] or
    /// [`PuzzleError::GivenOutOfRange`] for invalid input. Conflicting givens
    /// (say, two 5s in one row) are *not* an error here; they make the
    /// puzzle unsolvable, which the solver reports as its ordinary result.
    pub fn set_given(&mut self, pos: Position, value: u8) -> Result<(), PuzzleError> {
        self.check_cell(pos)?;
        if value == 0 || value > self.geometry.size() {
            return Err(PuzzleError::GivenOutOfRange {
                value,
                size: self.geometry.size(),
            });
        }
        self.givens.set(pos, value);
        Ok(())
    }

    /// Replaces all givens with the contents of `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::GivensGeometryMismatch`] if `grid` was built
    /// for a different geometry.
    pub fn set_givens(&mut self, grid: Grid) -> Result<(), PuzzleError> {
        if grid.geometry() != self.geometry {
            return Err(PuzzleError::GivensGeometryMismatch {
                expected: self.geometry.size(),
                found: grid.geometry().size(),
            });
        }
        self.givens = grid;
        Ok(())
    }

    /// Adds a killer cage: the `cells` hold pairwise different values that
    /// sum to `sum`.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::EmptyConstraint`],
    /// [`PuzzleError::CellOutOfBounds`], or [`PuzzleError::DuplicateCell`]
    /// for a malformed cage.
    pub fn add_cage(&mut self, cells: Vec<Position>, sum: u32) -> Result<(), PuzzleError> {
        self.check_region(&cells)?;
        self.constraints.push(CageConstraint::new(cells, sum));
        Ok(())
    }

    /// Adds an extra all-different region (a fortress, window, or any other
    /// custom group of mutually distinct cells).
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::EmptyConstraint`],
    /// [`PuzzleError::CellOutOfBounds`], or [`PuzzleError::DuplicateCell`]
    /// for a malformed region.
    pub fn add_region(&mut self, cells: Vec<Position>) -> Result<(), PuzzleError> {
        self.check_region(&cells)?;
        self.constraints.push(LineConstraint::new(cells));
        Ok(())
    }

    /// Adds a greater-than pair: `value(above) > value(below)`.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::CellOutOfBounds`] for a cell outside the grid
    /// and [`PuzzleError::DuplicateCell`] if both sides name the same cell.
    pub fn add_greater_than(&mut self, above: Position, below: Position) -> Result<(), PuzzleError> {
        self.check_cell(above)?;
        self.check_cell(below)?;
        if above == below {
            return Err(PuzzleError::DuplicateCell { pos: above });
        }
        self.constraints
            .push(GreaterThanConstraint::new(above, below));
        Ok(())
    }

    /// Adds both diagonals as all-different lines (X-Sudoku).
    pub fn add_diagonals(&mut self) {
        let size = self.geometry.size();
        let main = (0..size).map(|i| Position::new(i, i)).collect();
        let anti = (0..size).map(|i| Position::new(size - 1 - i, i)).collect();
        self.constraints.push(LineConstraint::new(main));
        self.constraints.push(LineConstraint::new(anti));
    }

    /// Adds the four hyper windows: the 3×3 regions whose top-left corners
    /// sit at rows and columns 1 and 5 (Hyper Sudoku).
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::UnsupportedSize`] on anything but a 9×9 grid.
    pub fn add_hyper_regions(&mut self) -> Result<(), PuzzleError> {
        self.require_size(9)?;
        for (x0, y0) in [(1, 1), (5, 1), (1, 5), (5, 5)] {
            let cells = (0..3)
                .flat_map(|dy| (0..3).map(move |dx| Position::new(x0 + dx, y0 + dy)))
                .collect();
            self.constraints.push(LineConstraint::new(cells));
        }
        Ok(())
    }

    /// Adds the four pyramid regions of Four-Pyramids Sudoku.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::UnsupportedSize`] on anything but a 9×9 grid.
    pub fn add_pyramids(&mut self) -> Result<(), PuzzleError> {
        self.require_size(9)?;
        // 1-based (row, column) cells of the four pyramids, one per grid edge
        const PYRAMIDS: [[(u8, u8); 9]; 4] = [
            [
                (2, 1),
                (3, 1),
                (3, 2),
                (4, 1),
                (4, 2),
                (4, 3),
                (5, 1),
                (5, 2),
                (6, 1),
            ],
            [
                (1, 4),
                (1, 5),
                (2, 5),
                (1, 6),
                (2, 6),
                (3, 6),
                (1, 7),
                (2, 7),
                (1, 8),
            ],
            [
                (9, 2),
                (9, 3),
                (8, 3),
                (9, 4),
                (8, 4),
                (7, 4),
                (9, 5),
                (8, 5),
                (9, 6),
            ],
            [
                (8, 9),
                (7, 9),
                (7, 8),
                (6, 9),
                (6, 8),
                (6, 7),
                (5, 9),
                (5, 8),
                (4, 9),
            ],
        ];
        for pyramid in PYRAMIDS {
            let cells = pyramid
                .iter()
                .map(|&(row, col)| Position::new(col - 1, row - 1))
                .collect();
            self.constraints.push(LineConstraint::new(cells));
        }
        Ok(())
    }

    /// Adds a sandwich sum on row `y`.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::CellOutOfBounds`] for a row outside the grid
    /// and [`PuzzleError::UnsupportedSize`] on grids smaller than 2×2, where
    /// 1 and N are the same value.
    pub fn add_sandwich_row(&mut self, y: u8, sum: u32) -> Result<(), PuzzleError> {
        self.check_sandwich_line(Position::new(0, y))?;
        self.constraints
            .push(SandwichConstraint::new(self.geometry.row_positions(y), sum));
        Ok(())
    }

    /// Adds a sandwich sum on column `x`.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::CellOutOfBounds`] for a column outside the
    /// grid and [`PuzzleError::UnsupportedSize`] on grids smaller than 2×2.
    pub fn add_sandwich_column(&mut self, x: u8, sum: u32) -> Result<(), PuzzleError> {
        self.check_sandwich_line(Position::new(x, 0))?;
        self.constraints.push(SandwichConstraint::new(
            self.geometry.column_positions(x),
            sum,
        ));
        Ok(())
    }

    fn check_sandwich_line(&self, pos: Position) -> Result<(), PuzzleError> {
        self.check_cell(pos)?;
        if self.geometry.size() < 2 {
            return Err(PuzzleError::UnsupportedSize {
                required: 2,
                size: self.geometry.size(),
            });
        }
        Ok(())
    }

    fn check_cell(&self, pos: Position) -> Result<(), PuzzleError> {
        if self.geometry.contains(pos) {
            Ok(())
        } else {
            Err(PuzzleError::CellOutOfBounds {
                pos,
                size: self.geometry.size(),
            })
        }
    }

    fn check_region(&self, cells: &[Position]) -> Result<(), PuzzleError> {
        if cells.is_empty() {
            return Err(PuzzleError::EmptyConstraint);
        }
        for (i, &pos) in cells.iter().enumerate() {
            self.check_cell(pos)?;
            if cells[..i].contains(&pos) {
                return Err(PuzzleError::DuplicateCell { pos });
            }
        }
        Ok(())
    }

    fn require_size(&self, required: u8) -> Result<(), PuzzleError> {
        if self.geometry.size() == required {
            Ok(())
        } else {
            Err(PuzzleError::UnsupportedSize {
                required,
                size: self.geometry.size(),
            })
        }
    }
}
