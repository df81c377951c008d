//! Puzzle constraints.
//!
//! Every rule of a puzzle, classic or variant, is one [`Constraint`]. A
//! constraint can do two things:
//!
//! 1. **Prune**: inspect the current grid and candidates and report candidate
//!    values that are now impossible ([`Constraint::prune`]).
//! 2. **Check**: decide whether the current state is still satisfiable
//!    ([`Constraint::is_consistent`]) and, once the grid is complete, whether
//!    it is actually satisfied ([`Constraint::is_satisfied`]).
//!
//! The consistency check is incremental and may accept states a deeper
//! analysis would reject; the satisfaction check is exact but only meaningful
//! on a complete grid. Sum and ordering rules need this split because their
//! truth is only decidable once the relevant cells are filled.
//!
//! Adding a new puzzle variant means adding a new constraint variant here,
//! not a new puzzle type: a puzzle is just a [`ConstraintSet`] over one grid.

use derive_more::From;
use varoku_core::{CandidateGrid, Grid, Position};

pub use self::{
    cage::CageConstraint, line::LineConstraint, order::GreaterThanConstraint,
    sandwich::SandwichConstraint,
};

mod cage;
mod line;
mod order;
mod sandwich;

/// A single candidate elimination produced by pruning: `value` cannot be
/// placed at `pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elimination {
    /// The affected cell.
    pub pos: Position,
    /// The value to remove from that cell's candidates.
    pub value: u8,
}

impl Elimination {
    /// Creates an elimination of `value` at `pos`.
    #[must_use]
    pub const fn new(pos: Position, value: u8) -> Self {
        Self { pos, value }
    }
}

/// One rule of a puzzle.
///
/// The variants cover the whole Sudoku family handled by this engine:
///
/// - [`Line`](Self::Line): all-different over a cell list. Rows, columns,
///   and blocks are lines, and so are diagonals, hyper regions, and pyramid
///   regions.
/// - [`Cage`](Self::Cage): a killer cage, all-different cells summing to a
///   target.
/// - [`GreaterThan`](Self::GreaterThan): an ordered pair of adjacent cells.
/// - [`Sandwich`](Self::Sandwich): the values strictly between 1 and N on a
///   line sum to a target.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Constraint {
    /// All-different over a list of cells.
    Line(LineConstraint),
    /// All-different cells with a target sum.
    Cage(CageConstraint),
    /// One cell strictly greater than another.
    GreaterThan(GreaterThanConstraint),
    /// Sum of the values sandwiched between 1 and N on a line.
    Sandwich(SandwichConstraint),
}

impl Constraint {
    /// Collects candidate eliminations this constraint can justify in the
    /// current state, appending them to `out`.
    ///
    /// Pruning never mutates anything itself; the caller applies the
    /// eliminations so it can record them for undo.
    pub fn prune(&self, grid: &Grid, candidates: &CandidateGrid, out: &mut Vec<Elimination>) {
        match self {
            Self::Line(line) => line.prune(grid, candidates, out),
            Self::Cage(cage) => cage.prune(grid, candidates, out),
            Self::GreaterThan(pair) => pair.prune(grid, candidates, out),
            Self::Sandwich(sandwich) => sandwich.prune(grid, candidates, out),
        }
    }

    /// Returns `false` if the current state already violates this
    /// constraint beyond repair.
    ///
    /// This is the cheap incremental check run after every mutation. A
    /// `true` result is not a guarantee of satisfiability.
    #[must_use]
    pub fn is_consistent(&self, grid: &Grid, candidates: &CandidateGrid) -> bool {
        match self {
            Self::Line(line) => line.is_consistent(grid, candidates),
            Self::Cage(cage) => cage.is_consistent(grid, candidates),
            Self::GreaterThan(pair) => pair.is_consistent(grid, candidates),
            Self::Sandwich(sandwich) => sandwich.is_consistent(grid, candidates),
        }
    }

    /// Returns `true` if a complete grid satisfies this constraint exactly.
    ///
    /// Unlike [`is_consistent`](Self::is_consistent) this is a final,
    /// complete-form check; calling it on a partial grid returns `false`
    /// whenever a cell it governs is still empty.
    #[must_use]
    pub fn is_satisfied(&self, grid: &Grid) -> bool {
        match self {
            Self::Line(line) => line.is_satisfied(grid),
            Self::Cage(cage) => cage.is_satisfied(grid),
            Self::GreaterThan(pair) => pair.is_satisfied(grid),
            Self::Sandwich(sandwich) => sandwich.is_satisfied(grid),
        }
    }
}

/// The ordered collection of every constraint of a puzzle.
///
/// Iteration order does not affect which fixed point propagation reaches,
/// only how quickly it gets there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Creates an empty constraint set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    /// Appends a constraint.
    pub fn push(&mut self, constraint: impl Into<Constraint>) {
        self.constraints.push(constraint.into());
    }

    /// Returns the number of constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if the set holds no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Returns an iterator over the constraints.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Runs every constraint's [`prune`](Constraint::prune) once, appending
    /// all eliminations to `out`.
    ///
    /// An empty result means pruning has reached a fixed point.
    pub fn prune_all(&self, grid: &Grid, candidates: &CandidateGrid, out: &mut Vec<Elimination>) {
        for constraint in &self.constraints {
            constraint.prune(grid, candidates, out);
        }
    }

    /// Returns `true` if every constraint reports a consistent state.
    ///
    /// Short-circuits on the first violation.
    #[must_use]
    pub fn is_consistent_all(&self, grid: &Grid, candidates: &CandidateGrid) -> bool {
        self.constraints
            .iter()
            .all(|constraint| constraint.is_consistent(grid, candidates))
    }

    /// Returns `true` if a complete grid satisfies every constraint.
    #[must_use]
    pub fn is_satisfied_all(&self, grid: &Grid) -> bool {
        self.constraints
            .iter()
            .all(|constraint| constraint.is_satisfied(grid))
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}
