//! Constraint-propagation and backtracking-search engine for Sudoku
//! variants.
//!
//! The engine takes a fully specified [`Puzzle`] (block dimensions, givens,
//! and a list of constraints) and either produces a complete grid or proves
//! that none exists. Classic rows, columns, and blocks are always enforced;
//! variant rules (killer cages, diagonals, hyper and pyramid regions,
//! greater-than pairs, sandwich sums) are added per puzzle. All of them are
//! plain values of one [`Constraint`](constraint::Constraint) type, so a new
//! variant is a new constraint, not a new solver.
//!
//! Solving interleaves two mechanisms:
//!
//! 1. **Propagation** saturates the grid with deductions: every constraint
//!    eliminates impossible candidates, cells whose candidates collapse to
//!    one value are assigned, and the cycle repeats to a fixed point.
//! 2. **Search** guesses where propagation stalls: it picks the cell with
//!    the fewest remaining candidates, tries each value in ascending order,
//!    and rewinds an undo trail when a branch dies.
//!
//! # Examples
//!
//! ```
//! use varoku_core::Position;
//! use varoku_solver::{Outcome, Puzzle, Solver};
//!
//! // An X-Sudoku with one killer cage.
//! let mut puzzle = Puzzle::new(3, 3)?;
//! puzzle.add_diagonals();
//! puzzle.add_cage(vec![Position::new(0, 0), Position::new(1, 0)], 9)?;
//!
//! let (outcome, stats) = Solver::new().solve(&puzzle);
//! match outcome {
//!     Outcome::Solved(grid) => println!("{grid}\n({} guesses)", stats.guesses),
//!     Outcome::Unsatisfiable => println!("no solution exists"),
//!     Outcome::Interrupted => println!("stopped early"),
//! }
//! # Ok::<(), varoku_solver::PuzzleError>(())
//! ```

pub use self::{propagator::Probe, puzzle::*, solver::*, validator::*};

pub mod constraint;
mod propagator;
mod puzzle;
mod solver;
mod state;
mod validator;

#[cfg(test)]
mod testing;
