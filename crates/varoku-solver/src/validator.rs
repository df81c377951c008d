//! Grid validity checks.
//!
//! Two checks with deliberately different strength:
//!
//! - [`is_valid`] is the cheap incremental check used after every mutation
//!   during search. It rejects states that are already dead (a cell with no
//!   candidates, or a constraint that cannot be repaired) but may accept
//!   states that deeper analysis would refute.
//! - [`is_solution`] is the final complete-form check: every cell filled and
//!   every constraint satisfied exactly. Sum and ordering rules are only
//!   fully decidable here, which is why a separate final check exists at
//!   all.

use varoku_core::{CandidateGrid, Grid};

use crate::constraint::ConstraintSet;

/// Returns `true` if the state can still lead to a solution as far as the
/// incremental checks can tell: no cell has an empty candidate set and every
/// constraint reports a consistent state.
#[must_use]
pub fn is_valid(grid: &Grid, candidates: &CandidateGrid, constraints: &ConstraintSet) -> bool {
    candidates.first_contradiction().is_none() && constraints.is_consistent_all(grid, candidates)
}

/// Returns `true` if `grid` is a complete solution: every cell assigned and
/// every constraint satisfied in its exact, complete form.
#[must_use]
pub fn is_solution(grid: &Grid, constraints: &ConstraintSet) -> bool {
    grid.is_complete() && constraints.is_satisfied_all(grid)
}
