//! Backtracking search.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use derive_more::IsVariant;
use log::{debug, trace};
use tinyvec::ArrayVec;
use varoku_core::{Grid, Position};

use crate::{
    Puzzle,
    propagator::{Probe, Propagation, Propagator},
    state::SearchState,
    validator,
};

/// A shared flag for cooperatively cancelling a running solve.
///
/// The solver checks the flag at the top of every search node; once raised,
/// it unwinds and returns [`Outcome::Interrupted`]. Cloning the flag shares
/// the underlying signal, so a controlling thread can keep one clone and
/// hand the other to [`SolveOptions`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a new, unraised flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag, asking the solver to stop at its next node.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if the flag has been raised.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Knobs for one solve run.
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Stop after this many guesses, returning [`Outcome::Interrupted`].
    /// `None` means unbounded.
    pub guess_budget: Option<u64>,
    /// Cooperative cancellation flag, checked at every search node.
    pub cancel: Option<CancelFlag>,
    /// Propagation depth; see [`Probe`].
    pub probe: Probe,
}

/// The final result of a solve.
///
/// Absence of a solution is an ordinary outcome, not an error: a puzzle that
/// constructs successfully can only ever produce one of these three values.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
pub enum Outcome {
    /// A complete grid satisfying every constraint. The first solution found
    /// wins; no further candidates are tried.
    Solved(Grid),
    /// The search space is exhausted: no assignment satisfies the puzzle.
    Unsatisfiable,
    /// The solve stopped early (budget spent or cancellation requested),
    /// so nothing is proven either way.
    Interrupted,
}

/// Counters describing how much work a solve did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Tentative assignments tried during search. Zero means propagation
    /// alone settled the puzzle.
    pub guesses: u64,
    /// Trail rewinds performed after failed branches.
    pub backtracks: u64,
    /// Deepest search stack reached.
    pub max_depth: usize,
}

/// One level of the search stack: a pivot cell and the candidate values
/// still to try there.
#[derive(Debug)]
struct Frame {
    pos: Position,
    values: ArrayVec<[u8; 32]>,
    next: usize,
    /// Trail mark of the attempt currently in flight, if any.
    active_mark: Option<usize>,
}

impl Frame {
    fn new(state: &SearchState, pos: Position) -> Self {
        let mut values = ArrayVec::new();
        for value in state.candidates().at(pos) {
            values.push(value);
        }
        Self {
            pos,
            values,
            next: 0,
            active_mark: None,
        }
    }
}

/// A backtracking solver over [`Puzzle`]s.
///
/// The solver drives everything: it propagates constraints to a fixed point
/// before every guess, picks the most constrained cell (fewest remaining
/// candidates, row-major on ties), tries its values in ascending order, and
/// rewinds the undo trail on failure. The search stack is explicit, so depth
/// is bounded by the number of cells and never by the call stack.
///
/// # Examples
///
/// ```
/// use varoku_solver::{Puzzle, Solver};
///
/// let puzzle = Puzzle::new(3, 3)?;
/// let (outcome, stats) = Solver::new().solve(&puzzle);
/// assert!(outcome.is_solved());
/// println!("solved with {} guesses", stats.guesses);
/// # Ok::<(), varoku_solver::PuzzleError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver {
    options: SolveOptions,
}

impl Solver {
    /// Creates a solver with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given options.
    #[must_use]
    pub fn with_options(options: SolveOptions) -> Self {
        Self { options }
    }

    /// Solves `puzzle`, returning the outcome and work counters.
    ///
    /// A [`Solved`](Outcome::Solved) outcome always carries a complete grid
    /// that passed the full complete-form constraint check; a partial grid
    /// is never returned.
    #[must_use]
    pub fn solve(&self, puzzle: &Puzzle) -> (Outcome, SolveStats) {
        let mut stats = SolveStats::default();
        let mut state = SearchState::from_puzzle(puzzle);
        let mut propagator = Propagator::new(self.options.probe);
        let constraints = puzzle.constraints();
        debug!(
            "solving {size}×{size} puzzle, {givens} givens, {constraints} constraints",
            size = puzzle.geometry().size(),
            givens = puzzle.givens().filled_count(),
            constraints = constraints.len(),
        );

        if propagator.run(&mut state, constraints) == Propagation::Contradiction {
            debug!("root propagation found a contradiction");
            return (Outcome::Unsatisfiable, stats);
        }
        let Some(pivot) = pick_pivot(&state) else {
            // propagation alone filled the grid
            let outcome = if validator::is_solution(state.grid(), constraints) {
                Outcome::Solved(state.grid().clone())
            } else {
                Outcome::Unsatisfiable
            };
            return (outcome, stats);
        };

        let mut stack = vec![Frame::new(&state, pivot)];
        stats.max_depth = 1;

        loop {
            if self.should_stop(&stats) {
                debug!("solve interrupted after {} guesses", stats.guesses);
                return (Outcome::Interrupted, stats);
            }
            let Some(frame) = stack.last_mut() else {
                // every value of the root pivot failed; nothing is left
                debug!("search exhausted after {} guesses", stats.guesses);
                return (Outcome::Unsatisfiable, stats);
            };
            if let Some(mark) = frame.active_mark.take() {
                state.rewind(mark);
                stats.backtracks += 1;
            }
            let Some(&value) = frame.values.get(frame.next) else {
                trace!("pivot {} exhausted, backtracking", frame.pos);
                stack.pop();
                continue;
            };
            frame.next += 1;
            frame.active_mark = Some(state.mark());
            let pos = frame.pos;
            state.assign(pos, value);
            stats.guesses += 1;
            trace!("guess {value} at {pos} (depth {})", stack.len());

            match propagator.run(&mut state, constraints) {
                Propagation::Contradiction => {
                    // next iteration rewinds and tries the pivot's next value
                }
                Propagation::Consistent { .. } => match pick_pivot(&state) {
                    None => {
                        // the complete-form check is the final word; a full
                        // grid that fails it is just another dead branch
                        if validator::is_solution(state.grid(), constraints) {
                            debug!(
                                "solved with {} guesses, {} backtracks",
                                stats.guesses, stats.backtracks
                            );
                            return (Outcome::Solved(state.grid().clone()), stats);
                        }
                    }
                    Some(pivot) => {
                        stack.push(Frame::new(&state, pivot));
                        stats.max_depth = stats.max_depth.max(stack.len());
                    }
                },
            }
        }
    }

    fn should_stop(&self, stats: &SolveStats) -> bool {
        if let Some(budget) = self.options.guess_budget {
            if stats.guesses >= budget {
                return true;
            }
        }
        self.options
            .cancel
            .as_ref()
            .is_some_and(CancelFlag::is_cancelled)
    }
}

/// Picks the unassigned cell with the fewest remaining candidates, breaking
/// ties by row-major order. Returns `None` when every cell is assigned.
///
/// On consistent post-propagation states every unassigned cell has at least
/// two candidates (one would have been assigned as a naked single, zero
/// would have been a contradiction).
fn pick_pivot(state: &SearchState) -> Option<Position> {
    let mut best: Option<(u8, Position)> = None;
    for pos in state.geometry().positions() {
        if state.grid().get(pos).is_some() {
            continue;
        }
        let len = state.candidates().at(pos).len();
        debug_assert!(len >= 2, "unassigned cell {pos} should have ≥2 candidates");
        if best.is_none_or(|(best_len, _)| len < best_len) {
            best = Some((len, pos));
            if len == 2 {
                break; // can't do better
            }
        }
    }
    best.map(|(_, pos)| pos)
}

#[cfg(test)]
mod tests {
    use varoku_core::{Geometry, ValueSet};

    use super::*;

    fn solve(puzzle: &Puzzle) -> (Outcome, SolveStats) {
        Solver::new().solve(puzzle)
    }

    fn assert_classic_solution(puzzle: &Puzzle, grid: &Grid) {
        let geometry = puzzle.geometry();
        let size = geometry.size();
        let all = ValueSet::full(size);
        for i in 0..size {
            assert_eq!(grid.values_of(&geometry.row_positions(i)), all);
            assert_eq!(grid.values_of(&geometry.column_positions(i)), all);
            assert_eq!(grid.values_of(&geometry.block_positions(i)), all);
        }
        for (pos, value) in puzzle.givens().assigned() {
            assert_eq!(grid.get(pos), Some(value), "given at {pos} not preserved");
        }
    }

    #[test]
    fn test_solves_empty_grids_of_all_sizes() {
        for (rows, cols) in [(1, 1), (2, 2), (2, 3), (3, 3)] {
            let puzzle = Puzzle::new(rows, cols).unwrap();
            let (outcome, _) = solve(&puzzle);
            let Outcome::Solved(grid) = outcome else {
                panic!("empty {rows}×{cols}-block puzzle must be solvable");
            };
            assert_classic_solution(&puzzle, &grid);
        }
    }

    /// A well-known puzzle with a unique solution.
    fn classic_puzzle() -> Puzzle {
        let mut puzzle = Puzzle::new(3, 3).unwrap();
        let givens = Grid::parse(
            puzzle.geometry(),
            "
            5 3 _ _ 7 _ _ _ _
            6 _ _ 1 9 5 _ _ _
            _ 9 8 _ _ _ _ 6 _
            8 _ _ _ 6 _ _ _ 3
            4 _ _ 8 _ 3 _ _ 1
            7 _ _ _ 2 _ _ _ 6
            _ 6 _ _ _ _ 2 8 _
            _ _ _ 4 1 9 _ _ 5
            _ _ _ _ 8 _ _ 7 9
            ",
        )
        .unwrap();
        puzzle.set_givens(givens).unwrap();
        puzzle
    }

    #[test]
    fn test_solves_a_classic_9x9() {
        let puzzle = classic_puzzle();
        let (outcome, _) = solve(&puzzle);
        let Outcome::Solved(grid) = outcome else {
            panic!("expected a solution");
        };
        assert_classic_solution(&puzzle, &grid);
        // this well-known puzzle's top row
        assert_eq!(
            (0..9).map(|x| grid.get(Position::new(x, 0)).unwrap()).collect::<Vec<_>>(),
            vec![5, 3, 4, 6, 7, 8, 9, 1, 2]
        );
    }

    #[test]
    fn test_complete_grid_round_trips_with_zero_guesses() {
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        let solved = Grid::parse(
            puzzle.geometry(),
            "
            1 2 3 4
            3 4 1 2
            2 1 4 3
            4 3 2 1
            ",
        )
        .unwrap();
        puzzle.set_givens(solved.clone()).unwrap();

        let (outcome, stats) = solve(&puzzle);
        assert_eq!(outcome, Outcome::Solved(solved));
        assert_eq!(stats.guesses, 0);
        assert_eq!(stats.backtracks, 0);
    }

    #[test]
    fn test_unsatisfiable_givens() {
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        puzzle.set_given(Position::new(0, 0), 1).unwrap();
        puzzle.set_given(Position::new(3, 0), 1).unwrap();

        let (outcome, stats) = solve(&puzzle);
        assert_eq!(outcome, Outcome::Unsatisfiable);
        // rejected by propagation, not by search
        assert_eq!(stats.guesses, 0);
    }

    #[test]
    fn test_greater_than_cycle_is_unsatisfiable_without_search() {
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        let a = Position::new(0, 0);
        let b = Position::new(1, 0);
        puzzle.add_greater_than(a, b).unwrap();
        puzzle.add_greater_than(b, a).unwrap();

        let (outcome, stats) = solve(&puzzle);
        assert_eq!(outcome, Outcome::Unsatisfiable);
        assert_eq!(stats.guesses, 0);
    }

    #[test]
    fn test_cage_forces_pair() {
        // every solution of this puzzle puts {1, 2} in the cage, in one
        // order or the other
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        let cage = [Position::new(0, 0), Position::new(1, 0)];
        puzzle.add_cage(cage.to_vec(), 3).unwrap();

        let (outcome, _) = solve(&puzzle);
        let Outcome::Solved(grid) = outcome else {
            panic!("expected a solution");
        };
        assert_eq!(grid.values_of(&cage), ValueSet::from_iter([1, 2]));
    }

    #[test]
    fn test_greater_than_chain() {
        // column 0 of a 4×4 forced into strictly decreasing order
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        for y in 0..3 {
            puzzle
                .add_greater_than(Position::new(0, y), Position::new(0, y + 1))
                .unwrap();
        }

        let (outcome, _) = solve(&puzzle);
        let Outcome::Solved(grid) = outcome else {
            panic!("expected a solution");
        };
        let column: Vec<_> = (0..4)
            .map(|y| grid.get(Position::new(0, y)).unwrap())
            .collect();
        assert_eq!(column, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_sandwich_zero_forces_adjacent_crusts() {
        // row 0 is fixed except for {1, 5, 9} in the middle; the zero
        // sandwich sum rules out every arrangement separating 1 and 9
        let mut puzzle = Puzzle::new(3, 3).unwrap();
        for (x, value) in [(0, 2), (1, 3), (2, 4), (6, 6), (7, 7), (8, 8)] {
            puzzle.set_given(Position::new(x, 0), value).unwrap();
        }
        puzzle.add_sandwich_row(0, 0).unwrap();

        let (outcome, _) = solve(&puzzle);
        let Outcome::Solved(grid) = outcome else {
            panic!("expected a solution");
        };
        let row: Vec<_> = (0..9)
            .map(|x| grid.get(Position::new(x, 0)).unwrap())
            .collect();
        let one = row.iter().position(|&v| v == 1).unwrap();
        let nine = row.iter().position(|&v| v == 9).unwrap();
        assert_eq!(one.abs_diff(nine), 1, "1 and 9 must be adjacent: {row:?}");
    }

    #[test]
    fn test_diagonal_puzzle_solution_respects_diagonals() {
        let mut puzzle = Puzzle::new(3, 3).unwrap();
        puzzle.add_diagonals();

        let (outcome, _) = solve(&puzzle);
        let Outcome::Solved(grid) = outcome else {
            panic!("expected a solution");
        };
        let geometry = puzzle.geometry();
        let main: Vec<_> = (0..9).map(|i| Position::new(i, i)).collect();
        let anti: Vec<_> = (0..9).map(|i| Position::new(8 - i, i)).collect();
        assert_eq!(grid.values_of(&main), ValueSet::full(geometry.size()));
        assert_eq!(grid.values_of(&anti), ValueSet::full(geometry.size()));
    }

    #[test]
    fn test_hyper_regions_hold_in_solutions() {
        let mut puzzle = Puzzle::new(3, 3).unwrap();
        puzzle.add_hyper_regions().unwrap();

        let (outcome, _) = solve(&puzzle);
        let Outcome::Solved(grid) = outcome else {
            panic!("expected a solution");
        };
        assert!(puzzle.constraints().is_satisfied_all(&grid));
    }

    #[test]
    fn test_pyramid_regions_hold_in_solutions() {
        let mut puzzle = Puzzle::new(3, 3).unwrap();
        puzzle.add_pyramids().unwrap();

        let (outcome, _) = solve(&puzzle);
        let Outcome::Solved(grid) = outcome else {
            panic!("expected a solution");
        };
        assert!(puzzle.constraints().is_satisfied_all(&grid));
    }

    #[test]
    fn test_guess_budget_interrupts() {
        let puzzle = Puzzle::new(3, 3).unwrap();
        let solver = Solver::with_options(SolveOptions {
            guess_budget: Some(0),
            ..SolveOptions::default()
        });

        let (outcome, stats) = solver.solve(&puzzle);
        // an empty 9×9 needs at least one guess, so the zero budget trips
        assert_eq!(outcome, Outcome::Interrupted);
        assert_eq!(stats.guesses, 0);
    }

    #[test]
    fn test_cancel_flag_interrupts() {
        let flag = CancelFlag::new();
        flag.cancel();
        let solver = Solver::with_options(SolveOptions {
            cancel: Some(flag),
            ..SolveOptions::default()
        });

        let (outcome, _) = solver.solve(&Puzzle::new(3, 3).unwrap());
        assert_eq!(outcome, Outcome::Interrupted);
    }

    #[test]
    fn test_root_contradiction_beats_the_budget() {
        // a puzzle refuted by propagation alone proves Unsatisfiable even
        // under a zero guess budget; Interrupted is only for searches that
        // were cut off with work left to do
        let mut puzzle = Puzzle::new(3, 3).unwrap();
        puzzle
            .add_cage(vec![Position::new(7, 7), Position::new(8, 7)], 3)
            .unwrap();
        puzzle.set_given(Position::new(7, 7), 4).unwrap();

        let budgeted = Solver::with_options(SolveOptions {
            guess_budget: Some(0),
            ..SolveOptions::default()
        });
        let (outcome, stats) = budgeted.solve(&puzzle);
        assert_eq!(outcome, Outcome::Unsatisfiable);
        assert_eq!(stats.guesses, 0);
    }

    #[test]
    fn test_solve_with_probe_enabled_matches_plain_solve() {
        // the puzzle's solution is unique, so both configurations must
        // deliver the same grid; probing just needs fewer guesses to get
        // there
        let puzzle = classic_puzzle();

        let (plain, plain_stats) = Solver::new().solve(&puzzle);
        let probing = Solver::with_options(SolveOptions {
            probe: Probe::OnStall,
            ..SolveOptions::default()
        });
        let (probed, probed_stats) = probing.solve(&puzzle);

        assert!(plain.is_solved());
        assert_eq!(plain, probed);
        assert!(probed_stats.guesses <= plain_stats.guesses);
    }

    #[test]
    fn test_killer_puzzle_with_full_cage_cover() {
        // a 4×4 killer layout: disjoint cages covering the grid, with sums
        // taken from a known solution
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        let cages: [(&[(u8, u8)], u32); 6] = [
            (&[(0, 0), (1, 0)], 3),
            (&[(2, 0), (3, 0), (3, 1)], 9),
            (&[(0, 1), (0, 2)], 5),
            (&[(1, 1), (2, 1)], 5),
            (&[(1, 2), (2, 2), (3, 2)], 8),
            (&[(0, 3), (1, 3), (2, 3), (3, 3)], 10),
        ];
        for (cells, sum) in cages {
            let cells = cells.iter().map(|&(x, y)| Position::new(x, y)).collect();
            puzzle.add_cage(cells, sum).unwrap();
        }

        let (outcome, _) = solve(&puzzle);
        let Outcome::Solved(grid) = outcome else {
            panic!("expected a solution");
        };
        assert!(puzzle.constraints().is_satisfied_all(&grid));
    }

    #[test]
    fn test_candidate_monotonicity_within_a_branch() {
        // after the root fixed point, a tentative assignment plus another
        // fixed point may only shrink candidate sets
        let mut puzzle = Puzzle::new(3, 3).unwrap();
        puzzle.set_given(Position::new(0, 0), 5).unwrap();
        let mut state = SearchState::from_puzzle(&puzzle);
        let mut propagator = Propagator::new(Probe::Off);
        assert!(propagator.run(&mut state, puzzle.constraints()).is_consistent());

        let geometry: Geometry = puzzle.geometry();
        let before: Vec<ValueSet> = geometry
            .positions()
            .map(|pos| state.candidates().at(pos))
            .collect();

        let pivot = pick_pivot(&state).unwrap();
        let value = state.candidates().at(pivot).min().unwrap();
        state.assign(pivot, value);
        let _ = propagator.run(&mut state, puzzle.constraints());

        for (pos, &old) in geometry.positions().zip(&before) {
            let new = state.candidates().at(pos);
            assert_eq!(
                new.difference(old),
                ValueSet::EMPTY,
                "candidates grew at {pos}"
            );
        }
    }
}
