//! Test utilities for constraint propagation.
//!
//! [`PropagationTester`] builds the root state of a puzzle, runs the
//! propagator over it, and offers chained assertions about the result. All
//! assertion methods panic with detailed messages on failure and use
//! `#[track_caller]` so failures point at the test, not the harness.

use varoku_core::{Position, ValueSet};

use crate::{
    Puzzle,
    propagator::{Probe, Propagation, Propagator},
    state::SearchState,
};

/// A fluent harness asserting on the outcome of propagation.
pub(crate) struct PropagationTester {
    state: SearchState,
    outcome: Propagation,
}

impl PropagationTester {
    /// Propagates the puzzle's root state to a fixed point with direct
    /// pruning only.
    pub(crate) fn propagate(puzzle: &Puzzle) -> Self {
        Self::propagate_with(puzzle, Probe::Off)
    }

    /// Propagates the puzzle's root state to a fixed point with the given
    /// probe setting.
    pub(crate) fn propagate_with(puzzle: &Puzzle, probe: Probe) -> Self {
        let mut state = SearchState::from_puzzle(puzzle);
        let outcome = Propagator::new(probe).run(&mut state, puzzle.constraints());
        Self { state, outcome }
    }

    /// Asserts propagation ended at a consistent fixed point.
    #[track_caller]
    pub(crate) fn assert_consistent(self) -> Self {
        assert!(
            self.outcome.is_consistent(),
            "expected a consistent fixed point, got {:?}",
            self.outcome
        );
        self
    }

    /// Asserts propagation found a contradiction.
    #[track_caller]
    pub(crate) fn assert_contradiction(self) -> Self {
        assert!(
            self.outcome.is_contradiction(),
            "expected a contradiction, got {:?}",
            self.outcome
        );
        self
    }

    /// Asserts the cell at `pos` was assigned `value` by propagation.
    #[track_caller]
    pub(crate) fn assert_assigned(self, pos: Position, value: u8) -> Self {
        let actual = self.state.grid().get(pos);
        assert_eq!(
            actual,
            Some(value),
            "expected {value} assigned at {pos}, grid holds {actual:?}"
        );
        self
    }

    /// Asserts the cell at `pos` is still unassigned.
    #[track_caller]
    pub(crate) fn assert_unassigned(self, pos: Position) -> Self {
        let actual = self.state.grid().get(pos);
        assert_eq!(actual, None, "expected {pos} unassigned, grid holds {actual:?}");
        self
    }

    /// Asserts the candidates at `pos` are exactly `values`.
    #[track_caller]
    pub(crate) fn assert_candidates<I>(self, pos: Position, values: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let expected = ValueSet::from_iter(values);
        let actual = self.state.candidates().at(pos);
        assert_eq!(
            actual, expected,
            "expected candidates {expected:?} at {pos}, found {actual:?}"
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertions_pass_on_matching_state() {
        let mut puzzle = Puzzle::new(2, 2).unwrap();
        puzzle.set_given(Position::new(0, 0), 1).unwrap();

        PropagationTester::propagate(&puzzle)
            .assert_consistent()
            .assert_assigned(Position::new(0, 0), 1)
            .assert_unassigned(Position::new(3, 3))
            // row, column, and block eliminations all hit (1, 1)
            .assert_candidates(Position::new(1, 1), [2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "expected a contradiction")]
    fn test_assert_contradiction_fails_on_consistent_state() {
        let puzzle = Puzzle::new(2, 2).unwrap();
        let _ = PropagationTester::propagate(&puzzle).assert_contradiction();
    }

    #[test]
    #[should_panic(expected = "expected candidates")]
    fn test_assert_candidates_fails_on_mismatch() {
        let puzzle = Puzzle::new(2, 2).unwrap();
        let _ = PropagationTester::propagate(&puzzle)
            .assert_candidates(Position::new(0, 0), [1, 2]);
    }
}
