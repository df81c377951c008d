//! Live solver state with an undo trail.

use varoku_core::{CandidateGrid, Geometry, Grid, Position};

use crate::Puzzle;

/// One recorded mutation, replayed in reverse to restore a prior state.
#[derive(Debug, Clone, Copy)]
enum TrailEntry {
    /// `value` was removed from the candidates at `pos`.
    Eliminated { pos: Position, value: u8 },
    /// The grid cell at `pos` was assigned.
    Assigned { pos: Position },
}

/// The live state of one solve: the grid, its candidate sets, and the trail
/// of every speculative mutation.
///
/// All speculative work goes through [`assign`](Self::assign) and
/// [`eliminate`](Self::eliminate), which log each change. Backtracking calls
/// [`rewind`](Self::rewind) with a [`mark`](Self::mark) taken earlier, which
/// replays the trail in reverse, re-adding removed candidate bits and
/// clearing assignments. Candidate sets therefore only ever shrink between a
/// mark and its rewind, and rewinding restores the exact prior state without
/// copying either grid.
#[derive(Debug, Clone)]
pub(crate) struct SearchState {
    grid: Grid,
    candidates: CandidateGrid,
    trail: Vec<TrailEntry>,
}

impl SearchState {
    /// Builds the root state of a puzzle: givens applied, no trail.
    ///
    /// Givens are part of the base state, not speculative work, so they are
    /// below every mark and survive every rewind.
    pub(crate) fn from_puzzle(puzzle: &Puzzle) -> Self {
        let grid = puzzle.givens().clone();
        let candidates = CandidateGrid::from_grid(&grid);
        Self {
            grid,
            candidates,
            trail: Vec::new(),
        }
    }

    pub(crate) fn geometry(&self) -> Geometry {
        self.grid.geometry()
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn candidates(&self) -> &CandidateGrid {
        &self.candidates
    }

    /// Removes `value` from the candidates at `pos`, logging the change.
    /// Returns `true` if the set changed.
    pub(crate) fn eliminate(&mut self, pos: Position, value: u8) -> bool {
        if self.candidates.remove(pos, value) {
            self.trail.push(TrailEntry::Eliminated { pos, value });
            true
        } else {
            false
        }
    }

    /// Assigns `value` to the empty cell at `pos`, collapsing its candidates
    /// to the singleton and logging everything.
    pub(crate) fn assign(&mut self, pos: Position, value: u8) {
        debug_assert!(self.grid.get(pos).is_none(), "cell {pos} assigned twice");
        self.grid.set(pos, value);
        self.trail.push(TrailEntry::Assigned { pos });
        for candidate in self.candidates.at(pos) {
            if candidate != value {
                self.eliminate(pos, candidate);
            }
        }
    }

    /// Returns a marker for the current trail depth.
    pub(crate) fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Undoes every mutation logged since `mark`.
    pub(crate) fn rewind(&mut self, mark: usize) {
        for entry in self.trail.drain(mark..).rev() {
            match entry {
                TrailEntry::Eliminated { pos, value } => {
                    self.candidates.insert(pos, value);
                }
                TrailEntry::Assigned { pos } => {
                    self.grid.clear(pos);
                }
            }
        }
    }

    /// Clones the grids into an independent state with a fresh trail.
    ///
    /// Used for disposable trial states (forward-checking probes); changes
    /// to the fork never touch this state.
    pub(crate) fn fork(&self) -> Self {
        Self {
            grid: self.grid.clone(),
            candidates: self.candidates.clone(),
            trail: Vec::new(),
        }
    }

    /// Returns `true` if every cell is assigned.
    pub(crate) fn is_complete(&self) -> bool {
        self.grid.is_complete()
    }
}
