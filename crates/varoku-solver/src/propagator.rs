//! Fixed-point constraint propagation.

use derive_more::IsVariant;

use crate::{
    constraint::{ConstraintSet, Elimination},
    state::SearchState,
    validator,
};

/// How far propagation goes beyond direct constraint pruning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Probe {
    /// Direct pruning and naked singles only.
    #[default]
    Off,
    /// When direct pruning stalls, trial-assign each remaining candidate in
    /// a disposable fork, propagate it to a fixed point, and eliminate the
    /// candidate if the fork is contradictory (one-step forward checking).
    ///
    /// Much more expensive per pass; worth it for puzzles whose constraints
    /// (cages, sandwich sums) are too weak to prune directly.
    OnStall,
}

/// The result of propagating a state to its fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub(crate) enum Propagation {
    /// The state reached a fixed point without contradiction; `changed`
    /// reports whether any candidate or assignment changed on the way.
    Consistent {
        /// Whether this run changed the state at all.
        changed: bool,
    },
    /// The state is dead: some cell lost every candidate, or a constraint
    /// became unsatisfiable. An expected signal, not an error; the search
    /// engine answers it by backtracking.
    Contradiction,
}

/// Saturates a [`SearchState`] with constraint-driven deductions.
///
/// Each pass asks every constraint for its eliminations, applies them, and
/// assigns every naked single (an empty cell whose candidates collapsed to
/// one value). Passes repeat until one of them changes nothing. The state is
/// checked for contradictions after every pass, so dead branches fail fast
/// instead of at the leaves.
#[derive(Debug, Clone, Default)]
pub(crate) struct Propagator {
    probe: Probe,
    buf: Vec<Elimination>,
}

impl Propagator {
    pub(crate) fn new(probe: Probe) -> Self {
        Self {
            probe,
            buf: Vec::new(),
        }
    }

    /// Runs pruning (and probing, if enabled) to a fixed point.
    pub(crate) fn run(
        &mut self,
        state: &mut SearchState,
        constraints: &ConstraintSet,
    ) -> Propagation {
        let mut changed_any = false;
        loop {
            let changed = self.pass(state, constraints);
            changed_any |= changed;
            if !validator::is_valid(state.grid(), state.candidates(), constraints) {
                return Propagation::Contradiction;
            }
            if changed {
                continue;
            }
            if self.probe == Probe::OnStall
                && !state.is_complete()
                && self.probe_pass(state, constraints)
            {
                changed_any = true;
                continue;
            }
            return Propagation::Consistent {
                changed: changed_any,
            };
        }
    }

    /// One round of direct pruning plus naked-single assignment. Returns
    /// whether anything changed.
    fn pass(&mut self, state: &mut SearchState, constraints: &ConstraintSet) -> bool {
        self.buf.clear();
        constraints.prune_all(state.grid(), state.candidates(), &mut self.buf);
        let mut changed = false;
        for elimination in self.buf.drain(..) {
            changed |= state.eliminate(elimination.pos, elimination.value);
        }
        for pos in state.geometry().positions() {
            if state.grid().get(pos).is_none() {
                if let Some(value) = state.candidates().at(pos).single() {
                    state.assign(pos, value);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Forward-checking sweep: each surviving candidate is tried in a fork;
    /// candidates whose fork dies are eliminated from the real state.
    /// Returns whether anything was eliminated.
    fn probe_pass(&mut self, state: &mut SearchState, constraints: &ConstraintSet) -> bool {
        let mut changed = false;
        for pos in state.geometry().positions() {
            if state.grid().get(pos).is_some() {
                continue;
            }
            for value in state.candidates().at(pos) {
                let mut fork = state.fork();
                fork.assign(pos, value);
                let mut inner = Propagator::new(Probe::Off);
                if inner.run(&mut fork, constraints).is_contradiction() {
                    changed |= state.eliminate(pos, value);
                }
            }
        }
        changed
    }
}
