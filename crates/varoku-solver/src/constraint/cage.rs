//! Killer-Sudoku cage constraints.

use varoku_core::{CandidateGrid, Grid, Position, ValueSet};

use super::Elimination;

/// A killer cage: a group of cells whose values are all different and sum to
/// a target.
///
/// Partial grids are checked by searching for *any* assignment of distinct
/// values, drawn from the empty cells' candidates, that completes the cage to
/// its target. A candidate that appears in no such completion is pruned. A
/// single-cell cage therefore pins its cell straight to the target value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CageConstraint {
    cells: Vec<Position>,
    sum: u32,
}

impl CageConstraint {
    /// Creates a cage over `cells` with target `sum`.
    #[must_use]
    pub fn new(cells: Vec<Position>, sum: u32) -> Self {
        Self { cells, sum }
    }

    /// Returns the cells this cage governs.
    #[must_use]
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Returns the target sum.
    #[must_use]
    pub const fn sum(&self) -> u32 {
        self.sum
    }

    /// Splits the cage into its assigned part (as a value set and its sum)
    /// and the positions still empty. Returns `None` when a value repeats.
    fn split(&self, grid: &Grid) -> Option<(ValueSet, u32, Vec<Position>)> {
        let mut used = ValueSet::EMPTY;
        let mut assigned_sum = 0;
        let mut empty = Vec::new();
        for &pos in &self.cells {
            match grid.get(pos) {
                Some(value) => {
                    if !used.insert(value) {
                        return None;
                    }
                    assigned_sum += u32::from(value);
                }
                None => empty.push(pos),
            }
        }
        Some((used, assigned_sum, empty))
    }

    /// Eliminates candidates that appear in no completion of the cage.
    pub(super) fn prune(
        &self,
        grid: &Grid,
        candidates: &CandidateGrid,
        out: &mut Vec<Elimination>,
    ) {
        let Some((used, assigned_sum, empty)) = self.split(grid) else {
            return; // repeat value; the consistency check rejects this state
        };
        let Some(remaining) = self.sum.checked_sub(assigned_sum) else {
            return; // already over the target; likewise rejected
        };
        for (i, &pos) in empty.iter().enumerate() {
            let mut others: Vec<ValueSet> = Vec::with_capacity(empty.len() - 1);
            others.extend(
                empty
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &other)| candidates.at(other)),
            );
            for value in candidates.at(pos) {
                let mut used_with = used;
                if !used_with.insert(value) {
                    out.push(Elimination::new(pos, value));
                    continue;
                }
                match remaining.checked_sub(u32::from(value)) {
                    Some(rest) if completion_exists(&others, used_with, rest) => {}
                    _ => out.push(Elimination::new(pos, value)),
                }
            }
        }
    }

    pub(super) fn is_consistent(&self, grid: &Grid, candidates: &CandidateGrid) -> bool {
        let Some((used, assigned_sum, empty)) = self.split(grid) else {
            return false;
        };
        let Some(remaining) = self.sum.checked_sub(assigned_sum) else {
            return false;
        };
        let domains: Vec<ValueSet> = empty.iter().map(|&pos| candidates.at(pos)).collect();
        completion_exists(&domains, used, remaining)
    }

    pub(super) fn is_satisfied(&self, grid: &Grid) -> bool {
        let mut used = ValueSet::EMPTY;
        let mut total = 0;
        for &pos in &self.cells {
            let Some(value) = grid.get(pos) else {
                return false;
            };
            if !used.insert(value) {
                return false;
            }
            total += u32::from(value);
        }
        total == self.sum
    }
}

/// Returns `true` if distinct values, one from each domain and none from
/// `used`, can sum to exactly `remaining`.
///
/// Domains are small (a cage never exceeds the grid side), so a direct
/// search with an ascending early break is enough.
fn completion_exists(domains: &[ValueSet], used: ValueSet, remaining: u32) -> bool {
    let Some((first, rest)) = domains.split_first() else {
        return remaining == 0;
    };
    for value in first.difference(used) {
        if u32::from(value) > remaining {
            break; // candidates iterate ascending, no later value can fit
        }
        let mut used = used;
        used.insert(value);
        if completion_exists(rest, used, remaining - u32::from(value)) {
            return true;
        }
    }
    false
}
