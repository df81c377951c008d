//! Core data structures for the varoku solver.
//!
//! This crate provides the puzzle-independent building blocks the solver
//! works on. It knows nothing about constraints or search; it only models
//! grids and candidate bookkeeping.
//!
//! # Overview
//!
//! - [`geometry`]: block dimensions, grid size, and [`Position`]s. Grids are
//!   square with side `N = block_rows * block_cols`, so the same types cover
//!   4×4 minis, 6×6 puzzles, and classic 9×9 Sudoku.
//! - [`value_set`]: [`ValueSet`], a fixed-width bitset over the values
//!   `1..=N` of one cell.
//! - [`grid`]: [`Grid`], the N×N array of assigned cell values, with parsing
//!   and display.
//! - [`candidate_grid`]: [`CandidateGrid`], the parallel N×N array of
//!   candidate sets.
//!
//! # Examples
//!
//! ```
//! use varoku_core::{CandidateGrid, Geometry, Grid, Position};
//!
//! let geometry = Geometry::new(3, 3)?;
//! let grid = Grid::parse(
//!     geometry,
//!     "
//!     5 3 _ _ 7 _ _ _ _
//!     6 _ _ 1 9 5 _ _ _
//!     _ 9 8 _ _ _ _ 6 _
//!     8 _ _ _ 6 _ _ _ 3
//!     4 _ _ 8 _ 3 _ _ 1
//!     7 _ _ _ 2 _ _ _ 6
//!     _ 6 _ _ _ _ 2 8 _
//!     _ _ _ 4 1 9 _ _ 5
//!     _ _ _ _ 8 _ _ 7 9
//!     ",
//! )
//! .unwrap();
//!
//! let candidates = CandidateGrid::from_grid(&grid);
//! assert_eq!(candidates.at(Position::new(0, 0)).single(), Some(5));
//! # Ok::<(), varoku_core::GeometryError>(())
//! ```

pub mod candidate_grid;
pub mod geometry;
pub mod grid;
pub mod value_set;

pub use self::{
    candidate_grid::CandidateGrid,
    geometry::{Geometry, GeometryError, Position},
    grid::{Grid, ParseGridError},
    value_set::ValueSet,
};
