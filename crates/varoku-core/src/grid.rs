//! Cell value grids.
//!
//! [`Grid`] holds the assigned value of every cell of an N×N puzzle, with
//! `None` marking an empty cell. It parses from and renders to a
//! whitespace-separated token format where `_`, `.`, or `0` mark empties, so
//! grids of any size (including N > 9, where values need two digits) read the
//! same way:
//!
//! ```text
//! 1 _ _ 4
//! _ _ 1 _
//! _ 3 _ _
//! 4 _ _ 2
//! ```

use std::fmt;

use derive_more::{Display, Error};

use crate::{Geometry, Position, ValueSet};

/// An N×N grid of optionally assigned cell values.
///
/// # Examples
///
/// ```
/// use varoku_core::{Geometry, Grid, Position};
///
/// let geometry = Geometry::new(2, 2)?;
/// let mut grid = Grid::new(geometry);
/// grid.set(Position::new(0, 0), 3);
///
/// assert_eq!(grid.get(Position::new(0, 0)), Some(3));
/// assert_eq!(grid.get(Position::new(1, 0)), None);
/// # Ok::<(), varoku_core::GeometryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    geometry: Geometry,
    cells: Vec<Option<u8>>,
}

/// Errors reported by [`Grid::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseGridError {
    /// The input did not contain one token per cell.
    #[display("expected {expected} cells, found {found}")]
    WrongCellCount {
        /// Cells required by the geometry.
        expected: usize,
        /// Tokens found in the input.
        found: usize,
    },

    /// A token was neither an empty-cell marker nor a number.
    #[display("invalid cell token {token:?}")]
    InvalidToken {
        /// The offending token.
        token: String,
    },

    /// A numeric token was outside `1..=size`.
    #[display("cell value {value} is outside 1..={size}")]
    ValueOutOfRange {
        /// The parsed value.
        value: u8,
        /// The grid side.
        size: u8,
    },
}

impl Grid {
    /// Creates an empty grid for the given geometry.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            cells: vec![None; geometry.cell_count()],
        }
    }

    /// Parses a grid from whitespace-separated cell tokens.
    ///
    /// Tokens `_`, `.`, and `0` mark empty cells; any other token must be a
    /// value in `1..=size`. Layout is free-form: newlines and extra spaces
    /// are ignored, only token order (row-major) matters.
    ///
    /// # Errors
    ///
    /// Returns [`ParseGridError`] if the token count does not match the
    /// geometry, a token is not a number or empty marker, or a value is out
    /// of range.
    pub fn parse(geometry: Geometry, input: &str) -> Result<Self, ParseGridError> {
        let size = geometry.size();
        let mut cells = Vec::with_capacity(geometry.cell_count());
        for token in input.split_whitespace() {
            if matches!(token, "_" | "." | "0") {
                cells.push(None);
                continue;
            }
            let value: u8 = token.parse().map_err(|_| ParseGridError::InvalidToken {
                token: token.to_owned(),
            })?;
            if value == 0 || value > size {
                return Err(ParseGridError::ValueOutOfRange { value, size });
            }
            cells.push(Some(value));
        }
        if cells.len() != geometry.cell_count() {
            return Err(ParseGridError::WrongCellCount {
                expected: geometry.cell_count(),
                found: cells.len(),
            });
        }
        Ok(Self { geometry, cells })
    }

    /// Returns the geometry this grid was built for.
    #[must_use]
    #[inline]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Returns the value at `pos`, or `None` if the cell is empty.
    #[must_use]
    #[inline]
    pub fn get(&self, pos: Position) -> Option<u8> {
        self.cells[self.geometry.index_of(pos)]
    }

    /// Assigns `value` to the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if `value` is outside `1..=size`.
    #[inline]
    pub fn set(&mut self, pos: Position, value: u8) {
        debug_assert!(value >= 1 && value <= self.geometry.size());
        let index = self.geometry.index_of(pos);
        self.cells[index] = Some(value);
    }

    /// Clears the cell at `pos`.
    #[inline]
    pub fn clear(&mut self, pos: Position) {
        let index = self.geometry.index_of(pos);
        self.cells[index] = None;
    }

    /// Returns `true` if every cell is assigned.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Returns the number of assigned cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Returns an iterator over `(position, value)` pairs of assigned cells,
    /// in row-major order.
    pub fn assigned(&self) -> impl Iterator<Item = (Position, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.map(|value| (self.geometry.position_at(index), value)))
    }

    /// Returns the set of values assigned to the given cells, ignoring
    /// empties.
    ///
    /// Duplicates collapse (it is a set); use a constraint check to detect
    /// them.
    #[must_use]
    pub fn values_of(&self, cells: &[Position]) -> ValueSet {
        cells.iter().filter_map(|&pos| self.get(pos)).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = usize::from(self.geometry.size());
        let width = if self.geometry.size() > 9 { 2 } else { 1 };
        for (index, cell) in self.cells.iter().enumerate() {
            if index > 0 {
                if index % size == 0 {
                    writeln!(f)?;
                } else {
                    write!(f, " ")?;
                }
            }
            match cell {
                Some(value) => write!(f, "{value:>width$}")?,
                None => write!(f, "{:>width$}", "_")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry_4() -> Geometry {
        Geometry::new(2, 2).unwrap()
    }

    #[test]
    fn test_parse_accepts_all_empty_markers() {
        let grid = Grid::parse(
            geometry_4(),
            "
            1 _ . 4
            0 _ 1 .
            _ 3 _ _
            4 _ _ 2
            ",
        )
        .unwrap();
        assert_eq!(grid.get(Position::new(0, 0)), Some(1));
        assert_eq!(grid.get(Position::new(1, 0)), None);
        assert_eq!(grid.get(Position::new(0, 1)), None);
        assert_eq!(grid.get(Position::new(3, 3)), Some(2));
        assert_eq!(grid.filled_count(), 6);
    }

    #[test]
    fn test_parse_rejects_wrong_cell_count() {
        assert_eq!(
            Grid::parse(geometry_4(), "1 2 3"),
            Err(ParseGridError::WrongCellCount {
                expected: 16,
                found: 3
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_token() {
        assert_eq!(
            Grid::parse(geometry_4(), "x 2 3 4 _ _ _ _ _ _ _ _ _ _ _ _"),
            Err(ParseGridError::InvalidToken {
                token: "x".to_owned()
            })
        );
    }

    #[test]
    fn test_parse_rejects_out_of_range_value() {
        assert_eq!(
            Grid::parse(geometry_4(), "5 _ _ _ _ _ _ _ _ _ _ _ _ _ _ _"),
            Err(ParseGridError::ValueOutOfRange { value: 5, size: 4 })
        );
    }

    #[test]
    fn test_display_round_trip() {
        let input = "
            1 _ _ 4
            _ _ 1 _
            _ 3 _ _
            4 _ _ 2
        ";
        let grid = Grid::parse(geometry_4(), input).unwrap();
        let rendered = grid.to_string();
        assert_eq!(Grid::parse(geometry_4(), &rendered).unwrap(), grid);
    }

    #[test]
    fn test_set_clear() {
        let mut grid = Grid::new(geometry_4());
        let pos = Position::new(2, 1);
        grid.set(pos, 4);
        assert_eq!(grid.get(pos), Some(4));
        grid.clear(pos);
        assert_eq!(grid.get(pos), None);
    }

    #[test]
    fn test_is_complete() {
        let mut grid = Grid::parse(
            geometry_4(),
            "
            1 2 3 4
            3 4 1 2
            2 1 4 3
            4 3 2 _
            ",
        )
        .unwrap();
        assert!(!grid.is_complete());
        grid.set(Position::new(3, 3), 1);
        assert!(grid.is_complete());
    }

    #[test]
    fn test_values_of() {
        let grid = Grid::parse(
            geometry_4(),
            "
            1 _ _ 4
            _ _ 1 _
            _ 3 _ _
            4 _ _ 2
            ",
        )
        .unwrap();
        let row = [
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(2, 0),
            Position::new(3, 0),
        ];
        assert_eq!(grid.values_of(&row), ValueSet::from_iter([1, 4]));
    }
}
