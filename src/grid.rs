use std::fmt;

use strum::{EnumIter, VariantArray};
use thiserror::Error;

/// A cell coordinate in the grid, identified by (row, column)
///
/// Positions are plain copyable values with hash and equality over the
/// coordinate pair, so they can key a transition distribution. A moved
/// position is always a new value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.column)
    }
}

/// The four moves available to an agent
///
/// Declaration order is the canonical iteration order used when assigning
/// probability mass, which fixes how colliding candidate moves sum.
#[derive(EnumIter, VariantArray, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The geometrically opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// What occupies a single grid cell
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    /// Traversable and non-terminal
    Empty,
    /// Terminal, yields reward +1
    Reward,
    /// Terminal, yields reward -1
    Damage,
    /// Excluded from the state space, never enterable
    Blocked,
}

impl Cell {
    /// Decode a raw cell code as found in grid definitions
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Reward),
            -1 => Some(Self::Damage),
            9 => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Whether entering this cell ends the episode
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Reward | Self::Damage)
    }
}

/// Errors raised while validating a grid definition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("unknown cell code {code} at [{row}, {column}]")]
    UnknownCode { code: i8, row: usize, column: usize },
    #[error("start cell {0} is not traversable")]
    UntraversableStart(Position),
}

/// An immutable rectangular matrix of cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Parse a matrix of raw cell codes, validating that the matrix is
    /// non-empty, rectangular, and uses only known codes
    pub fn parse<R: AsRef<[i8]>>(codes: &[R]) -> Result<Self, GridError> {
        let expected = codes.first().ok_or(GridError::Empty)?.as_ref().len();
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(codes.len());
        for (row, row_codes) in codes.iter().enumerate() {
            let row_codes = row_codes.as_ref();
            if row_codes.len() != expected {
                return Err(GridError::Ragged {
                    row,
                    len: row_codes.len(),
                    expected,
                });
            }

            let mut parsed = Vec::with_capacity(expected);
            for (column, &code) in row_codes.iter().enumerate() {
                let cell =
                    Cell::from_code(code).ok_or(GridError::UnknownCode { code, row, column })?;
                parsed.push(cell);
            }
            cells.push(parsed);
        }

        Ok(Self { cells })
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.cells[0].len()
    }

    /// The cell at a position
    ///
    /// Panics if the position is outside the grid.
    pub fn cell(&self, position: Position) -> Cell {
        self.cells[position.row][position.column]
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn direction_opposites() {
        for direction in Direction::iter() {
            assert_ne!(direction, direction.opposite());
            assert_eq!(
                direction,
                direction.opposite().opposite(),
                "Opposite is an involution"
            );
        }
    }

    #[test]
    fn direction_iteration_order() {
        let order = Direction::iter().collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                Direction::Up,
                Direction::Down,
                Direction::Left,
                Direction::Right
            ],
            "Canonical order is fixed"
        );
    }

    #[test]
    fn cell_codes() {
        assert_eq!(Cell::from_code(0), Some(Cell::Empty));
        assert_eq!(Cell::from_code(1), Some(Cell::Reward));
        assert_eq!(Cell::from_code(-1), Some(Cell::Damage));
        assert_eq!(Cell::from_code(9), Some(Cell::Blocked));
        assert_eq!(Cell::from_code(5), None, "Unknown codes are rejected");

        assert!(Cell::Reward.is_terminal());
        assert!(Cell::Damage.is_terminal());
        assert!(!Cell::Empty.is_terminal());
        assert!(!Cell::Blocked.is_terminal());
    }

    #[test]
    fn parse_valid_grid() {
        let codes: [[i8; 4]; 3] = [[0, 0, 0, 1], [0, 9, 0, -1], [0, 0, 0, 0]];
        let grid = Grid::parse(&codes).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.cell(Position::new(0, 3)), Cell::Reward);
        assert_eq!(grid.cell(Position::new(1, 1)), Cell::Blocked);
        assert_eq!(grid.cell(Position::new(1, 3)), Cell::Damage);
        assert_eq!(grid.cell(Position::new(2, 0)), Cell::Empty);
    }

    #[test]
    fn parse_rejects_malformed_grids() {
        let empty: [[i8; 0]; 0] = [];
        assert_eq!(Grid::parse(&empty), Err(GridError::Empty));

        let no_columns: [[i8; 0]; 1] = [[]];
        assert_eq!(Grid::parse(&no_columns), Err(GridError::Empty));

        let ragged = vec![vec![0i8, 0, 0], vec![0, 0]];
        assert_eq!(
            Grid::parse(&ragged),
            Err(GridError::Ragged {
                row: 1,
                len: 2,
                expected: 3
            })
        );

        let unknown = vec![vec![0i8, 7]];
        assert_eq!(
            Grid::parse(&unknown),
            Err(GridError::UnknownCode {
                code: 7,
                row: 0,
                column: 1
            })
        );
    }

    #[test]
    fn position_identity() {
        let a = Position::new(1, 2);
        let b = Position::new(1, 2);
        assert_eq!(a, b, "Equality is over the coordinate pair");
        assert_ne!(a, Position::new(2, 1));
        assert_eq!(a.to_string(), "[1, 2]");
    }
}
