//! Grid data model and tabular loader

use std::fmt;

use itertools::Itertools;

use crate::error::{MazeError, Result};

/// Classification of a single square of the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Wall,
    Hall,
    Traveler,
    Prize,
}

impl CellState {
    const S_WALL: char = '🟫';
    const S_HALL: char = '🟩';
    const S_TRAVELER: char = '🏃';
    const S_PRIZE: char = '❎';

    /// Decode the integer used in the tabular maze files
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Wall),
            1 => Some(Self::Hall),
            2 => Some(Self::Traveler),
            3 => Some(Self::Prize),
            _ => None,
        }
    }

    /// Emoji used when drawing the grid on the terminal
    pub fn symbol(self) -> char {
        match self {
            Self::Wall => Self::S_WALL,
            Self::Hall => Self::S_HALL,
            Self::Traveler => Self::S_TRAVELER,
            Self::Prize => Self::S_PRIZE,
        }
    }
}

/// Location in the maze
///
/// Coordinates are signed so that neighbors of border cells can be
/// expressed; such positions are rejected by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: isize,
    pub col: isize,
}

impl Position {
    pub fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// Orthogonal neighbors in the order north, south, west, east
    pub fn neighbors(self) -> [Position; 4] {
        [
            Position::new(self.row - 1, self.col),
            Position::new(self.row + 1, self.col),
            Position::new(self.row, self.col - 1),
            Position::new(self.row, self.col + 1),
        ]
    }

    /// True if `other` is one orthogonal step away
    pub fn is_adjacent(self, other: Position) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Read and write access to cell classifications.
///
/// Implemented by the plain [Grid] and by [crate::sync::SharedGrid], so
/// the same search can run on either.
pub trait Cells {
    /// Classification of the cell at `pos`
    fn cell_at(&self, pos: Position) -> Result<CellState>;

    /// Overwrite the cell at `pos`
    fn set_cell(&mut self, pos: Position, state: CellState) -> Result<()>;

    /// Hall and Prize cells may be entered; positions outside the grid may not.
    fn is_traversable(&self, pos: Position) -> bool {
        matches!(
            self.cell_at(pos),
            Ok(CellState::Hall) | Ok(CellState::Prize)
        )
    }

    /// Write `new` only if the cell currently holds `expected`.
    ///
    /// Returns whether the write happened.
    fn replace_if(&mut self, pos: Position, expected: CellState, new: CellState) -> Result<bool> {
        if self.cell_at(pos)? == expected {
            self.set_cell(pos, new)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Fixed-size matrix of cell states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    squares: Vec<Vec<CellState>>,
    cols: usize,
}

impl Grid {
    /// Build a grid from typed rows.
    ///
    /// Returns error, if there are no rows, no columns, or the rows differ
    /// in length.
    pub fn from_rows(squares: Vec<Vec<CellState>>) -> Result<Self> {
        let cols = squares.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(MazeError::MalformedInput {
                line: 1,
                reason: "maze is empty".to_string(),
            });
        }
        if let Some((y, row)) = squares.iter().find_position(|row| row.len() != cols) {
            return Err(MazeError::MalformedInput {
                line: y + 1,
                reason: format!("expected {} columns, found {}", cols, row.len()),
            });
        }
        Ok(Grid { squares, cols })
    }

    /// Parse maze from comma-separated integer rows
    ///
    /// - `text`: one grid row per line, values 0 (wall), 1 (hall),
    ///   2 (traveler) or 3 (prize). Blank lines are skipped.
    ///
    /// Returns error, if a value is not one of the above or the rows are
    /// not all the same length.
    ///
    /// # Examples
    /// ```
    /// use maze_backtrack::{CellState, Cells, Grid, Position};
    ///
    /// let grid = Grid::parse_csv("0,0,0\n0,1,3\n0,0,0").unwrap();
    /// assert_eq!(grid.rows(), 3);
    /// assert_eq!(grid.cell_at(Position::new(1, 2)), Ok(CellState::Prize));
    /// ```
    pub fn parse_csv(text: &str) -> Result<Self> {
        let mut squares: Vec<Vec<CellState>> = Vec::new();
        let mut cols = None;

        for (y, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split(',')
                .map(|value| Self::parse_value(value, y + 1))
                .collect::<Result<Vec<_>>>()?;

            match cols {
                None => cols = Some(row.len()),
                Some(n) if n != row.len() => {
                    return Err(MazeError::MalformedInput {
                        line: y + 1,
                        reason: format!("expected {} columns, found {}", n, row.len()),
                    })
                }
                Some(_) => (),
            }
            squares.push(row);
        }

        let Some(cols) = cols else {
            return Err(MazeError::MalformedInput {
                line: 1,
                reason: "maze is empty".to_string(),
            });
        };
        Ok(Grid { squares, cols })
    }

    fn parse_value(value: &str, line: usize) -> Result<CellState> {
        let value = value.trim();
        value
            .parse::<u8>()
            .ok()
            .and_then(CellState::from_code)
            .ok_or_else(|| MazeError::MalformedInput {
                line,
                reason: format!("unexpected value `{}`", value),
            })
    }

    pub fn rows(&self) -> usize {
        self.squares.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// All positions currently holding `state`, row by row
    pub fn positions_of(&self, state: CellState) -> Vec<Position> {
        self.squares
            .iter()
            .enumerate()
            .flat_map(move |(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(move |(_, c)| **c == state)
                    .map(move |(x, _)| Position::new(y as isize, x as isize))
            })
            .collect()
    }

    /// Number of cells holding `state`
    pub fn count(&self, state: CellState) -> usize {
        self.squares.iter().flatten().filter(|c| **c == state).count()
    }

    fn index(&self, pos: Position) -> Option<(usize, usize)> {
        let y = usize::try_from(pos.row).ok()?;
        let x = usize::try_from(pos.col).ok()?;
        (y < self.rows() && x < self.cols).then_some((y, x))
    }

    fn out_of_bounds(&self, pos: Position) -> MazeError {
        MazeError::OutOfBounds {
            pos,
            rows: self.rows(),
            cols: self.cols,
        }
    }
}

impl Cells for Grid {
    fn cell_at(&self, pos: Position) -> Result<CellState> {
        let (y, x) = self.index(pos).ok_or_else(|| self.out_of_bounds(pos))?;
        Ok(self.squares[y][x])
    }

    fn set_cell(&mut self, pos: Position, state: CellState) -> Result<()> {
        let (y, x) = self.index(pos).ok_or_else(|| self.out_of_bounds(pos))?;
        self.squares[y][x] = state;
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sq_str = self
            .squares
            .iter()
            .map(|row| row.iter().map(|c| c.symbol()).join(""))
            .join("\n");
        write!(f, "{}", sq_str)
    }
}
