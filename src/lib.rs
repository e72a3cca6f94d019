//! Find the prize in a grid maze by depth-first backtracking
//!
//! A [Grid] is loaded from comma-separated integers, a [Spawner] places
//! the prize and picks the traveler's start, and a [Solver] walks the maze
//! with an explicit stack while moving the traveler marking around. A
//! [Renderer] may draw the grid concurrently; the two share it through a
//! [SharedGrid] and stop together on a [Shutdown].
//!
//! # Examples
//! ## Solving without a view
//! ```
//! use std::time::Duration;
//! use maze_backtrack::{Grid, SearchOutcome, Shutdown, Solver, Spawner};
//!
//! let mut grid = Grid::parse_csv("
//! 0,0,0,0,0,0,0
//! 0,1,1,1,0,1,0
//! 0,1,0,1,1,1,0
//! 0,1,0,0,0,1,0
//! 0,0,0,0,0,0,0").unwrap();
//! let placement = Spawner::new(Some(42)).spawn(&mut grid).unwrap();
//! let report = Solver::new(placement.start)
//!     .run(&mut grid, Duration::ZERO, &Shutdown::new())
//!     .unwrap();
//! assert_eq!(report.outcome, SearchOutcome::Found(placement.prize));
//! report.print_report();
//! ```
//!
//! ## Solving while a view reads the grid
//! ```
//! use std::time::Duration;
//! use maze_backtrack::{
//!     Grid, Position, Renderer, SearchOutcome, SharedGrid, Shutdown, Solver, TerminalCanvas,
//! };
//!
//! let grid = Grid::parse_csv("1,1,1,1,3").unwrap();
//! let mut shared = SharedGrid::new(grid);
//! let shutdown = Shutdown::new();
//!
//! let view = Renderer::new(Duration::from_millis(5)).begin_rendering(
//!     shared.clone(),
//!     TerminalCanvas::new(Vec::new()),
//!     shutdown.clone(),
//! );
//! let report = Solver::new(Position::new(0, 0))
//!     .run(&mut shared, Duration::from_millis(1), &shutdown)
//!     .unwrap();
//! view.stop().unwrap();
//!
//! assert_eq!(report.outcome, SearchOutcome::Found(Position::new(0, 4)));
//! assert_eq!(report.route.len(), 5);
//! ```

pub mod error;
pub mod grid;
pub mod render;
pub mod solver;
pub mod spawner;
pub mod sync;

pub use error::{MazeError, Result};
pub use grid::{CellState, Cells, Grid, Position};
pub use render::{Canvas, RenderHandle, Renderer, TerminalCanvas};
pub use solver::{SearchOutcome, SearchReport, Solver, SolverState};
pub use spawner::{Placement, PrizePlacement, Spawner};
pub use sync::{SharedGrid, Shutdown};
