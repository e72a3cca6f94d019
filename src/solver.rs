//! Depth-first backtracking search
//!
//! The search is keyed on a private frontier (LIFO) and visited set. The
//! traveler marking it writes into the grid is for the view only; it never
//! decides which cells get explored.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use log::{debug, info};

use crate::error::Result;
use crate::grid::{CellState, Cells, Position};
use crate::sync::Shutdown;

/// Progress of a [Solver]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Idle,
    Searching,
    /// Prize found at the given position
    Found(Position),
    /// Frontier ran dry without reaching the prize
    Exhausted,
}

impl SolverState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Found(_) | Self::Exhausted)
    }
}

/// How a [Solver::run] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Position),
    /// No path exists from the start to the prize
    Exhausted,
    /// Shutdown was requested before the search finished
    Stopped,
}

/// Result of a search, with counters for the curious
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Positions popped from the frontier
    pub steps: usize,
    /// Positions expanded, each at most once
    pub expanded: usize,
    /// Traveler markings written into the grid
    pub movements: usize,
    /// Orthogonally connected cells from start to prize, both included.
    /// Empty unless the prize was found.
    pub route: Vec<Position>,
}

impl SearchReport {
    /// Print report
    pub fn print_report(&self) {
        match self.outcome {
            SearchOutcome::Found(pos) => println!(
                "Prize found at {} after {} steps; route length {}.",
                pos,
                self.steps,
                self.route.len().saturating_sub(1)
            ),
            SearchOutcome::Exhausted => println!(
                "No path to the prize; explored {} cells in {} steps.",
                self.expanded, self.steps
            ),
            SearchOutcome::Stopped => {
                println!("Search stopped after {} steps.", self.steps)
            }
        }
    }
}

/// Backtracking search from a fixed start position
pub struct Solver {
    start: Position,
    state: SolverState,
    /// Pending positions, each with the position that pushed it
    frontier: Vec<(Position, Option<Position>)>,
    visited: HashSet<Position>,
    /// Parent of each expanded position, for route reconstruction
    came_from: HashMap<Position, Position>,
    /// Cell currently carrying this solver's traveler marking
    traveler: Option<Position>,
    steps: usize,
    movements: usize,
}

impl Solver {
    pub fn new(start: Position) -> Self {
        Self {
            start,
            state: SolverState::Idle,
            frontier: Vec::new(),
            visited: HashSet::new(),
            came_from: HashMap::new(),
            traveler: None,
            steps: 0,
            movements: 0,
        }
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    /// Positions expanded so far
    pub fn visited(&self) -> &HashSet<Position> {
        &self.visited
    }

    /// Perform one iteration of the search
    ///
    /// Pops the most recent frontier entry. A prize there ends the search;
    /// an already visited position is dropped; anything else is expanded:
    /// the traveler moves onto it and its enterable neighbors are pushed
    /// north, south, west, east.
    ///
    /// Stepping a finished solver does nothing.
    pub fn step<G: Cells>(&mut self, grid: &mut G) -> Result<SolverState> {
        match self.state {
            SolverState::Idle => {
                self.frontier.push((self.start, None));
                self.state = SolverState::Searching;
            }
            SolverState::Searching => (),
            SolverState::Found(_) | SolverState::Exhausted => return Ok(self.state),
        }

        let Some((pos, parent)) = self.frontier.pop() else {
            info!("Frontier empty after {} steps, prize unreachable", self.steps);
            self.state = SolverState::Exhausted;
            return Ok(self.state);
        };
        self.steps += 1;

        // Checked before the traveler can overwrite the prize
        if grid.cell_at(pos)? == CellState::Prize {
            if let Some(parent) = parent {
                self.came_from.insert(pos, parent);
            }
            info!("Prize found at {} after {} steps", pos, self.steps);
            self.state = SolverState::Found(pos);
            return Ok(self.state);
        }

        if !self.visited.insert(pos) {
            return Ok(self.state);
        }
        if let Some(parent) = parent {
            self.came_from.insert(pos, parent);
        }
        debug!("Expanding {}", pos);
        self.move_traveler(grid, pos)?;

        for neighbor in pos.neighbors() {
            if self.can_enter(grid, neighbor) {
                self.frontier.push((neighbor, Some(pos)));
            }
        }
        Ok(self.state)
    }

    /// Unvisited hall or prize cells may be entered. A traveler marking
    /// this solver did not write is treated as hall.
    fn can_enter<G: Cells>(&self, grid: &G, pos: Position) -> bool {
        if self.visited.contains(&pos) {
            return false;
        }
        match grid.cell_at(pos) {
            Ok(CellState::Hall) | Ok(CellState::Prize) => true,
            Ok(CellState::Traveler) => self.traveler != Some(pos),
            Ok(CellState::Wall) | Err(_) => false,
        }
    }

    /// Step until the search ends or shutdown is requested
    ///
    /// - `grid`: Cells to search; written only for the traveler marking.
    /// - `pacing`: Pause between steps so the view can follow. Does not
    ///   change the result; [Duration::ZERO] disables it.
    /// - `shutdown`: Checked before every step. A step in progress is
    ///   completed, no new one is started.
    pub fn run<G: Cells>(
        &mut self,
        grid: &mut G,
        pacing: Duration,
        shutdown: &Shutdown,
    ) -> Result<SearchReport> {
        loop {
            if shutdown.is_triggered() {
                info!("Search stopped by shutdown after {} steps", self.steps);
                return Ok(self.report(SearchOutcome::Stopped));
            }
            match self.step(grid)? {
                SolverState::Found(pos) => return Ok(self.report(SearchOutcome::Found(pos))),
                SolverState::Exhausted => return Ok(self.report(SearchOutcome::Exhausted)),
                SolverState::Idle | SolverState::Searching => (),
            }
            if !pacing.is_zero() {
                shutdown.wait_timeout(pacing);
            }
        }
    }

    fn report(&self, outcome: SearchOutcome) -> SearchReport {
        let route = match outcome {
            SearchOutcome::Found(pos) => self.route_to(pos),
            SearchOutcome::Exhausted | SearchOutcome::Stopped => Vec::new(),
        };
        SearchReport {
            outcome,
            steps: self.steps,
            expanded: self.visited.len(),
            movements: self.movements,
            route,
        }
    }

    /// Follow parent links back from `end` to the start
    fn route_to(&self, end: Position) -> Vec<Position> {
        let mut route = vec![end];
        let mut current = end;
        while let Some(&parent) = self.came_from.get(&current) {
            route.push(parent);
            current = parent;
        }
        route.reverse();
        route
    }

    /// Move the traveler marking onto `pos`
    ///
    /// The previous cell is reverted only if it still shows the traveler,
    /// and the new cell is marked only if it is a plain hall.
    fn move_traveler<G: Cells>(&mut self, grid: &mut G, pos: Position) -> Result<()> {
        if let Some(prev) = self.traveler {
            grid.replace_if(prev, CellState::Traveler, CellState::Hall)?;
        }
        if grid.replace_if(pos, CellState::Hall, CellState::Traveler)? {
            self.traveler = Some(pos);
            self.movements += 1;
        }
        Ok(())
    }
}
