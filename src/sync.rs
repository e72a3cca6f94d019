//! Sharing the grid between the solver and the view
//!
//! Every cell read and write goes through one mutex guarding the whole
//! matrix. Each operation holds the lock for a single cell only; the view
//! copies the full matrix under one short lock hold and draws outside it.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::grid::{CellState, Cells, Grid, Position};

/// Grid behind a single lock, cloneable across threads
#[derive(Clone, Debug)]
pub struct SharedGrid {
    inner: Arc<Mutex<Grid>>,
    rows: usize,
    cols: usize,
}

impl SharedGrid {
    pub fn new(grid: Grid) -> Self {
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            inner: Arc::new(Mutex::new(grid)),
        }
    }

    /// Dimensions are fixed, so they are read without locking
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Copy of the whole matrix, consistent as of one instant
    pub fn snapshot(&self) -> Grid {
        self.lock().clone()
    }

    // A cell write is a single assignment, so a poisoned lock still
    // guards a consistent matrix.
    fn lock(&self) -> MutexGuard<'_, Grid> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Cells for SharedGrid {
    fn cell_at(&self, pos: Position) -> Result<CellState> {
        self.lock().cell_at(pos)
    }

    fn set_cell(&mut self, pos: Position, state: CellState) -> Result<()> {
        self.lock().set_cell(pos, state)
    }

    fn replace_if(&mut self, pos: Position, expected: CellState, new: CellState) -> Result<bool> {
        self.lock().replace_if(pos, expected, new)
    }
}

/// Shutdown request shared by the host, the solver and the view.
///
/// Once triggered it stays triggered.
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake everyone waiting on [Self::wait_timeout]
    pub fn trigger(&self) {
        let (flag, signal) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        signal.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `timeout`, returning early if shutdown is requested.
    ///
    /// Returns whether shutdown has been requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, signal) = &*self.inner;
        // Too far in the future to represent: wait for the trigger alone
        let deadline = Instant::now().checked_add(timeout);
        let mut triggered = flag.lock().unwrap_or_else(PoisonError::into_inner);
        while !*triggered {
            triggered = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    signal
                        .wait_timeout(triggered, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => signal.wait(triggered).unwrap_or_else(PoisonError::into_inner),
            };
        }
        *triggered
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn clones_share_cells() {
        let grid = Grid::parse_csv("0,1,1\n0,1,0").unwrap();
        let shared = SharedGrid::new(grid);
        let mut writer = shared.clone();

        writer
            .set_cell(Position::new(0, 2), CellState::Prize)
            .unwrap();

        assert_eq!(shared.cell_at(Position::new(0, 2)), Ok(CellState::Prize));
        assert_eq!(shared.dimensions(), (2, 3));
        assert!(shared.is_traversable(Position::new(1, 1)));
        assert!(!shared.is_traversable(Position::new(2, 1)));
    }

    #[test]
    fn readers_never_see_partial_moves() {
        let grid = Grid::parse_csv("1,1,1,1,1,1").unwrap();
        let shared = SharedGrid::new(grid);
        let done = Shutdown::new();

        let readers: Vec<_> = (0..2)
            .map(|_| {
                let shared = shared.clone();
                let done = done.clone();
                thread::spawn(move || {
                    let mut frames = 0;
                    while !done.is_triggered() {
                        let frame = shared.snapshot();
                        assert!(frame.count(CellState::Traveler) <= 1);
                        assert_eq!(frame.count(CellState::Wall), 0);
                        assert_eq!(frame.count(CellState::Prize), 0);
                        frames += 1;
                    }
                    frames
                })
            })
            .collect();

        let mut writer = shared.clone();
        let mut current = None;
        for i in 0..5_000 {
            let next = Position::new(0, i % 6);
            if let Some(prev) = current {
                writer
                    .replace_if(prev, CellState::Traveler, CellState::Hall)
                    .unwrap();
            }
            writer.set_cell(next, CellState::Traveler).unwrap();
            current = Some(next);
        }
        done.trigger();

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(shared.snapshot().count(CellState::Traveler), 1);
    }

    #[test]
    fn wait_returns_after_timeout_without_trigger() {
        let shutdown = Shutdown::new();
        let start = Instant::now();
        assert!(!shutdown.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn unbounded_wait_ends_on_trigger() {
        let shutdown = Shutdown::new();
        let waiter = {
            let shutdown = shutdown.clone();
            thread::spawn(move || shutdown.wait_timeout(Duration::MAX))
        };
        thread::sleep(Duration::from_millis(20));
        shutdown.trigger();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn trigger_wakes_waiters_early() {
        let shutdown = Shutdown::new();
        let waiter = {
            let shutdown = shutdown.clone();
            thread::spawn(move || {
                let start = Instant::now();
                (shutdown.wait_timeout(Duration::from_secs(30)), start.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(20));
        shutdown.trigger();

        let (triggered, waited) = waiter.join().unwrap();
        assert!(triggered);
        assert!(waited < Duration::from_secs(5));
        assert!(shutdown.is_triggered());
        assert!(shutdown.wait_timeout(Duration::ZERO));
    }
}
