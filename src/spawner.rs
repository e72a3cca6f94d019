//! Random placement of the traveler and the prize

use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::error::{MazeError, Result};
use crate::grid::{CellState, Cells, Grid, Position};

/// Whether the prize may land on the traveler's start cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrizePlacement {
    /// Start and prize are drawn independently; a shared cell means the
    /// search succeeds on its first step.
    #[default]
    MayCoincide,
    /// The prize is drawn from the hall cells other than the start.
    Distinct,
}

/// Outcome of a spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Where the search begins; not written into the grid
    pub start: Position,
    /// The one cell marked [CellState::Prize]
    pub prize: Position,
}

/// Picks start and prize cells using an explicit random source
pub struct Spawner<R: Rng = StdRng> {
    random: R,
    placement: PrizePlacement,
}

impl Spawner<StdRng> {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_rng(if let Some(state) = seed {
            StdRng::seed_from_u64(state)
        } else {
            StdRng::from_entropy()
        })
    }
}

impl<R: Rng> Spawner<R> {
    pub fn with_rng(random: R) -> Self {
        Self {
            random,
            placement: PrizePlacement::default(),
        }
    }

    pub fn placement(mut self, placement: PrizePlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Choose a start and write the prize into `grid`
    ///
    /// Any traveler or prize marking left in the grid is first reverted to
    /// hall, so after this call exactly one cell holds the prize and none
    /// holds the traveler. Both cells are drawn uniformly from the hall
    /// cells.
    ///
    /// Returns [MazeError::NoTraversableCell], if there is no hall cell to
    /// choose from.
    pub fn spawn(&mut self, grid: &mut Grid) -> Result<Placement> {
        for state in [CellState::Traveler, CellState::Prize] {
            for pos in grid.positions_of(state) {
                grid.set_cell(pos, CellState::Hall)?;
            }
        }

        let halls = grid.positions_of(CellState::Hall);
        let start = *halls
            .choose(&mut self.random)
            .ok_or(MazeError::NoTraversableCell)?;

        let prize = match self.placement {
            PrizePlacement::MayCoincide => halls.choose(&mut self.random).copied(),
            PrizePlacement::Distinct => {
                let others: Vec<Position> =
                    halls.into_iter().filter(|pos| *pos != start).collect();
                others.choose(&mut self.random).copied()
            }
        }
        .ok_or(MazeError::NoTraversableCell)?;

        grid.set_cell(prize, CellState::Prize)?;
        info!("Traveler starts at {}, prize placed at {}", start, prize);

        Ok(Placement { start, prize })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: &str = "
0,0,0,0,0
0,1,1,1,0
0,1,1,1,0
0,1,1,1,0
0,0,0,0,0";

    #[test]
    fn places_exactly_one_prize_on_a_hall() {
        for seed in 0..50 {
            let mut grid = Grid::parse_csv(OPEN).unwrap();
            let placement = Spawner::new(Some(seed)).spawn(&mut grid).unwrap();

            assert_eq!(grid.positions_of(CellState::Prize), vec![placement.prize]);
            assert_eq!(grid.count(CellState::Traveler), 0);
            assert_eq!(grid.count(CellState::Wall), 16);
            let start = grid.cell_at(placement.start).unwrap();
            assert!(start == CellState::Hall || placement.start == placement.prize);
        }
    }

    #[test]
    fn same_seed_same_placement() {
        let mut a = Grid::parse_csv(OPEN).unwrap();
        let mut b = Grid::parse_csv(OPEN).unwrap();
        let first = Spawner::new(Some(7)).spawn(&mut a).unwrap();
        let second = Spawner::with_rng(StdRng::seed_from_u64(7))
            .spawn(&mut b)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(a, b);
    }

    #[test]
    fn single_hall_coincides_unless_distinct() {
        let mut grid = Grid::parse_csv("0,0,0\n0,1,0\n0,0,0").unwrap();
        let placement = Spawner::new(Some(1)).spawn(&mut grid).unwrap();
        assert_eq!(placement.start, Position::new(1, 1));
        assert_eq!(placement.prize, Position::new(1, 1));

        let mut grid = Grid::parse_csv("0,0,0\n0,1,0\n0,0,0").unwrap();
        let result = Spawner::new(Some(1))
            .placement(PrizePlacement::Distinct)
            .spawn(&mut grid);
        assert_eq!(result, Err(MazeError::NoTraversableCell));
    }

    #[test]
    fn distinct_never_shares_the_start() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let mut grid = Grid::parse_csv("1,1\n0,0").unwrap();
            let placement = Spawner::with_rng(&mut rng)
                .placement(PrizePlacement::Distinct)
                .spawn(&mut grid)
                .unwrap();
            assert_ne!(placement.start, placement.prize);
        }
    }

    #[test]
    fn all_wall_grid_is_rejected() {
        let mut grid = Grid::parse_csv("0,0\n0,0").unwrap();
        assert_eq!(
            Spawner::new(None).spawn(&mut grid),
            Err(MazeError::NoTraversableCell)
        );
    }

    #[test]
    fn stale_markings_are_cleared() {
        let mut grid = Grid::parse_csv("2,1,3\n3,0,0").unwrap();
        Spawner::new(Some(0)).spawn(&mut grid).unwrap();
        assert_eq!(grid.count(CellState::Traveler), 0);
        assert_eq!(grid.count(CellState::Prize), 1);
        assert_eq!(grid.count(CellState::Hall), 3);
    }
}
