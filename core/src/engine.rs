use alloc::collections::VecDeque;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// `Won` and `Lost` only go back to `NotStarted` through [`Game::restart`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Nothing revealed yet, the grid holds no bombs
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_started(self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game session, from the empty board to a win or a loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    seed: u64,
    grid: Grid,
    state: GameState,
    triggered_bomb: Option<Coord2>,
}

impl Game {
    /// Empty board, bombs are placed by the first reveal using `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            grid: Grid::empty(config.size),
            state: GameState::NotStarted,
            triggered_bomb: None,
        }
    }

    /// Starts a game on a board whose bombs are already placed.
    pub fn from_grid(grid: Grid) -> Self {
        let config = GameConfig::new_unchecked(grid.size(), grid.bomb_count());
        let mut game = Self {
            config,
            seed: 0,
            grid,
            state: GameState::InProgress,
            triggered_bomb: None,
        };
        game.refresh_win_state();
        game
    }

    /// Throws the current board away and waits for a new first click.
    pub fn restart(&mut self, seed: u64) {
        log::debug!("Restarting game with seed {}", seed);
        *self = Self::new(self.config, seed);
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.state.is_started()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, GameState::Won)
    }

    pub fn is_lost(&self) -> bool {
        matches!(self.state, GameState::Lost)
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid[coords]
    }

    /// The bomb that ended the game, if it was lost.
    pub fn triggered_bomb(&self) -> Option<Coord2> {
        self.triggered_bomb
    }

    pub fn total_bombs(&self) -> CellCount {
        if self.state.is_started() {
            self.grid.bomb_count()
        } else {
            self.config.bombs
        }
    }

    /// Bombs not accounted for by a flag, negative when over-flagged.
    pub fn bombs_left(&self) -> isize {
        (self.total_bombs() as isize) - (self.grid.flagged_count() as isize)
    }

    /// Whether a double click on `coords` would open its neighbors.
    pub fn can_chord(&self, coords: Coord2) -> bool {
        if !matches!(self.state, GameState::InProgress) {
            return false;
        }
        if self.grid.validate_coords(coords).is_err() {
            return false;
        }

        let cell = self.grid[coords];
        cell.is_revealed && cell.value > 0 && cell.value == self.count_flagged_neighbors(coords)
    }

    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.grid[coords].is_revealed {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.state.is_started() {
            self.populate(coords);
        }

        log::debug!("Reveal cell at {:?}", coords);
        Ok(self.reveal_single_cell(coords))
    }

    pub fn flag_cell(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.grid.cell_mut(coords);
        if cell.is_revealed {
            return Ok(MarkOutcome::NoChange);
        }

        cell.is_flagged = !cell.is_flagged;
        log::debug!("Flag at {:?} set to {}", coords, cell.is_flagged);
        self.refresh_win_state();
        Ok(MarkOutcome::Changed)
    }

    /// Opens every unflagged neighbor of a revealed number once enough flags surround it.
    pub fn chord(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.can_chord(coords) {
            return Ok(NoChange);
        }

        let targets: Vec<Coord2> = self
            .grid
            .iter_neighbors(coords)
            .filter(|&pos| self.grid[pos].is_covered())
            .collect();
        log::debug!("Chord at {:?} opens {:?}", coords, targets);

        let mut outcome = NoChange;
        for pos in targets {
            if self.state.is_finished() {
                break;
            }
            outcome = outcome | self.reveal_single_cell(pos);
        }
        Ok(outcome)
    }

    /// Moves an in-progress game to `Won` once every safe cell is revealed.
    ///
    /// Derived from the grid alone, so it is safe to call after any mutation.
    pub fn refresh_win_state(&mut self) -> bool {
        if matches!(self.state, GameState::InProgress)
            && self.grid.revealed_count() == self.grid.safe_cell_count()
        {
            log::debug!("All {} safe cells revealed, game won", self.grid.safe_cell_count());
            self.state = GameState::Won;
        }
        self.is_won()
    }

    fn populate(&mut self, start: Coord2) {
        let mut grid = RandomGridGenerator::new(self.seed, start).generate(self.config);
        grid.carry_flags_from(&self.grid);
        self.grid = grid;
        self.state = GameState::InProgress;
        log::debug!("Game started at {:?} with seed {}", start, self.seed);
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.grid[coords];

        if cell.is_revealed {
            return RevealOutcome::NoChange;
        }

        if cell.is_bomb {
            self.triggered_bomb = Some(coords);
            let cleared = self.grid.clear_flags();
            self.state = GameState::Lost;
            log::debug!("Hit bomb at {:?}, cleared {} flags", coords, cleared);
            return RevealOutcome::HitBomb;
        }

        if cell.value == 0 {
            self.flood_fill(coords);
        } else {
            let cell = self.grid.cell_mut(coords);
            cell.is_revealed = true;
            cell.is_flagged = false;
        }

        if self.refresh_win_state() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Breadth-first reveal of the blank region around `start` and its numbered border.
    fn flood_fill(&mut self, start: Coord2) {
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = self.grid.cell_mut(visit_coords);
            if cell.is_revealed {
                continue;
            }

            cell.is_revealed = true;
            cell.is_flagged = false;
            log::trace!("Flood opened cell at {:?}, value: {}", visit_coords, cell.value);

            if cell.is_blank() {
                to_visit.extend(
                    self.grid
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| !self.grid[pos].is_revealed),
                );
            }
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.grid
            .iter_neighbors(coords)
            .filter(|&pos| self.grid[pos].is_flagged)
            .count() as u8
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
