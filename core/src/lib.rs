#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod grid;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub bombs: CellCount,
}

impl GameConfig {
    pub const CLASSIC_SIZE: Coord2 = (20, 10);

    pub const fn new_unchecked(size: Coord2, bombs: CellCount) -> Self {
        Self { size, bombs }
    }

    /// Clamps the size to at least one cell per axis and leaves room for a safe first click.
    pub fn new((size_x, size_y): Coord2, bombs: CellCount) -> Self {
        let size_x = size_x.max(1);
        let size_y = size_y.max(1);
        let bombs = bombs.min(mult(size_x, size_y) - 1);
        Self::new_unchecked((size_x, size_y), bombs)
    }

    /// One bomb for every five cells.
    pub fn with_default_density(size: Coord2) -> Self {
        let (size_x, size_y) = size;
        Self::new(size, mult(size_x, size_y) / 5)
    }

    /// The 20x10 board with 40 bombs.
    pub fn classic() -> Self {
        Self::with_default_density(Self::CLASSIC_SIZE)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.bombs)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitBomb,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitBomb => true,
            Won => true,
        }
    }
}

/// Merges the outcomes of a chord, the most significant one wins.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitBomb, _) => HitBomb,
            (_, HitBomb) => HitBomb,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_config_is_twenty_by_ten_with_forty_bombs() {
        let config = GameConfig::classic();

        assert_eq!(config.size, (20, 10));
        assert_eq!(config.bombs, 40);
        assert_eq!(config.safe_cells(), 160);
    }

    #[test]
    fn config_leaves_room_for_first_click() {
        assert_eq!(GameConfig::new((3, 3), 20).bombs, 8);
        assert_eq!(GameConfig::new((0, 0), 5), GameConfig::new_unchecked((1, 1), 0));
    }

    #[test]
    fn hit_bomb_dominates_merged_outcomes() {
        use RevealOutcome::*;

        assert_eq!(Revealed | HitBomb | Won, HitBomb);
        assert_eq!(NoChange | Won, Won);
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
