use crate::*;
pub use random::*;

mod random;

/// Produces a populated board for a game about to start.
pub trait GridGenerator {
    fn generate(self, config: GameConfig) -> Grid;
}
