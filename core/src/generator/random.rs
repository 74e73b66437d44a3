use ndarray::Array2;

use super::*;

/// Uniformly random bomb placement that never puts a bomb on the first-clicked cell.
///
/// Each bomb picks an index among the cells still free and walks the board to it, so the number of random draws is
/// bounded by the bomb count instead of retrying on collisions.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
    avoid: Coord2,
}

impl RandomGridGenerator {
    pub fn new(seed: u64, avoid: Coord2) -> Self {
        Self { seed, avoid }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, config: GameConfig) -> Grid {
        use rand::prelude::*;

        let mut grid = Grid::empty(config.size);
        let mut occupied: Array2<bool> = Array2::default(config.size.to_nd_index());

        let mut free_cells = config.total_cells();
        match grid.validate_coords(self.avoid) {
            Ok(avoid) => {
                occupied[avoid.to_nd_index()] = true;
                free_cells -= 1;
            }
            Err(_) => log::warn!(
                "Start cell {:?} is outside a {:?} grid, nothing to avoid",
                self.avoid,
                config.size
            ),
        }

        if config.bombs > free_cells {
            log::warn!(
                "Grid too small, requested {} bombs but only {} fit",
                config.bombs,
                free_cells
            );
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut bombs_placed = 0;
        while bombs_placed < config.bombs && free_cells > 0 {
            let place = usize::from(rng.random_range(0..free_cells));
            let Some(((x, y), slot)) = occupied
                .indexed_iter_mut()
                .filter(|(_, taken)| !**taken)
                .nth(place)
            else {
                break;
            };

            *slot = true;
            grid.place_bomb((x as Coord, y as Coord));
            bombs_placed += 1;
            free_cells -= 1;
        }

        log::debug!(
            "Generated {:?} grid with {} bombs avoiding {:?}",
            config.size,
            bombs_placed,
            self.avoid
        );
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_grid_has_exact_bomb_count_and_safe_start() {
        let config = GameConfig::classic();

        for seed in 0..200 {
            let avoid = ((seed % 20) as Coord, (seed % 10) as Coord);
            let grid = RandomGridGenerator::new(seed, avoid).generate(config);

            assert_eq!(grid.bomb_count(), 40, "seed {seed}");
            assert!(!grid[avoid].is_bomb, "seed {seed}");
        }
    }

    #[test]
    fn values_are_consistent_with_final_layout() {
        let config = GameConfig::classic();

        for seed in 0..50 {
            let grid = RandomGridGenerator::new(seed, (0, 0)).generate(config);
            let (width, height) = grid.size();
            for x in 0..width {
                for y in 0..height {
                    assert_eq!(grid[(x, y)].value, grid.adjacent_bomb_count((x, y)));
                }
            }
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::classic();

        let a = RandomGridGenerator::new(7, (3, 3)).generate(config);
        let b = RandomGridGenerator::new(7, (3, 3)).generate(config);

        assert_eq!(a, b);
    }

    #[test]
    fn three_by_three_never_bombs_first_click() {
        let config = GameConfig::new((3, 3), 1);

        for seed in 0..100 {
            let grid = RandomGridGenerator::new(seed, (0, 0)).generate(config);

            assert_eq!(grid.bomb_count(), 1);
            assert!(!grid[(0, 0)].is_bomb);
        }
    }

    #[test]
    fn full_grid_fills_everything_but_start() {
        let config = GameConfig::new_unchecked((3, 2), 6);

        let grid = RandomGridGenerator::new(1, (2, 1)).generate(config);

        assert_eq!(grid.bomb_count(), 5);
        assert!(!grid[(2, 1)].is_bomb);
    }
}
