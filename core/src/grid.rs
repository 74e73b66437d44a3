use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size board of cells, indexed by `(x, y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Cell>", into = "Array2<Cell>")]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// A board with no bombs, nothing revealed and nothing flagged.
    pub fn empty(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    /// Builds a board with bombs at exactly `bomb_coords`, duplicates are ignored.
    pub fn from_bomb_coords(size: Coord2, bomb_coords: &[Coord2]) -> Result<Self> {
        let mut grid = Self::empty(size);
        for &coords in bomb_coords {
            let coords = grid.validate_coords(coords)?;
            grid.place_bomb(coords);
        }
        Ok(grid)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.cells.dim();
        (x as Coord, y as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (x, y) = self.size();
        mult(x, y)
    }

    pub fn cell(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn bomb_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_bomb)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.bomb_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_revealed)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_flagged)
    }

    pub fn bomb_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_bomb)
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }

    /// Bombs around `coords`, counted from scratch rather than read from `value`.
    pub fn adjacent_bomb_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_bomb)
            .count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Puts a bomb at `coords` and bumps the value of each neighbor.
    ///
    /// Returns `false` without touching anything if a bomb is already there.
    pub fn place_bomb(&mut self, coords: Coord2) -> bool {
        if self[coords].is_bomb {
            return false;
        }

        self.cell_mut(coords).is_bomb = true;
        for pos in self.iter_neighbors(coords) {
            self.cell_mut(pos).value += 1;
        }
        true
    }

    /// Removes every flag on the board, returning how many there were.
    pub(crate) fn clear_flags(&mut self) -> CellCount {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.is_flagged) {
            cell.is_flagged = false;
            cleared += 1;
        }
        cleared
    }

    /// Copies the flags of `other` onto the hidden cells of this board.
    pub(crate) fn carry_flags_from(&mut self, other: &Grid) {
        for (cell, previous) in self.cells.iter_mut().zip(other.cells.iter()) {
            cell.is_flagged = previous.is_flagged && !cell.is_revealed;
        }
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells.iter().filter(|&cell| predicate(cell)).count() as CellCount
    }
}

impl TryFrom<Array2<Cell>> for Grid {
    type Error = GameError;

    /// Rejects boards that `Coord` cannot address.
    fn try_from(cells: Array2<Cell>) -> Result<Self> {
        let (x, y) = cells.dim();
        let max = Coord::MAX as usize;
        if x == 0 || y == 0 || x > max || y > max {
            return Err(GameError::InvalidSize);
        }
        Ok(Self { cells })
    }
}

impl From<Grid> for Array2<Cell> {
    fn from(grid: Grid) -> Self {
        grid.cells
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn empty_grid_is_blank() {
        let grid = Grid::empty((20, 10));

        assert_eq!(grid.size(), (20, 10));
        assert_eq!(grid.total_cells(), 200);
        assert_eq!(grid.bomb_count(), 0);
        assert_eq!(grid.revealed_count(), 0);
        assert_eq!(grid.flagged_count(), 0);
        assert_eq!(grid.cell((19, 9)), Cell::default());
    }

    #[test]
    fn placing_bombs_updates_neighbor_values() {
        let grid = Grid::from_bomb_coords((3, 3), &[(0, 0), (2, 0)]).unwrap();

        assert_eq!(grid.bomb_count(), 2);
        assert_eq!(grid[(1, 0)].value, 2);
        assert_eq!(grid[(1, 1)].value, 2);
        assert_eq!(grid[(0, 1)].value, 1);
        assert_eq!(grid[(1, 2)].value, 0);
        assert!(grid[(0, 0)].is_bomb);
    }

    #[test]
    fn values_match_recount_for_every_cell() {
        let bombs = [(0, 0), (1, 1), (3, 2), (4, 4), (0, 4)];
        let grid = Grid::from_bomb_coords((5, 5), &bombs).unwrap();

        for x in 0..5 {
            for y in 0..5 {
                assert_eq!(grid[(x, y)].value, grid.adjacent_bomb_count((x, y)));
            }
        }
    }

    #[test]
    fn placing_the_same_bomb_twice_is_ignored() {
        let mut grid = Grid::from_bomb_coords((3, 3), &[(1, 1)]).unwrap();

        assert!(!grid.place_bomb((1, 1)));
        assert_eq!(grid.bomb_count(), 1);
        assert_eq!(grid[(0, 0)].value, 1);
    }

    #[test]
    fn out_of_range_bomb_is_rejected() {
        assert_eq!(
            Grid::from_bomb_coords((3, 3), &[(3, 0)]),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(
            Grid::empty((3, 3)).validate_coords((0, 3)),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn bomb_coords_lists_every_bomb() {
        let grid = Grid::from_bomb_coords((4, 2), &[(3, 1), (0, 0)]).unwrap();
        let mut coords: Vec<_> = grid.bomb_coords().collect();
        coords.sort();

        assert_eq!(coords, [(0, 0), (3, 1)]);
    }

    #[test]
    fn clear_flags_counts_removed_flags() {
        let mut grid = Grid::empty((2, 2));
        grid.cell_mut((0, 0)).is_flagged = true;
        grid.cell_mut((1, 1)).is_flagged = true;

        assert_eq!(grid.clear_flags(), 2);
        assert_eq!(grid.flagged_count(), 0);
    }

    #[test]
    fn deserialize_keeps_board_state() {
        let mut grid = Grid::from_bomb_coords((4, 3), &[(3, 2)]).unwrap();
        grid.cell_mut((0, 0)).is_revealed = true;
        grid.cell_mut((1, 2)).is_flagged = true;

        let json = serde_json::to_string(&grid).unwrap();
        let loaded: Grid = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, grid);
        assert_eq!(loaded.size(), (4, 3));
    }

    #[test]
    fn deserialize_rejects_unaddressable_size() {
        let too_wide = serde_json::to_value(Array2::<Cell>::default((300, 1))).unwrap();
        assert!(serde_json::from_value::<Grid>(too_wide).is_err());

        let empty = serde_json::to_value(Array2::<Cell>::default((0, 4))).unwrap();
        assert!(serde_json::from_value::<Grid>(empty).is_err());

        assert_eq!(
            Grid::try_from(Array2::<Cell>::default((256, 2))),
            Err(GameError::InvalidSize)
        );
        assert!(Grid::try_from(Array2::<Cell>::default((255, 255))).is_ok());
    }
}
