use serde::{Deserialize, Serialize};

/// One square of the board, as stored by the grid and handed out for rendering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Number of bombs among the 8-connected neighbors.
    pub value: u8,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub is_bomb: bool,
}

impl Cell {
    /// Whether a reveal should open the neighbors of this cell too.
    pub const fn is_blank(self) -> bool {
        !self.is_bomb && self.value == 0
    }

    /// Hidden and not flagged, the only cells a chord will open.
    pub const fn is_covered(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }
}
