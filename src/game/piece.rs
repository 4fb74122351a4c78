use super::board::Cell;

/// A player's disk. The first seat always plays Yellow, the second Red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Yellow,
    Red,
}

impl Piece {
    /// Get the opposing piece
    pub fn other(self) -> Piece {
        match self {
            Piece::Yellow => Piece::Red,
            Piece::Red => Piece::Yellow,
        }
    }

    /// Convert piece to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Piece::Yellow => Cell::Yellow,
            Piece::Red => Cell::Red,
        }
    }

    /// Get piece name for display
    pub fn name(self) -> &'static str {
        match self {
            Piece::Yellow => "Yellow",
            Piece::Red => "Red",
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
