use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::game::{Board, Piece};

/// One-ply computer player: takes an immediate win when one exists,
/// otherwise drops into a uniformly random non-full column. It never
/// looks at the opponent's threats.
pub struct GreedyOpponent {
    rng: StdRng,
}

impl GreedyOpponent {
    pub fn new() -> Self {
        GreedyOpponent {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic opponent for reproducible games and tests.
    pub fn with_seed(seed: u64) -> Self {
        GreedyOpponent {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick the column to play `piece` in. `None` only on a full board.
    pub fn choose_column(&mut self, board: &Board, piece: Piece) -> Option<usize> {
        if let Some(col) = board.find_next_winning_column(piece) {
            debug!(col, %piece, "opponent found winning column");
            return Some(col);
        }
        let col = board.random_legal_column(&mut self.rng);
        debug!(?col, %piece, "opponent picked random column");
        col
    }
}

impl Default for GreedyOpponent {
    fn default() -> Self {
        Self::new()
    }
}
