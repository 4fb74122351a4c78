//! Core Connect Four board logic: grid representation, gravity placement,
//! win scanning and piece types. Knows nothing about players or turns.

mod board;
mod piece;

pub use board::{Board, Cell, Grid, PlaceError, COLS, ROWS, WIN_LENGTH};
pub use piece::Piece;
