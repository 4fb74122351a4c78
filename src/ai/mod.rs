//! Automated opponent used by human-vs-computer sessions.

mod opponent;

pub use opponent::GreedyOpponent;
