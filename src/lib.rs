//! # Connect Four
//!
//! A Connect Four game-state engine with a terminal front-end. Sessions host
//! either two humans or a human against a greedy computer opponent; views
//! register as listeners and receive synchronous notifications.
//!
//! ## Modules
//!
//! - [`game`] — Board: gravity placement, win scanning, snapshots
//! - [`session`] — Listener registry, seats, turn gating, game lifecycle
//! - [`ai`] — One-ply greedy opponent
//! - [`ui`] — Terminal UI consuming a session
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod ui;
