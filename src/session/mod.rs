//! Game sessions: listener registry, seat assignment, turn gating and the
//! `AwaitingPlayers -> InProgress -> Won | Tied` lifecycle around one board.
//!
//! A session is explicitly constructed and owned by whoever composes the
//! program. Both modes share one type; the differences live in [`ModeRules`].

mod listener;
mod mode;

use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::ai::GreedyOpponent;
use crate::error::{ConfigError, MoveError, RegistrationError, SessionError};
use crate::game::{Board, Grid, Piece, COLS, ROWS};

pub use listener::{GameEvent, Listener, ListenerInfo, Recorder, Role, Slot};
pub use mode::{GameMode, ModeRules, MoveSource, TurnPolicy};

/// Largest board side accepted by [`SessionConfig::validate`].
pub const MAX_DIMENSION: usize = 64;

/// Session settings, loadable from the `[game]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub rows: usize,
    pub columns: usize,
    /// Seed for the computer opponent; random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            mode: GameMode::HumanVsHuman,
            rows: ROWS,
            columns: COLS,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn new(mode: GameMode) -> Self {
        SessionConfig {
            mode,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.rows > MAX_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "game.rows must be in [1, {MAX_DIMENSION}]"
            )));
        }
        if self.columns == 0 || self.columns > MAX_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "game.columns must be in [1, {MAX_DIMENSION}]"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingPlayers,
    InProgress,
    Won(Piece),
    Tied,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won(_) | Phase::Tied)
    }
}

/// Where a piece landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
    pub piece: Piece,
}

/// Result of an accepted column selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSummary {
    pub placed: Placement,
    /// The computer's answer, in human-vs-computer games that did not end
    /// on the human move.
    pub reply: Option<Placement>,
    pub phase: Phase,
}

struct Registration {
    handle: Weak<dyn Listener>,
    info: ListenerInfo,
}

pub struct Session {
    config: SessionConfig,
    rules: ModeRules,
    board: Board,
    listeners: Vec<Registration>,
    players: Vec<Weak<dyn Listener>>,
    turn: Option<Slot>,
    phase: Phase,
    next_observer_id: usize,
    opponent: GreedyOpponent,
}

impl Session {
    /// Build a session and its board from a validated config.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let opponent = match config.seed {
            Some(seed) => GreedyOpponent::with_seed(seed),
            None => GreedyOpponent::new(),
        };
        Ok(Session {
            rules: config.mode.rules(),
            board: Board::with_size(config.rows, config.columns),
            listeners: Vec::new(),
            players: Vec::new(),
            turn: None,
            phase: Phase::AwaitingPlayers,
            next_observer_id: 0,
            opponent,
            config,
        })
    }

    /// Register a listener, optionally asking for a player seat.
    ///
    /// Observers are always accepted. A player is refused when every seat is
    /// taken or when the same listener is already registered. Seating the
    /// last required player starts the game.
    #[instrument(skip(self, listener), fields(mode = ?self.config.mode))]
    pub fn register_listener<L: Listener + 'static>(
        &mut self,
        listener: &Rc<L>,
        is_player: bool,
    ) -> Result<ListenerInfo, RegistrationError> {
        let handle = Rc::downgrade(listener);
        let handle: Weak<dyn Listener> = handle;
        self.prune_dropped_observers();

        if !is_player {
            let info = ListenerInfo {
                id: format!("Listener{}", self.next_observer_id),
                role: Role::Observer,
            };
            self.next_observer_id += 1;
            if !self.is_registered(&handle) {
                self.listeners.push(Registration {
                    handle,
                    info: info.clone(),
                });
            }
            debug!(id = %info.id, "observer registered");
            return Ok(info);
        }

        let slot = match Slot::from_index(self.players.len()) {
            Some(slot) if self.players.len() < self.rules.required_players => slot,
            _ => {
                debug!("player rejected, slots full");
                return Err(RegistrationError::SlotsFull(self.rules.required_players));
            }
        };
        if self.is_registered(&handle) {
            debug!("player rejected, already registered");
            return Err(RegistrationError::AlreadyRegistered);
        }

        let info = ListenerInfo {
            id: slot.id().to_string(),
            role: Role::Player {
                slot,
                piece: slot.piece(),
            },
        };
        self.players.push(handle.clone());
        self.listeners.push(Registration {
            handle,
            info: info.clone(),
        });
        info!(id = %info.id, piece = %slot.piece(), "player seated");

        if self.players.len() == self.rules.required_players {
            self.phase = Phase::InProgress;
            self.turn = Some(Slot::First);
            info!("all players seated, game started");
            self.broadcast(|l| l.game_started(Slot::First.id()));
        }

        Ok(info)
    }

    /// Drop a piece for `listener` into `column`.
    ///
    /// Refusals notify only the caller and leave the session untouched. On
    /// success every listener hears `move_accepted`, then a win or tie if the
    /// move ended the game. Against the computer the reply move is played
    /// before this returns.
    #[instrument(skip(self, listener), fields(phase = ?self.phase))]
    pub fn select_column_for_move<L: Listener + 'static>(
        &mut self,
        listener: &Rc<L>,
        column: usize,
    ) -> Result<MoveSummary, MoveError> {
        if self.phase != Phase::InProgress {
            debug!("move rejected, game not in progress");
            listener.not_in_progress();
            return Err(MoveError::NotInProgress);
        }

        let handle = Rc::downgrade(listener);
        let handle: Weak<dyn Listener> = handle;
        let slot = match self.seat_allowed_to_move(&handle) {
            Some(slot) => slot,
            None => {
                debug!("move rejected, not this listener's turn");
                listener.invalid_turn();
                return Err(MoveError::InvalidTurn);
            }
        };

        let piece = slot.piece();
        let row = match self.board.place(column, piece) {
            Ok(row) => row,
            Err(err) => {
                debug!(%err, "move rejected");
                listener.invalid_move();
                return Err(MoveError::InvalidMove(err));
            }
        };
        let placed = Placement { row, column, piece };

        self.broadcast(|l| l.move_accepted());
        if self.rules.turn_policy == TurnPolicy::Alternate {
            self.turn = Some(slot.other());
        }

        let mut reply = None;
        if !self.settle(placed) && self.rules.move_source == MoveSource::HumanThenComputer {
            reply = self.play_computer_move(piece.other());
        }

        Ok(MoveSummary {
            placed,
            reply,
            phase: self.phase,
        })
    }

    /// Clear the session back to `AwaitingPlayers` with an empty board.
    ///
    /// Only legal before a game starts or after it ended. With
    /// `shut_listeners` every listener is told to shut down first.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self, shut_listeners: bool) -> Result<(), SessionError> {
        if self.phase == Phase::InProgress {
            return Err(SessionError::ResetWhileInProgress);
        }
        if shut_listeners {
            self.broadcast(|l| l.shut_down());
        }

        self.listeners.clear();
        self.players.clear();
        self.turn = None;
        self.phase = Phase::AwaitingPlayers;
        self.next_observer_id = 0;
        self.board.reset();
        info!("session reset");
        Ok(())
    }

    /// Independent copy of the grid; changing it never touches the session.
    pub fn board_snapshot(&self) -> Grid {
        self.board.snapshot()
    }

    pub fn column_count(&self) -> usize {
        self.board.columns()
    }

    pub fn row_count(&self) -> usize {
        self.board.rows()
    }

    pub fn required_player_count(&self) -> usize {
        self.rules.required_players
    }

    pub fn registered_player_count(&self) -> usize {
        self.players.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seat that may move next in human-vs-human games.
    pub fn current_turn(&self) -> Option<Slot> {
        self.turn
    }

    /// Registration info of every live listener, in registration order.
    pub fn registered(&self) -> Vec<ListenerInfo> {
        self.listeners
            .iter()
            .filter(|r| r.handle.strong_count() > 0)
            .map(|r| r.info.clone())
            .collect()
    }

    /// Forget observers whose listener has been dropped. Player seats stay
    /// put so slot numbering never shifts mid-game.
    fn prune_dropped_observers(&mut self) {
        self.listeners
            .retain(|r| r.handle.strong_count() > 0 || r.info.role != Role::Observer);
    }

    fn is_registered(&self, handle: &Weak<dyn Listener>) -> bool {
        self.listeners
            .iter()
            .any(|r| Weak::ptr_eq(&r.handle, handle))
    }

    fn slot_of(&self, handle: &Weak<dyn Listener>) -> Option<Slot> {
        self.players
            .iter()
            .position(|p| Weak::ptr_eq(p, handle))
            .and_then(Slot::from_index)
    }

    fn seat_allowed_to_move(&self, handle: &Weak<dyn Listener>) -> Option<Slot> {
        let slot = self.slot_of(handle)?;
        let allowed = match self.rules.turn_policy {
            TurnPolicy::Alternate => self.turn == Some(slot),
            TurnPolicy::HumanAlwaysFirst => slot == Slot::First,
        };
        allowed.then_some(slot)
    }

    /// Win check first, then tie. Returns true if the game ended.
    fn settle(&mut self, placed: Placement) -> bool {
        if let Some(winner) = self.board.find_winner(placed.row, placed.column) {
            self.phase = Phase::Won(winner);
            info!(%winner, row = placed.row, column = placed.column, "game won");
            self.broadcast(|l| l.game_won(winner));
            return true;
        }
        if self.board.is_full() {
            self.phase = Phase::Tied;
            info!("board full, game tied");
            self.broadcast(|l| l.game_tied());
            return true;
        }
        false
    }

    fn play_computer_move(&mut self, piece: Piece) -> Option<Placement> {
        let column = self.opponent.choose_column(&self.board, piece)?;
        let row = self
            .board
            .place(column, piece)
            .expect("opponent only picks open columns");
        let placed = Placement { row, column, piece };
        debug!(row, column, "computer moved");

        self.broadcast(|l| l.move_accepted());
        self.settle(placed);
        Some(placed)
    }

    fn broadcast<F: Fn(&dyn Listener)>(&self, notify: F) {
        for registration in &self.listeners {
            if let Some(listener) = registration.handle.upgrade() {
                notify(listener.as_ref());
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
