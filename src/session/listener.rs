use std::cell::RefCell;

use crate::game::Piece;

/// Receiver of session notifications. Every method is a one-way call and
/// defaults to doing nothing, so listeners only override what they show.
///
/// Callbacks run while the session is mutably borrowed; a listener must not
/// try to call back into the session from inside one.
pub trait Listener {
    /// All required players are seated; `first_mover` is the id of the seat
    /// that opens.
    fn game_started(&self, _first_mover: &str) {}

    /// A move landed; pull a fresh board snapshot.
    fn move_accepted(&self) {}

    /// Sent only to the caller that moved out of turn.
    fn invalid_turn(&self) {}

    /// Sent only to the caller that picked a full or out-of-range column.
    fn invalid_move(&self) {}

    /// Sent only to a caller that moved before the game started or after it ended.
    fn not_in_progress(&self) {}

    fn game_won(&self, _winner: Piece) {}

    fn game_tied(&self) {}

    /// The session is being reset; release any outside resources.
    fn shut_down(&self) {}
}

/// Fixed player position, bound to one piece for the session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn from_index(index: usize) -> Option<Slot> {
        match index {
            0 => Some(Slot::First),
            1 => Some(Slot::Second),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    pub fn piece(self) -> Piece {
        match self {
            Slot::First => Piece::Yellow,
            Slot::Second => Piece::Red,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Slot::First => "Player1",
            Slot::Second => "Player2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Observer,
    Player { slot: Slot, piece: Piece },
}

/// Returned to a listener on successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerInfo {
    pub id: String,
    pub role: Role,
}

impl ListenerInfo {
    pub fn piece(&self) -> Option<Piece> {
        match self.role {
            Role::Observer => None,
            Role::Player { piece, .. } => Some(piece),
        }
    }

    pub fn slot(&self) -> Option<Slot> {
        match self.role {
            Role::Observer => None,
            Role::Player { slot, .. } => Some(slot),
        }
    }
}

/// A notification as data, one variant per [`Listener`] method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started { first_mover: String },
    MoveAccepted,
    InvalidTurn,
    InvalidMove,
    NotInProgress,
    Won(Piece),
    Tied,
    ShutDown,
}

/// Listener that keeps every notification it receives, in order.
#[derive(Debug, Default)]
pub struct Recorder {
    events: RefCell<Vec<GameEvent>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<GameEvent> {
        self.events.take()
    }

    pub fn last(&self) -> Option<GameEvent> {
        self.events.borrow().last().cloned()
    }

    pub fn count(&self, event: &GameEvent) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }

    fn push(&self, event: GameEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Listener for Recorder {
    fn game_started(&self, first_mover: &str) {
        self.push(GameEvent::Started {
            first_mover: first_mover.to_string(),
        });
    }

    fn move_accepted(&self) {
        self.push(GameEvent::MoveAccepted);
    }

    fn invalid_turn(&self) {
        self.push(GameEvent::InvalidTurn);
    }

    fn invalid_move(&self) {
        self.push(GameEvent::InvalidMove);
    }

    fn not_in_progress(&self) {
        self.push(GameEvent::NotInProgress);
    }

    fn game_won(&self, winner: Piece) {
        self.push(GameEvent::Won(winner));
    }

    fn game_tied(&self) {
        self.push(GameEvent::Tied);
    }

    fn shut_down(&self) {
        self.push(GameEvent::ShutDown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_pieces_and_ids() {
        assert_eq!(Slot::First.piece(), Piece::Yellow);
        assert_eq!(Slot::Second.piece(), Piece::Red);
        assert_eq!(Slot::First.id(), "Player1");
        assert_eq!(Slot::Second.id(), "Player2");
        assert_eq!(Slot::First.other(), Slot::Second);
        assert_eq!(Slot::from_index(1), Some(Slot::Second));
        assert_eq!(Slot::from_index(2), None);
    }

    #[test]
    fn test_listener_info_accessors() {
        let player = ListenerInfo {
            id: "Player2".into(),
            role: Role::Player {
                slot: Slot::Second,
                piece: Piece::Red,
            },
        };
        assert_eq!(player.piece(), Some(Piece::Red));
        assert_eq!(player.slot(), Some(Slot::Second));

        let observer = ListenerInfo {
            id: "Listener0".into(),
            role: Role::Observer,
        };
        assert_eq!(observer.piece(), None);
        assert_eq!(observer.slot(), None);
    }

    #[test]
    fn test_recorder_keeps_order() {
        let recorder = Recorder::new();
        recorder.game_started("Player1");
        recorder.move_accepted();
        recorder.game_won(Piece::Yellow);

        assert_eq!(
            recorder.events(),
            vec![
                GameEvent::Started {
                    first_mover: "Player1".into()
                },
                GameEvent::MoveAccepted,
                GameEvent::Won(Piece::Yellow),
            ]
        );
        assert_eq!(recorder.last(), Some(GameEvent::Won(Piece::Yellow)));
        assert_eq!(recorder.take().len(), 3);
        assert!(recorder.events().is_empty());
    }
}
