use std::io;
use std::rc::Rc;

use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{backend::Backend, Terminal};
use tracing::debug;

use crate::error::{MoveError, RegistrationError};
use crate::game::PlaceError;
use crate::session::{GameEvent, GameMode, Phase, Recorder, Session, Slot};

use super::game_view::{self, GameView};

/// One keyboard seat registered as a player.
struct Seat {
    listener: Rc<Recorder>,
    id: String,
}

pub struct App {
    session: Session,
    seats: Vec<Seat>,
    spectator: Rc<Recorder>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    /// Wrap a fresh session: registers a spectator feed and as many
    /// keyboard seats as the mode requires.
    pub fn new(session: Session) -> Result<Self, RegistrationError> {
        let mut app = App {
            selected_column: session.column_count() / 2,
            session,
            seats: Vec::new(),
            spectator: Rc::new(Recorder::new()),
            should_quit: false,
            message: None,
        };
        app.seat_players()?;
        Ok(app)
    }

    fn seat_players(&mut self) -> Result<(), RegistrationError> {
        self.spectator = Rc::new(Recorder::new());
        self.session.register_listener(&self.spectator, false)?;

        self.seats.clear();
        for _ in 0..self.session.required_player_count() {
            let listener = Rc::new(Recorder::new());
            let info = self.session.register_listener(&listener, true)?;
            self.seats.push(Seat {
                listener,
                id: info.id,
            });
        }
        self.message = self.drain_events();
        Ok(())
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.session.column_count() {
                    self.selected_column += 1;
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let column = c as usize - '1' as usize;
                if column < self.session.column_count() {
                    self.selected_column = column;
                    self.drop_piece();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.drop_piece(),
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
    }

    /// Seat whose keyboard input goes to the session next
    fn active_seat(&self) -> Option<&Seat> {
        let slot = match self.session.mode() {
            GameMode::HumanVsHuman => self.session.current_turn()?,
            GameMode::HumanVsComputer => Slot::First,
        };
        self.seats.get(slot.index())
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        let Some(listener) = self.active_seat().map(|seat| Rc::clone(&seat.listener)) else {
            self.message = Some("Game over! Press 'r' to restart.".to_string());
            return;
        };

        let result = self
            .session
            .select_column_for_move(&listener, self.selected_column);
        let from_events = self.drain_events();

        self.message = match result {
            Ok(summary) => match (from_events, summary.reply) {
                (Some(msg), _) => Some(msg),
                (None, Some(reply)) => Some(format!("Computer played column {}", reply.column + 1)),
                (None, None) => None,
            },
            Err(MoveError::InvalidMove(PlaceError::ColumnFull)) => {
                Some("Column is full!".to_string())
            }
            Err(MoveError::InvalidMove(PlaceError::InvalidColumn)) => {
                Some("Invalid column!".to_string())
            }
            Err(_) => from_events,
        };
    }

    fn restart(&mut self) {
        if !self.session.phase().is_terminal() {
            self.message = Some("Finish the current game before restarting.".to_string());
            return;
        }
        match self
            .session
            .reset_game(false)
            .map_err(|e| e.to_string())
            .and_then(|()| self.seat_players().map_err(|e| e.to_string()))
        {
            Ok(()) => {
                self.selected_column = self.session.column_count() / 2;
                self.message = Some("New game started!".to_string());
            }
            Err(e) => self.message = Some(format!("Restart failed: {e}")),
        }
    }

    fn quit(&mut self) {
        // A game in progress cannot be reset; then we just leave.
        if self.session.phase() != Phase::InProgress && self.session.reset_game(true).is_ok() {
            let released = self.spectator.take().contains(&GameEvent::ShutDown);
            debug!(released, "listeners shut down");
        }
        self.should_quit = true;
    }

    /// Collect pending notifications and turn the most relevant one into a
    /// status message.
    fn drain_events(&self) -> Option<String> {
        let mut events = self.spectator.take();
        for seat in &self.seats {
            events.extend(seat.listener.take());
        }
        events.iter().rev().find_map(|event| self.describe(event))
    }

    fn describe(&self, event: &GameEvent) -> Option<String> {
        match event {
            GameEvent::Started { first_mover } => {
                Some(format!("Game on! {first_mover} (Yellow) moves first."))
            }
            GameEvent::InvalidTurn => Some("Not your turn!".to_string()),
            GameEvent::InvalidMove => Some("Invalid move!".to_string()),
            GameEvent::NotInProgress => Some("Game is over! Press 'r' to restart.".to_string()),
            GameEvent::Won(piece) => {
                let who = match self.session.mode() {
                    GameMode::HumanVsComputer if *piece == Slot::Second.piece() => {
                        "Computer".to_string()
                    }
                    _ => self
                        .seats
                        .iter()
                        .zip([Slot::First, Slot::Second])
                        .find(|(_, slot)| slot.piece() == *piece)
                        .map(|(seat, _)| seat.id.clone())
                        .unwrap_or_default(),
                };
                Some(format!("{who} ({piece}) wins! Press 'r' to restart."))
            }
            GameEvent::Tied => Some("It's a draw! Press 'r' to restart.".to_string()),
            GameEvent::MoveAccepted | GameEvent::ShutDown => None,
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let view = GameView {
            grid: self.session.board_snapshot(),
            phase: self.session.phase(),
            turn: self.active_seat().map(|seat| seat.id.as_str()),
            turn_piece: self.session.current_turn().map(Slot::piece),
            mode: self.session.mode(),
            selected_column: self.selected_column,
            message: self.message.as_deref(),
        };
        game_view::render(frame, &view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(mode: GameMode) -> App {
        let config = SessionConfig {
            seed: Some(4),
            ..SessionConfig::new(mode)
        };
        App::new(Session::new(config).unwrap()).unwrap()
    }

    #[test]
    fn test_new_app_starts_game() {
        let app = app(GameMode::HumanVsHuman);
        assert_eq!(app.session.phase(), Phase::InProgress);
        assert_eq!(app.seats.len(), 2);
        assert_eq!(app.selected_column, 3);
        assert_eq!(
            app.message.as_deref(),
            Some("Game on! Player1 (Yellow) moves first.")
        );
    }

    #[test]
    fn test_digit_keys_drop_for_active_seat() {
        let mut app = app(GameMode::HumanVsHuman);
        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('2')));

        let grid = app.session.board_snapshot();
        let bottom = grid.len() - 1;
        assert_eq!(grid[bottom][0], crate::game::Cell::Yellow);
        assert_eq!(grid[bottom][1], crate::game::Cell::Red);
        assert_eq!(app.session.current_turn(), Some(Slot::First));
    }

    #[test]
    fn test_arrows_stay_on_board() {
        let mut app = app(GameMode::HumanVsHuman);
        for _ in 0..10 {
            app.handle_key(key(KeyCode::Right));
        }
        assert_eq!(app.selected_column, app.session.column_count() - 1);
        for _ in 0..10 {
            app.handle_key(key(KeyCode::Left));
        }
        assert_eq!(app.selected_column, 0);
    }

    #[test]
    fn test_full_column_message() {
        let mut app = app(GameMode::HumanVsHuman);
        // Alternate between columns 0 and 1 so nobody lines up four
        for n in 0..6 {
            let c = if n % 4 < 2 { '1' } else { '2' };
            app.handle_key(key(KeyCode::Char(c)));
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.message.as_deref(), Some("Column is full!"));
    }

    #[test]
    fn test_restart_only_after_game_ends() {
        let mut app = app(GameMode::HumanVsHuman);
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(
            app.message.as_deref(),
            Some("Finish the current game before restarting.")
        );

        for c in ['1', '1', '2', '2', '3', '3', '4'] {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.session.phase(), Phase::Won(crate::game::Piece::Yellow));
        assert_eq!(
            app.message.as_deref(),
            Some("Player1 (Yellow) wins! Press 'r' to restart.")
        );

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.session.phase(), Phase::InProgress);
        assert_eq!(app.message.as_deref(), Some("New game started!"));
        assert!(app
            .session
            .board_snapshot()
            .iter()
            .flatten()
            .all(|&c| c == crate::game::Cell::Empty));
    }

    #[test]
    fn test_computer_reply_is_reported() {
        let mut app = app(GameMode::HumanVsComputer);
        app.handle_key(key(KeyCode::Enter));
        let msg = app.message.clone().unwrap();
        assert!(msg.starts_with("Computer played column"), "{msg}");
    }

    #[test]
    fn test_quit() {
        let mut app = app(GameMode::HumanVsHuman);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
