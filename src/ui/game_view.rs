use crate::game::{Cell, Grid, Piece};
use crate::session::{GameMode, Phase};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Everything the game screen shows, pulled from the session each frame.
pub struct GameView<'a> {
    pub grid: Grid,
    pub phase: Phase,
    pub turn: Option<&'a str>,
    pub turn_piece: Option<Piece>,
    pub mode: GameMode,
    pub selected_column: usize,
    pub message: Option<&'a str>,
}

pub fn render(frame: &mut Frame, view: &GameView) {
    let rows = view.grid.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),        // Header
            Constraint::Min(rows + 4),    // Board
            Constraint::Length(3),        // Message
            Constraint::Length(3),        // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_board(frame, &view.grid, view.selected_column, chunks[1]);
    render_message(frame, view.message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn piece_color(piece: Piece) -> Color {
    match piece {
        Piece::Yellow => Color::Yellow,
        Piece::Red => Color::Red,
    }
}

fn render_header(frame: &mut Frame, view: &GameView, area: ratatui::layout::Rect) {
    let mode = view.mode.name();
    let (status, color) = match view.phase {
        Phase::AwaitingPlayers => (format!("Waiting for players  |  {mode}"), Color::Gray),
        Phase::Won(piece) => (format!("{piece} wins  |  {mode}"), piece_color(piece)),
        Phase::Tied => (format!("Draw  |  {mode}"), Color::Gray),
        Phase::InProgress => {
            let piece = view.turn_piece.unwrap_or(Piece::Yellow);
            let who = view.turn.unwrap_or("-");
            (
                format!("Current Player: {who} ({piece})  |  {mode}"),
                piece_color(piece),
            )
        }
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    grid: &Grid,
    selected_column: usize,
    area: ratatui::layout::Rect,
) {
    let cols = grid.first().map_or(0, Vec::len);
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..cols {
        let label = format!("{:^3}", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(col_line));

    let rule = "═".repeat(cols * 3 + 1);
    lines.push(Line::from(format!("  ╔{rule}╗")));

    for row in grid {
        let mut row_spans = vec![Span::raw("  ║")];

        for cell in row {
            let (symbol, color) = match cell {
                Cell::Empty => (" . ", Color::DarkGray),
                Cell::Yellow => (" ● ", Color::Yellow),
                Cell::Red => (" ● ", Color::Red),
            };
            row_spans.push(Span::styled(symbol, Style::default().fg(color)));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{rule}╝")));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..cols {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: ratatui::layout::Rect) {
    let text = message.unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: ratatui::layout::Rect) {
    let line = Line::from("←/→: Move  |  Enter/1-9: Drop  |  R: Restart (after game)  |  Q: Quit");

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(view: &GameView) -> String {
        let backend = TestBackend::new(60, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, view)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    #[test]
    fn test_render_in_progress() {
        let mut board = Board::new();
        board.place(3, Piece::Yellow).unwrap();
        let view = GameView {
            grid: board.snapshot(),
            phase: Phase::InProgress,
            turn: Some("Player2"),
            turn_piece: Some(Piece::Red),
            mode: GameMode::HumanVsHuman,
            selected_column: 3,
            message: Some("hello"),
        };
        let text = screen_text(&view);
        assert!(text.contains("Current Player: Player2 (Red)"));
        assert!(text.contains("hello"));
        assert!(text.contains("●"));
    }

    #[test]
    fn test_render_won() {
        let view = GameView {
            grid: Board::with_size(4, 5).snapshot(),
            phase: Phase::Won(Piece::Red),
            turn: None,
            turn_piece: None,
            mode: GameMode::HumanVsComputer,
            selected_column: 0,
            message: None,
        };
        let text = screen_text(&view);
        assert!(text.contains("Red wins"));
        assert!(text.contains("Human vs Computer"));
    }
}
