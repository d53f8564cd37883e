use crate::game::{Board, Player, PlayerId};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PLAYER_COLORS: [Color; 8] = [
    Color::Rgb(0xff, 0x55, 0x55),
    Color::Rgb(0x50, 0xfa, 0x7b),
    Color::Rgb(0xbd, 0x93, 0xf9),
    Color::Rgb(0xff, 0xb8, 0x6c),
    Color::Cyan,
    Color::Yellow,
    Color::Blue,
    Color::White,
];

/// Display colour for a player, by seat position.
pub fn player_color(players: &[Player], id: &PlayerId) -> Color {
    players
        .iter()
        .position(|p| p.id == *id)
        .map_or(Color::Gray, |idx| PLAYER_COLORS[idx % PLAYER_COLORS.len()])
}

/// Render the grid. Cells one orb short of exploding are drawn bold, the
/// selected cell reversed, and the last placement underlined.
pub fn render_board(
    frame: &mut Frame,
    board: &Board,
    players: &[Player],
    selected: Option<(usize, usize)>,
    last_move: Option<(usize, usize)>,
    area: Rect,
) {
    let mut lines = Vec::with_capacity(board.rows());

    for row in 0..board.rows() {
        let mut spans = Vec::with_capacity(board.cols());
        for col in 0..board.cols() {
            let cell = board.get(row, col);
            let (symbol, mut style) = match &cell.owner {
                None => (" \u{b7}  ".to_string(), Style::default().fg(Color::DarkGray)),
                Some(owner) => (
                    format!(" {:<2} ", cell.orbs),
                    Style::default().fg(player_color(players, owner)),
                ),
            };

            if cell.orbs + 1 == board.critical_mass(row, col) {
                style = style.add_modifier(Modifier::BOLD);
            }
            if last_move == Some((row, col)) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if selected == Some((row, col)) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(symbol, style));
        }
        lines.push(Line::from(spans));
    }

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Board"));
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_color_by_seat() {
        let players = vec![Player::new("a", "A"), Player::new("b", "B")];
        assert_eq!(player_color(&players, &PlayerId::from("a")), PLAYER_COLORS[0]);
        assert_eq!(player_color(&players, &PlayerId::from("b")), PLAYER_COLORS[1]);
        assert_eq!(player_color(&players, &PlayerId::from("z")), Color::Gray);
    }
}
