use crate::game::{Board, Game, GameOutcome};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::board_widget::{player_color, render_board};

/// Everything the game screen needs for one frame.
pub struct View<'a> {
    pub game: &'a Game,
    /// Board to draw; differs from the game board while explosions replay.
    pub board: &'a Board,
    pub selected: (usize, usize),
    pub message: Option<&'a str>,
    pub time_left: Option<u64>,
    pub resolving: bool,
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Board + players
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(28)])
        .split(chunks[1]);

    let selected = (!view.game.is_finished()).then_some(view.selected);
    render_board(
        frame,
        view.board,
        view.game.players(),
        selected,
        view.game.last_move(),
        middle[0],
    );
    render_players(frame, view.game, middle[1]);
    render_message(frame, view.message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, view: &View, area: Rect) {
    let game = view.game;
    let players = game.players();

    let (status, color) = match game.outcome() {
        Some(GameOutcome::Winner(id)) => {
            let name = game.player(id).map_or(id.as_str(), |p| p.name.as_str());
            (format!("{name} won!"), player_color(players, id))
        }
        Some(GameOutcome::Draw) => ("Draw".to_string(), Color::White),
        None => {
            let current = game.current_player();
            let mut status = format!("{}'s turn", current.name);
            if view.resolving {
                status.push_str("  |  resolving...");
            } else if let Some(secs) = view.time_left {
                status.push_str(&format!("  |  {secs}s left"));
            }
            (status, player_color(players, &current.id))
        }
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Chain Reaction  |  move {}", game.move_count())),
        );

    frame.render_widget(header, area);
}

fn render_players(frame: &mut Frame, game: &Game, area: Rect) {
    let players = game.players();
    let current = (!game.is_finished()).then(|| game.cursor());

    let lines: Vec<Line> = players
        .iter()
        .enumerate()
        .map(|(idx, player)| {
            let marker = if current == Some(idx) { "> " } else { "  " };
            let mut style = Style::default().fg(player_color(players, &player.id));
            if !player.is_active {
                style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
            }
            let orbs = game.board().orbs_of(&player.id);
            let admin = if player.is_admin { " *" } else { "" };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{}{admin}", player.name), style),
                Span::raw(format!("  {orbs}")),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Players"));
    frame.render_widget(widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line = Line::from(
        "Arrows: Move  |  Enter: Place  |  A: Auto  |  S: Skip  |  R: Restart  |  Q: Quit",
    );

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
