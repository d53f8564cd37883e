use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crate::ai::{Agent, RandomAgent};
use crate::config::UiConfig;
use crate::game::{Board, Game, MoveReport, PlayerId};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use super::game_view::{self, View};

pub struct App {
    game: Game,
    ui: UiConfig,
    selected: (usize, usize),
    /// Explosion snapshots still to be shown for the last move.
    frames: VecDeque<Board>,
    last_frame: Instant,
    turn_started: Instant,
    agent: RandomAgent,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(game: Game, ui: UiConfig) -> Self {
        App {
            game,
            ui,
            selected: (0, 0),
            frames: VecDeque::new(),
            last_frame: Instant::now(),
            turn_started: Instant::now(),
            agent: RandomAgent::new(),
            should_quit: false,
            message: None,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.tick();
            self.handle_events()?;
        }
        Ok(())
    }

    fn step_delay(&self) -> Duration {
        Duration::from_millis(self.ui.step_delay_ms)
    }

    fn is_resolving(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Advance the explosion replay and enforce the turn timer
    fn tick(&mut self) {
        if self.is_resolving() {
            if self.last_frame.elapsed() >= self.step_delay() {
                self.frames.pop_front();
                self.last_frame = Instant::now();
                if self.frames.is_empty() {
                    self.turn_started = Instant::now();
                }
            }
            return;
        }

        if self.time_left() == Some(0) {
            let name = self.game.current_player().name.clone();
            if self.game.skip_turn().is_ok() {
                self.message = Some(format!("{name} ran out of time"));
                self.turn_started = Instant::now();
            }
        }
    }

    /// Whole seconds left on the current turn, if the timer is running
    fn time_left(&self) -> Option<u64> {
        let limit = self.ui.turn_time_limit_secs;
        if limit == 0 || self.game.is_finished() {
            return None;
        }
        Some(limit.saturating_sub(self.turn_started.elapsed().as_secs()))
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        let timeout = if self.is_resolving() {
            self.step_delay().min(Duration::from_millis(100))
        } else {
            Duration::from_millis(100)
        };
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        let (rows, cols) = (self.game.board().rows(), self.game.board().cols());
        let (row, col) = self.selected;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up if row > 0 => self.selected = (row - 1, col),
            KeyCode::Down if row + 1 < rows => self.selected = (row + 1, col),
            KeyCode::Left if col > 0 => self.selected = (row, col - 1),
            KeyCode::Right if col + 1 < cols => self.selected = (row, col + 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.place(row, col);
            }
            KeyCode::Char('a') => {
                match self.agent.select_move(&self.game) {
                    Some((r, c)) => self.place(r, c),
                    None => self.message = Some("No legal move available".to_string()),
                }
            }
            KeyCode::Char('s') => {
                if self.is_resolving() {
                    return;
                }
                match self.game.skip_turn() {
                    Ok(next) => {
                        self.message = Some(format!("Turn skipped, {} is up", self.name_of(&next)));
                        self.turn_started = Instant::now();
                    }
                    Err(e) => self.message = Some(e.to_string()),
                }
            }
            KeyCode::Char('r') => {
                if let Err(e) = self.game.restart() {
                    self.message = Some(e.to_string());
                    return;
                }
                self.frames.clear();
                self.selected = (0, 0);
                self.turn_started = Instant::now();
                self.message = Some("New game started!".to_string());
            }
            _ => {}
        }
    }

    /// Place an orb for the current player and queue the explosion replay
    fn place(&mut self, row: usize, col: usize) {
        if self.is_resolving() {
            self.message = Some("Wait for the explosions to settle".to_string());
            return;
        }
        if self.game.is_finished() {
            self.message = Some("Game over! Press 'r' to restart.".to_string());
            return;
        }

        let current = self.game.current_player().id.clone();
        let mut steps: Vec<Board> = Vec::new();
        match self.game.submit_move(&current, row, col, &mut steps) {
            Ok(report) => {
                self.message = self.describe(&report);
                if report.resolution.exploded() && self.ui.step_delay_ms > 0 {
                    self.frames = steps.into();
                }
                self.last_frame = Instant::now();
                self.turn_started = Instant::now();
            }
            Err(e) => {
                self.message = Some(e.to_string());
            }
        }
    }

    fn describe(&self, report: &MoveReport) -> Option<String> {
        if let Some(winner) = self.game.winner() {
            return Some(format!(
                "{} wins! Press 'r' to play again.",
                self.name_of(winner)
            ));
        }
        if report.eliminated.is_empty() {
            return None;
        }
        let names: Vec<&str> = report.eliminated.iter().map(|id| self.name_of(id)).collect();
        Some(format!("Eliminated: {}", names.join(", ")))
    }

    fn name_of<'a>(&'a self, id: &'a PlayerId) -> &'a str {
        self.game
            .player(id)
            .map_or(id.as_str(), |p| p.name.as_str())
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let view = View {
            game: &self.game,
            board: self.frames.front().unwrap_or(self.game.board()),
            selected: self.selected,
            message: self.message.as_deref(),
            time_left: self.time_left(),
            resolving: self.is_resolving(),
        };
        game_view::render(frame, &view);
    }
}
