use std::collections::HashSet;
use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::explosion::{self, Resolution, StepSink};
use super::{rules, turn, Board, Player, PlayerId};
use crate::error::{MoveError, SetupError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner(PlayerId),
    /// Every player was eliminated at once.
    Draw,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Winner(id) => write!(f, "{id} wins"),
            GameOutcome::Draw => f.write_str("draw"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    AwaitingMove,
    Finished(GameOutcome),
}

/// Board geometry and limits for a game instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub rows: usize,
    pub cols: usize,
    pub max_players: usize,
    /// Explosions allowed per move, as a multiple of the cell count.
    pub explosion_cap_factor: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            rows: 9,
            cols: 6,
            max_players: 4,
            explosion_cap_factor: 2,
        }
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub resolution: Resolution,
    /// Players who lost their last cell during this move.
    pub eliminated: Vec<PlayerId>,
    pub outcome: Option<GameOutcome>,
    /// Whose turn it is now; `None` once the game is over.
    pub next_player: Option<PlayerId>,
}

/// One game instance: board, players, turn cursor and outcome.
#[derive(Debug, Clone)]
pub struct Game {
    settings: GameSettings,
    board: Board,
    players: Vec<Player>,
    cursor: usize,
    outcome: Option<GameOutcome>,
    last_move: Option<(usize, usize)>,
    move_count: usize,
}

impl Game {
    /// Start a game on a `rows × cols` board with no player limit
    pub fn new(rows: usize, cols: usize, players: Vec<Player>) -> Result<Self, SetupError> {
        let settings = GameSettings {
            rows,
            cols,
            max_players: usize::MAX,
            ..GameSettings::default()
        };
        Self::with_settings(&settings, players)
    }

    pub fn with_settings(settings: &GameSettings, players: Vec<Player>) -> Result<Self, SetupError> {
        validate_players(&players, settings.max_players)?;
        let board = Board::new(settings.rows, settings.cols)?;
        let players: Vec<Player> = players.iter().map(Player::rejoined).collect();

        info!(
            "new {}x{} game with {} players",
            settings.rows,
            settings.cols,
            players.len()
        );

        Ok(Game {
            settings: settings.clone(),
            board,
            players,
            cursor: 0,
            outcome: None,
            last_move: None,
            move_count: 0,
        })
    }

    /// Replace board and players with a fresh game of the same geometry.
    ///
    /// On error the current game is left untouched.
    pub fn reset(&mut self, players: Vec<Player>) -> Result<(), SetupError> {
        *self = Self::with_settings(&self.settings, players)?;
        Ok(())
    }

    /// Play again with the same players
    pub fn restart(&mut self) -> Result<(), SetupError> {
        let players = self.players.clone();
        self.reset(players)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active)
    }

    /// Index of the player whose turn it is
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.cursor]
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        match &self.outcome {
            Some(GameOutcome::Winner(id)) => Some(id),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn phase(&self) -> GamePhase {
        match &self.outcome {
            Some(outcome) => GamePhase::Finished(outcome.clone()),
            None => GamePhase::AwaitingMove,
        }
    }

    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Number of accepted moves since the game started
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Cells the current player may place on
    pub fn legal_moves(&self) -> Vec<(usize, usize)> {
        if self.is_finished() {
            return Vec::new();
        }
        let current = &self.current_player().id;
        self.board
            .iter()
            .filter(|(_, _, cell)| cell.owner.as_ref().map_or(true, |o| o == current))
            .map(|(row, col, _)| (row, col))
            .collect()
    }

    pub fn is_valid_move(&self, player_id: &PlayerId, row: usize, col: usize) -> bool {
        !self.is_finished()
            && rules::is_valid_move(&self.board, row, col, player_id, &self.players, self.cursor)
    }

    /// Place an orb for `player_id` and resolve the resulting chain reaction.
    ///
    /// Every intermediate board is passed to `sink`, followed by the settled
    /// board. A rejected move leaves the game unchanged.
    pub fn submit_move(
        &mut self,
        player_id: &PlayerId,
        row: usize,
        col: usize,
        sink: &mut dyn StepSink,
    ) -> Result<MoveReport, MoveError> {
        if self.is_finished() {
            return Err(MoveError::GameOver);
        }
        if self.player(player_id).is_none() {
            return Err(MoveError::UnknownPlayer(player_id.clone()));
        }
        rules::check_move(&self.board, row, col, player_id, &self.players, self.cursor)?;

        let active_before: Vec<PlayerId> = self.active_players().map(|p| p.id.clone()).collect();
        self.players[self.cursor].has_placed = true;
        self.last_move = Some((row, col));
        self.move_count += 1;
        debug!("move {}: {player_id} at ({row}, {col})", self.move_count);

        let resolution = if explosion::apply_move(&mut self.board, row, col, player_id) {
            let cap = explosion::explosion_cap(&self.board, self.settings.explosion_cap_factor);
            explosion::resolve_explosions(&mut self.board, &mut self.players, sink, cap)
        } else {
            Resolution::default()
        };

        let mut eliminated: Vec<PlayerId> = match &resolution.forced_winner {
            Some(winner) => active_before.into_iter().filter(|id| id != winner).collect(),
            None => Vec::new(),
        };
        eliminated.extend(turn::update_player_activity(&self.board, &mut self.players));

        self.outcome = turn::check_winner(&self.players);
        match &self.outcome {
            Some(outcome) => info!("game over after {} moves: {outcome}", self.move_count),
            None => self.cursor = turn::advance_turn(&self.players, self.cursor),
        }
        sink.on_settled(&self.board);

        Ok(MoveReport {
            resolution,
            eliminated,
            outcome: self.outcome.clone(),
            next_player: (!self.is_finished()).then(|| self.current_player().id.clone()),
        })
    }

    /// Pass the turn without placing, e.g. when a turn timer runs out.
    /// Returns the player who is up next.
    pub fn skip_turn(&mut self) -> Result<PlayerId, MoveError> {
        if self.is_finished() {
            return Err(MoveError::GameOver);
        }
        let skipped = self.current_player().id.clone();
        self.cursor = turn::advance_turn(&self.players, self.cursor);
        let next = self.current_player().id.clone();
        info!("turn of {skipped} skipped, {next} is up");
        Ok(next)
    }
}

fn validate_players(players: &[Player], max_players: usize) -> Result<(), SetupError> {
    if players.is_empty() {
        return Err(SetupError::NoPlayers);
    }
    if players.len() > max_players {
        return Err(SetupError::TooManyPlayers {
            got: players.len(),
            max: max_players,
        });
    }
    let mut seen = HashSet::new();
    for player in players {
        if !seen.insert(&player.id) {
            return Err(SetupError::DuplicatePlayer(player.id.clone()));
        }
    }
    Ok(())
}
