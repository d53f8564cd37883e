//! Core Chain Reaction game logic: board and critical mass, move validation,
//! chain-reaction resolution, turn rotation and the per-game state machine.

mod board;
pub mod explosion;
mod player;
pub mod rules;
mod state;
pub mod turn;

pub use crate::error::{MoveError, SetupError};
pub use board::{critical_mass, Board, Cell};
pub use explosion::{Resolution, StepSink};
pub use player::{Player, PlayerId};
pub use state::{Game, GameOutcome, GamePhase, GameSettings, MoveReport};
