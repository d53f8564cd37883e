use std::path::PathBuf;

use crate::game::PlayerId;

/// Errors that prevent a game from being created or reset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("board must be at least 2x2 (got {rows}x{cols})")]
    TooSmall { rows: usize, cols: usize },

    #[error("a {rows}x{cols} board is too large")]
    TooLarge { rows: usize, cols: usize },

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("player id '{0}' appears more than once")]
    DuplicatePlayer(PlayerId),

    #[error("too many players: {got} (max {max})")]
    TooManyPlayers { got: usize, max: usize },

    #[error("board row {row} has {len} cells, expected {expected}")]
    RaggedBoard {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("cell ({row}, {col}) breaks the owner/orb invariant")]
    InconsistentCell { row: usize, col: usize },
}

/// Reasons a submitted move is rejected. A rejected move never changes state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,

    #[error("unknown player '{0}'")]
    UnknownPlayer(PlayerId),

    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("cell ({row}, {col}) belongs to {owner}")]
    CellOwnedByOther {
        row: usize,
        col: usize,
        owner: PlayerId,
    },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::TooSmall { rows: 1, cols: 6 };
        assert_eq!(err.to_string(), "board must be at least 2x2 (got 1x6)");
    }

    #[test]
    fn test_move_error_display() {
        let err = MoveError::CellOwnedByOther {
            row: 1,
            col: 2,
            owner: PlayerId::from("p2"),
        };
        assert_eq!(err.to_string(), "cell (1, 2) belongs to p2");

        let err = MoveError::NotYourTurn(PlayerId::from("p1"));
        assert_eq!(err.to_string(), "it is not p1's turn");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("game.rows must be > 0".to_string());
        assert_eq!(err.to_string(), "config validation error: game.rows must be > 0");
    }
}
