use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque player identifier supplied by whoever hosts the game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        PlayerId(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A seat in the turn rotation.
///
/// Eliminated players keep their record (with `is_active == false`) so the
/// list order, and therefore the rotation, never shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_admin: bool,
    pub is_active: bool,
    /// Set once the player has placed an orb; only then can they be eliminated.
    pub has_placed: bool,
}

impl Player {
    /// Create an active player who has not moved yet
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            is_admin: false,
            is_active: true,
            has_placed: false,
        }
    }

    /// Mark this player as the room admin
    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// Fresh copy for a new game: active again, no placements yet
    pub fn rejoined(&self) -> Self {
        Player {
            is_active: true,
            has_placed: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_active() {
        let player = Player::new("p1", "Alice");
        assert!(player.is_active);
        assert!(!player.has_placed);
        assert!(!player.is_admin);
        assert_eq!(player.id.as_str(), "p1");
    }

    #[test]
    fn test_rejoined_clears_game_flags() {
        let mut player = Player::new("p1", "Alice").admin();
        player.is_active = false;
        player.has_placed = true;

        let fresh = player.rejoined();
        assert!(fresh.is_active);
        assert!(!fresh.has_placed);
        assert!(fresh.is_admin);
        assert_eq!(fresh.name, "Alice");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId::from("red").to_string(), "red");
    }
}
