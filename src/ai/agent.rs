use crate::game::Game;

/// Anything that can choose a placement for the player whose turn it is.
pub trait Agent {
    /// Pick a cell for the current player, or `None` if no legal move exists.
    fn select_move(&mut self, game: &Game) -> Option<(usize, usize)>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
