use log::info;

use super::{Board, GameOutcome, Player, PlayerId};

/// Move the cursor to the next active player, wrapping around the list.
///
/// Leaves the cursor where it is if nobody is active.
pub fn advance_turn(players: &[Player], cursor: usize) -> usize {
    let len = players.len();
    (1..=len)
        .map(|step| (cursor + step) % len)
        .find(|&idx| players[idx].is_active)
        .unwrap_or(cursor)
}

/// Deactivate every player who has placed at least once but no longer owns
/// a cell. Returns the ids eliminated by this call.
pub fn update_player_activity(board: &Board, players: &mut [Player]) -> Vec<PlayerId> {
    let mut eliminated = Vec::new();
    for player in players.iter_mut() {
        if player.is_active && player.has_placed && !board.owns_any(&player.id) {
            player.is_active = false;
            info!("player {} eliminated", player.id);
            eliminated.push(player.id.clone());
        }
    }
    eliminated
}

/// One active player left wins; none left is a draw.
pub fn check_winner(players: &[Player]) -> Option<GameOutcome> {
    let mut active = players.iter().filter(|p| p.is_active);
    match (active.next(), active.next()) {
        (None, _) => Some(GameOutcome::Draw),
        (Some(only), None) => Some(GameOutcome::Winner(only.id.clone())),
        _ => None,
    }
}
