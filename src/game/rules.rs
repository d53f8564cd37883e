use super::{Board, Player, PlayerId};
use crate::error::MoveError;

/// Check whether `player_id` may place an orb at `(row, col)` right now.
///
/// Only the player under the turn cursor may move, and only onto an empty
/// cell or one they already own.
pub fn check_move(
    board: &Board,
    row: usize,
    col: usize,
    player_id: &PlayerId,
    players: &[Player],
    cursor: usize,
) -> Result<(), MoveError> {
    if !board.in_bounds(row, col) {
        return Err(MoveError::OutOfBounds { row, col });
    }

    match players.get(cursor) {
        Some(current) if current.is_active && current.id == *player_id => {}
        _ => return Err(MoveError::NotYourTurn(player_id.clone())),
    }

    match &board.get(row, col).owner {
        Some(owner) if owner != player_id => Err(MoveError::CellOwnedByOther {
            row,
            col,
            owner: owner.clone(),
        }),
        _ => Ok(()),
    }
}

/// Boolean form of [`check_move`].
pub fn is_valid_move(
    board: &Board,
    row: usize,
    col: usize,
    player_id: &PlayerId,
    players: &[Player],
    cursor: usize,
) -> bool {
    check_move(board, row, col, player_id, players, cursor).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    fn players() -> Vec<Player> {
        vec![Player::new("a", "Alice"), Player::new("b", "Bob")]
    }

    fn board() -> Board {
        Board::from_rows(vec![
            vec![Cell::owned(1, "a"), Cell::empty(), Cell::empty()],
            vec![Cell::empty(), Cell::owned(2, "b"), Cell::empty()],
            vec![Cell::empty(), Cell::empty(), Cell::empty()],
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_and_own_cells_are_valid() {
        let a = PlayerId::from("a");
        assert!(is_valid_move(&board(), 0, 1, &a, &players(), 0));
        assert!(is_valid_move(&board(), 0, 0, &a, &players(), 0));
    }

    #[test]
    fn test_out_of_bounds() {
        let a = PlayerId::from("a");
        assert_eq!(
            check_move(&board(), 3, 0, &a, &players(), 0),
            Err(MoveError::OutOfBounds { row: 3, col: 0 })
        );
        assert!(!is_valid_move(&board(), 0, 7, &a, &players(), 0));
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let b = PlayerId::from("b");
        assert_eq!(
            check_move(&board(), 2, 2, &b, &players(), 0),
            Err(MoveError::NotYourTurn(b.clone()))
        );
        assert!(is_valid_move(&board(), 2, 2, &b, &players(), 1));
    }

    #[test]
    fn test_inactive_current_player_rejected() {
        let mut players = players();
        players[0].is_active = false;
        let a = PlayerId::from("a");
        assert!(!is_valid_move(&board(), 2, 2, &a, &players, 0));
    }

    #[test]
    fn test_cursor_past_end_rejected() {
        let a = PlayerId::from("a");
        assert!(!is_valid_move(&board(), 2, 2, &a, &players(), 5));
    }

    #[test]
    fn test_cannot_place_on_opponent_cell() {
        let a = PlayerId::from("a");
        assert_eq!(
            check_move(&board(), 1, 1, &a, &players(), 0),
            Err(MoveError::CellOwnedByOther {
                row: 1,
                col: 1,
                owner: PlayerId::from("b"),
            })
        );
    }
}
