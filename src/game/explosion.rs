//! Orb placement and chain-reaction resolution.
//!
//! Explosions are processed one cell at a time: every step rescans the board
//! from the top-left and explodes the first cell at or over its critical mass.
//! The intermediate boards are therefore deterministic and can be replayed
//! step by step by whoever renders them.

use std::collections::HashSet;

use log::{debug, warn};

use super::{Board, Player, PlayerId};

/// Receives board snapshots while a move resolves.
pub trait StepSink {
    /// Called after every single explosion.
    fn on_step(&mut self, board: &Board);

    /// Called once when the move has fully settled.
    fn on_settled(&mut self, _board: &Board) {}
}

/// Discards all snapshots.
impl StepSink for () {
    fn on_step(&mut self, _board: &Board) {}
}

/// Collects a copy of every snapshot, the settled board last.
impl StepSink for Vec<Board> {
    fn on_step(&mut self, board: &Board) {
        self.push(board.clone());
    }

    fn on_settled(&mut self, board: &Board) {
        self.push(board.clone());
    }
}

/// What happened while a board was resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Number of single-cell explosions performed.
    pub explosions: usize,
    /// Set when the board cycled and was handed to one player.
    pub forced_winner: Option<PlayerId>,
}

impl Resolution {
    pub fn exploded(&self) -> bool {
        self.explosions > 0 || self.forced_winner.is_some()
    }

    pub fn was_forced(&self) -> bool {
        self.forced_winner.is_some()
    }
}

/// Explosion budget for a board: `factor × rows × cols`.
pub fn explosion_cap(board: &Board, factor: usize) -> usize {
    factor.saturating_mul(board.rows() * board.cols())
}

/// Add one orb for `player_id` at `(row, col)`.
///
/// Returns true if the cell has reached its critical mass. The move must
/// already have been validated.
pub fn apply_move(board: &mut Board, row: usize, col: usize, player_id: &PlayerId) -> bool {
    let mass = board.critical_mass(row, col);
    let cell = board.get_mut(row, col);
    cell.orbs += 1;
    cell.owner = Some(player_id.clone());
    cell.orbs >= mass
}

/// Explode unstable cells until the board is stable.
///
/// If the board revisits a previous state, or `max_explosions` is reached,
/// the cycle is broken by [`force_winner`] and the winning player is reported
/// in the returned [`Resolution`].
pub fn resolve_explosions(
    board: &mut Board,
    players: &mut [Player],
    sink: &mut dyn StepSink,
    max_explosions: usize,
) -> Resolution {
    let mut seen = HashSet::new();
    let mut explosions = 0;

    while let Some((row, col)) = board.first_unstable() {
        if !seen.insert(board.state_key()) {
            warn!("board repeated a previous state after {explosions} explosions, forcing a winner");
            return forced(board, players, sink, explosions);
        }
        if explosions >= max_explosions {
            warn!("explosion cap of {max_explosions} reached, forcing a winner");
            return forced(board, players, sink, explosions);
        }

        explode_cell(board, row, col);
        explosions += 1;
        debug!("explosion {explosions} at ({row}, {col})");
        sink.on_step(board);
    }

    Resolution {
        explosions,
        forced_winner: None,
    }
}

/// Hand the whole board to the player holding the most orbs.
///
/// Totals are compared in player-list order and a tie goes to the earlier
/// player. The board becomes one orb per cell owned by the winner and every
/// other player is deactivated. Returns `None`, leaving everything untouched,
/// if no listed player owns an orb.
pub fn force_winner(board: &mut Board, players: &mut [Player]) -> Option<PlayerId> {
    let mut best: Option<(usize, u32)> = None;
    for (idx, (_, total)) in board
        .orbs_by_owner(players.iter().map(|p| &p.id))
        .into_iter()
        .enumerate()
    {
        if total > 0 && best.map_or(true, |(_, top)| total > top) {
            best = Some((idx, total));
        }
    }

    let (idx, _) = best?;
    let winner = players[idx].id.clone();
    board.fill(&winner);
    for player in players.iter_mut() {
        player.is_active = player.id == winner;
    }
    Some(winner)
}

fn forced(
    board: &mut Board,
    players: &mut [Player],
    sink: &mut dyn StepSink,
    explosions: usize,
) -> Resolution {
    let forced_winner = force_winner(board, players);
    if forced_winner.is_some() {
        sink.on_step(board);
    }
    Resolution {
        explosions,
        forced_winner,
    }
}

fn explode_cell(board: &mut Board, row: usize, col: usize) {
    let mass = board.critical_mass(row, col);
    let targets: Vec<_> = board.neighbors(row, col).collect();

    let cell = board.get_mut(row, col);
    let owner = cell.owner.clone();
    cell.orbs -= mass;
    if cell.orbs == 0 {
        cell.owner = None;
    }

    for (r, c) in targets {
        let neighbor = board.get_mut(r, c);
        neighbor.orbs += 1;
        neighbor.owner = owner.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;
    use proptest::prelude::*;

    fn two_players() -> Vec<Player> {
        vec![Player::new("a", "Alice"), Player::new("b", "Bob")]
    }

    #[test]
    fn test_apply_move_sets_owner() {
        let mut board = Board::new(3, 3).unwrap();
        let a = PlayerId::from("a");
        assert!(!apply_move(&mut board, 1, 1, &a));
        assert_eq!(board.get(1, 1), &Cell::owned(1, "a"));
        assert_eq!(board.total_orbs(), 1);
    }

    #[test]
    fn test_corner_explodes_on_second_orb() {
        let mut board = Board::new(3, 3).unwrap();
        let mut players = two_players();
        let a = PlayerId::from("a");

        assert!(!apply_move(&mut board, 0, 0, &a));
        assert!(apply_move(&mut board, 0, 0, &a));

        let mut steps: Vec<Board> = Vec::new();
        let res = resolve_explosions(&mut board, &mut players, &mut steps, 18);

        assert_eq!(res.explosions, 1);
        assert!(res.exploded());
        assert!(!res.was_forced());
        assert_eq!(steps.len(), 1);
        assert_eq!(board.get(0, 0), &Cell::empty());
        assert_eq!(board.get(0, 1), &Cell::owned(1, "a"));
        assert_eq!(board.get(1, 0), &Cell::owned(1, "a"));
        assert_eq!(board.total_orbs(), 2);
    }

    #[test]
    fn test_chain_reaction() {
        let mut board = Board::from_rows(vec![
            vec![Cell::owned(1, "a"), Cell::owned(2, "a"), Cell::empty()],
            vec![Cell::empty(), Cell::empty(), Cell::empty()],
            vec![Cell::empty(), Cell::empty(), Cell::empty()],
        ])
        .unwrap();
        let mut players = two_players();
        let a = PlayerId::from("a");

        assert!(apply_move(&mut board, 0, 0, &a));
        let res = resolve_explosions(&mut board, &mut players, &mut (), 18);

        assert_eq!(res.explosions, 2);
        assert_eq!(board.get(0, 0), &Cell::owned(1, "a"));
        assert_eq!(board.get(0, 1), &Cell::empty());
        assert_eq!(board.get(0, 2), &Cell::owned(1, "a"));
        assert_eq!(board.get(1, 0), &Cell::owned(1, "a"));
        assert_eq!(board.get(1, 1), &Cell::owned(1, "a"));
        assert_eq!(board.total_orbs(), 4);
    }

    #[test]
    fn test_explosion_captures_neighbors() {
        let mut board = Board::from_rows(vec![
            vec![Cell::owned(1, "a"), Cell::owned(1, "b"), Cell::empty()],
            vec![Cell::owned(2, "b"), Cell::empty(), Cell::empty()],
            vec![Cell::empty(), Cell::empty(), Cell::empty()],
        ])
        .unwrap();
        let mut players = two_players();
        let a = PlayerId::from("a");

        assert!(apply_move(&mut board, 0, 0, &a));
        resolve_explosions(&mut board, &mut players, &mut (), 18);

        assert_eq!(board.get(0, 1), &Cell::owned(2, "a"));
        // (1, 0) reached 3 and exploded as a's cell
        assert_eq!(board.get(1, 0), &Cell::empty());
        assert_eq!(board.get(0, 0), &Cell::owned(1, "a"));
        assert_eq!(board.get(1, 1), &Cell::owned(1, "a"));
        assert_eq!(board.get(2, 0), &Cell::owned(1, "a"));
        assert!(!board.owns_any(&PlayerId::from("b")));
        assert!(board.is_stable());
    }

    #[test]
    fn test_one_cell_per_step() {
        let mut board = Board::from_rows(vec![
            vec![Cell::owned(2, "a"), Cell::empty(), Cell::empty()],
            vec![Cell::empty(), Cell::empty(), Cell::empty()],
            vec![Cell::empty(), Cell::empty(), Cell::owned(2, "b")],
        ])
        .unwrap();
        let mut players = two_players();

        let mut steps: Vec<Board> = Vec::new();
        let res = resolve_explosions(&mut board, &mut players, &mut steps, 18);

        assert_eq!(res.explosions, 2);
        assert_eq!(steps.len(), 2);
        // first step only touched the top-left corner
        assert_eq!(steps[0].get(0, 0), &Cell::empty());
        assert_eq!(steps[0].get(2, 2), &Cell::owned(2, "b"));
        assert_eq!(steps[1].get(2, 2), &Cell::empty());
        assert_eq!(steps[1].get(2, 1), &Cell::owned(1, "b"));
    }

    #[test]
    fn test_stable_board_is_noop() {
        let mut board = Board::from_rows(vec![
            vec![Cell::owned(1, "a"), Cell::owned(1, "b")],
            vec![Cell::empty(), Cell::owned(1, "a")],
        ])
        .unwrap();
        let before = board.clone();
        let mut players = two_players();

        let res = resolve_explosions(&mut board, &mut players, &mut (), 8);
        assert!(!res.exploded());
        assert_eq!(board, before);
    }

    #[test]
    fn test_cycling_board_is_forced() {
        // 5 orbs on a 2x2 board can never settle: every cell holds at most 1
        let mut board = Board::from_rows(vec![
            vec![Cell::owned(2, "a"), Cell::owned(1, "b")],
            vec![Cell::owned(1, "b"), Cell::owned(1, "a")],
        ])
        .unwrap();
        let mut players = two_players();
        let cap = explosion_cap(&board, 2);

        let mut steps: Vec<Board> = Vec::new();
        let res = resolve_explosions(&mut board, &mut players, &mut steps, cap);

        assert_eq!(res.forced_winner, Some(PlayerId::from("a")));
        assert!(res.explosions <= cap);
        assert!(board.is_stable());
        assert!(board
            .iter()
            .all(|(_, _, cell)| *cell == Cell::owned(1, "a")));
        assert!(players[0].is_active);
        assert!(!players[1].is_active);
        assert_eq!(steps.last(), Some(&board));
    }

    #[test]
    fn test_cap_forces_resolution() {
        let mut board = Board::from_rows(vec![
            vec![Cell::owned(2, "a"), Cell::owned(2, "a"), Cell::empty()],
            vec![Cell::owned(1, "b"), Cell::empty(), Cell::empty()],
            vec![Cell::empty(), Cell::empty(), Cell::empty()],
        ])
        .unwrap();
        let mut players = two_players();

        let res = resolve_explosions(&mut board, &mut players, &mut (), 1);
        assert_eq!(res.explosions, 1);
        assert_eq!(res.forced_winner, Some(PlayerId::from("a")));
        assert_eq!(board.total_orbs(), 9);
    }

    #[test]
    fn test_force_winner_tie_goes_to_earlier_player() {
        let cells = vec![
            vec![Cell::owned(1, "a"), Cell::owned(1, "b")],
            vec![Cell::empty(), Cell::empty()],
        ];

        let mut board = Board::from_rows(cells.clone()).unwrap();
        let mut players = two_players();
        assert_eq!(force_winner(&mut board, &mut players), Some(PlayerId::from("a")));

        let mut board = Board::from_rows(cells).unwrap();
        let mut players = two_players();
        players.reverse();
        assert_eq!(force_winner(&mut board, &mut players), Some(PlayerId::from("b")));
        assert!(players[0].is_active);
        assert!(!players[1].is_active);
    }

    #[test]
    fn test_force_winner_on_empty_board() {
        let mut board = Board::new(2, 2).unwrap();
        let mut players = two_players();
        assert_eq!(force_winner(&mut board, &mut players), None);
        assert_eq!(board.total_orbs(), 0);
        assert!(players.iter().all(|p| p.is_active));
    }

    proptest! {
        #[test]
        fn prop_resolution_conserves_orbs_and_settles(
            rows in 2usize..6,
            cols in 2usize..6,
            moves in prop::collection::vec((0usize..6, 0usize..6), 1..60),
        ) {
            let mut board = Board::new(rows, cols).unwrap();
            let mut players = two_players();
            let ids = [PlayerId::from("a"), PlayerId::from("b")];
            let cap = explosion_cap(&board, 2);

            for (turn, (r, c)) in moves.into_iter().enumerate() {
                let (row, col) = (r % rows, c % cols);
                let mover = &ids[turn % 2];
                if board.get(row, col).owner.as_ref().is_some_and(|o| o != mover) {
                    continue;
                }

                let before = board.total_orbs();
                apply_move(&mut board, row, col, mover);
                prop_assert_eq!(board.total_orbs(), before + 1);

                let res = resolve_explosions(&mut board, &mut players, &mut (), cap);
                prop_assert!(board.is_stable());
                for (_, _, cell) in board.iter() {
                    prop_assert_eq!(cell.orbs > 0, cell.owner.is_some());
                }
                if res.was_forced() {
                    break;
                }
                prop_assert_eq!(board.total_orbs(), before + 1);

                let again = resolve_explosions(&mut board, &mut players, &mut (), cap);
                prop_assert!(!again.exploded());
            }
        }
    }
}
