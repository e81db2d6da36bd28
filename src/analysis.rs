//! Move-analysis predicates shared by the heuristic policies.
//!
//! All functions are pure: they read the state (or a copy of it) and never
//! change the caller's position. `player` need not be the player to act.

use crate::board::{Player, Rules, Square};
use crate::constants::{FINAL_STEP, MAX_ROLL, PIECES};
use crate::game::{GameState, apply_move};

/// Step a piece would reach, ignoring occupancy.
///
/// `None` for a zero or out-of-range roll, a finished piece or an overshoot;
/// `FINAL_STEP` when the move bears off.
pub fn landing_step(state: &GameState, player: Player, piece: usize, roll: u8) -> Option<i8> {
    let step = state.step(player, piece);
    if roll == 0 || roll > MAX_ROLL || step == FINAL_STEP {
        return None;
    }
    let new = step + roll as i8;
    (new <= FINAL_STEP).then_some(new)
}

/// Square a piece would land on; `None` also when the move bears off.
pub fn landing_square(
    state: &GameState,
    player: Player,
    piece: usize,
    roll: u8,
) -> Option<Square> {
    landing_step(state, player, piece, roll)
        .filter(|&s| s < FINAL_STEP)
        .map(|s| state.rules().square(player, s))
}

/// The move bears the piece off with an exact roll.
pub fn finishes(state: &GameState, player: Player, piece: usize, roll: u8) -> bool {
    landing_step(state, player, piece, roll) == Some(FINAL_STEP)
}

#[inline]
pub fn is_rosette(rules: &Rules, square: Square) -> bool {
    rules.is_rosette(square)
}

#[inline]
pub fn is_safe_square(rules: &Rules, square: Square) -> bool {
    rules.is_safe(square)
}

/// The move lands on a non-safe square holding an opponent piece.
pub fn will_capture(state: &GameState, player: Player, piece: usize, roll: u8) -> bool {
    match landing_square(state, player, piece, roll) {
        Some(sq) => {
            !is_safe_square(state.rules(), sq) && state.piece_at(player.opponent(), sq).is_some()
        }
        None => false,
    }
}

/// After playing the move, could the opponent capture the moved piece with
/// any single roll?
///
/// The move is played on a copy, acting as `player`; it must be legal for
/// `player`. Every opponent piece is tried with every roll `1..=4`, counting
/// only moves that are legal for the opponent (not blocked by their own
/// piece, not onto a safe square, not bearing off).
pub fn can_opponent_capture_after_move(
    state: &GameState,
    player: Player,
    piece: usize,
    roll: u8,
) -> bool {
    let mut after = *state;
    after.turn = player;
    apply_move(&mut after, piece, roll);

    let Some(target) = after.square_of(player, piece) else {
        return false;
    };
    if is_safe_square(after.rules(), target) {
        return false;
    }

    let opp = player.opponent();
    let path = after.rules().path(opp);
    let own_steps = after.pieces(opp);
    (0..PIECES).any(|i| {
        (1..=MAX_ROLL).any(|r| {
            let Some(new) = landing_step(&after, opp, i, r) else {
                return false;
            };
            new < FINAL_STEP
                && path[new as usize] == target
                && !own_steps
                    .iter()
                    .enumerate()
                    .any(|(j, &s)| j != i && s == new)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::OFFBOARD;

    const OFF: [i8; PIECES] = [OFFBOARD; PIECES];

    fn position(first: [i8; PIECES], second: [i8; PIECES]) -> GameState {
        GameState::from_positions(&Rules::STANDARD, [first, second], Player::First)
    }

    #[test]
    fn test_landing_projection() {
        let mut first = OFF;
        first[0] = 10;
        let state = position(first, OFF);
        let me = Player::First;
        assert_eq!(landing_step(&state, me, 0, 0), None);
        assert_eq!(landing_step(&state, me, 0, 2), Some(12));
        assert_eq!(landing_square(&state, me, 0, 2), Some(4));
        assert_eq!(landing_step(&state, me, 0, 3), Some(FINAL_STEP));
        assert_eq!(landing_square(&state, me, 0, 3), None);
        assert!(finishes(&state, me, 0, 3));
        assert_eq!(landing_step(&state, me, 0, 4), None);
        // Entering piece
        assert_eq!(landing_square(&state, me, 1, 1), Some(3));
    }

    #[test]
    fn test_landing_rejects_impossible_rolls() {
        let mut first = OFF;
        first[0] = FINAL_STEP - 1;
        let state = position(first, OFF);
        assert_eq!(landing_step(&state, Player::First, 0, 120), None);
        assert_eq!(landing_step(&state, Player::First, 1, 200), None);
        assert_eq!(landing_square(&state, Player::First, 1, 5), None);
        assert!(!will_capture(&state, Player::First, 1, u8::MAX));
    }

    #[test]
    fn test_will_capture() {
        let mut first = OFF;
        first[0] = 4; // square 6
        first[1] = 5; // square 7
        let mut second = OFF;
        second[0] = 6; // square 8
        second[1] = 7; // square 9, safe
        let state = position(first, second);
        assert!(will_capture(&state, Player::First, 0, 2));
        assert!(!will_capture(&state, Player::First, 0, 1));
        assert!(!will_capture(&state, Player::First, 1, 2));
    }

    #[test]
    fn test_opponent_threat() {
        let mut first = OFF;
        first[0] = 4; // square 6
        let mut second = OFF;
        second[0] = 3; // square 13
        let state = position(first, second);
        // Moving to square 8 (step 6): opponent at step 3 reaches step 6 with 3
        assert!(can_opponent_capture_after_move(&state, Player::First, 0, 2));
        // Moving to square 9 is safe
        assert!(!can_opponent_capture_after_move(&state, Player::First, 0, 3));
        // Squares 10 and beyond are out of reach (step 8 needs a 5)
        assert!(!can_opponent_capture_after_move(&state, Player::First, 0, 4));
    }

    #[test]
    fn test_opponent_threat_after_capture() {
        let mut first = OFF;
        first[0] = 4; // square 6
        let mut second = OFF;
        second[1] = 6; // square 8, captured by our move
        let state = position(first, second);
        // The captured piece goes home and cannot reach square 8 again
        assert!(!can_opponent_capture_after_move(&state, Player::First, 0, 2));

        second[2] = 5; // square 7, one step behind
        let state = position(first, second);
        assert!(can_opponent_capture_after_move(&state, Player::First, 0, 2));

        let mut first = OFF;
        first[0] = 0; // square 3, private lane
        let state = position(first, second);
        assert!(!can_opponent_capture_after_move(&state, Player::First, 0, 1));
    }

    #[test]
    fn test_entering_opponent_threat() {
        let mut first = OFF;
        first[0] = 2; // square 1
        let state = position(first, OFF);
        // Step 4 is square 6, the first shared square: an entering opponent
        // needs a roll of 5, which does not exist.
        assert!(!can_opponent_capture_after_move(&state, Player::First, 0, 2));
    }

    #[test]
    fn test_does_not_mutate() {
        let mut first = OFF;
        first[0] = 4;
        let state = position(first, OFF);
        let before = state;
        let _ = can_opponent_capture_after_move(&state, Player::First, 0, 2);
        assert_eq!(state, before);
    }
}
