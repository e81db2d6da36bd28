//! Full games between two policies.
//!
//! The driver owns the turn loop: roll, ask the active policy, apply the
//! move, or pass when there is nothing to play. Policies only ever see a
//! shared reference to the live state.

use tracing::debug;

use crate::board::{Player, Rules};
use crate::constants::MAX_GAME_TURNS;
use crate::dice::Dice;
use crate::game::{GameState, apply_move, legal_moves, pass_turn};
use crate::policy::Policy;

/// Summary of one finished (or abandoned) game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameRecord {
    /// `None` only when the turn cap was hit.
    pub winner: Option<Player>,
    /// Rolls taken, including passes.
    pub turns: usize,
    pub moves: usize,
    pub passes: usize,
    /// Captures made by each player.
    pub captures: [usize; 2],
}

/// Play one game from the initial position. `players[0]` moves first.
pub fn play_game(
    players: [&mut dyn Policy; 2],
    rules: &'static Rules,
    dice: &Dice,
    rng: &mut fastrand::Rng,
) -> GameRecord {
    let mut state = GameState::with_rules(rules);
    play_from(&mut state, players, dice, rng)
}

/// Continue a game from `state` until someone wins or the turn cap is hit.
pub fn play_from(
    state: &mut GameState,
    players: [&mut dyn Policy; 2],
    dice: &Dice,
    rng: &mut fastrand::Rng,
) -> GameRecord {
    let mut record = GameRecord::default();

    while !state.is_over() && record.turns < MAX_GAME_TURNS {
        record.turns += 1;
        let roll = dice.roll(rng);
        let me = state.turn;

        if legal_moves(state, roll).is_empty() {
            debug!(turn = record.turns, player = %me, roll, "no legal move");
            pass_turn(state);
            record.passes += 1;
            continue;
        }

        match players[me.index()].choose(state, roll) {
            Some(piece) => {
                let outcome = apply_move(state, piece, roll);
                debug!(
                    turn = record.turns,
                    player = %me,
                    roll,
                    piece,
                    from = outcome.from,
                    to = outcome.to,
                    captured = ?outcome.captured,
                    extra_turn = outcome.extra_turn,
                    "move"
                );
                record.moves += 1;
                if outcome.captured.is_some() {
                    record.captures[me.index()] += 1;
                }
            }
            None => {
                pass_turn(state);
                record.passes += 1;
            }
        }
    }

    record.winner = state.winner();
    debug!(
        winner = ?record.winner,
        turns = record.turns,
        p0 = players[0].name(),
        p1 = players[1].name(),
        "game over"
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FINAL_STEP, PIECES};
    use crate::policy::{ProgressBot, RandomBot};

    #[test]
    fn test_random_game_finishes() {
        let mut a = RandomBot::new(1);
        let mut b = RandomBot::new(2);
        let mut rng = fastrand::Rng::with_seed(3);
        let record = play_game([&mut a, &mut b], &Rules::STANDARD, &Dice::STANDARD, &mut rng);
        assert!(record.winner.is_some());
        assert_eq!(record.turns, record.moves + record.passes);
    }

    #[test]
    fn test_same_seeds_same_game() {
        let run = || {
            let mut a = RandomBot::new(11);
            let mut b = ProgressBot;
            let mut rng = fastrand::Rng::with_seed(5);
            play_game([&mut a, &mut b], &Rules::STANDARD, &Dice::STANDARD, &mut rng)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_winner_has_every_piece_home() {
        let mut a = ProgressBot;
        let mut b = ProgressBot;
        let mut rng = fastrand::Rng::with_seed(8);
        let mut state = GameState::new();
        let record = play_from(&mut state, [&mut a, &mut b], &Dice::STANDARD, &mut rng);
        let winner = record.winner.expect("game should finish");
        assert_eq!(state.pieces(winner), &[FINAL_STEP; PIECES]);
        assert!(state.pieces(winner.opponent()).iter().any(|&s| s != FINAL_STEP));
    }
}
