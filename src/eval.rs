//! Static positional evaluation, used at search leaves and by the greedy bot.

use crate::board::Player;
use crate::constants::{FINAL_STEP, WEIGHT_FINISHED, WEIGHT_PROGRESS, WEIGHT_ROSETTE};
use crate::game::GameState;

/// Coefficients of the linear evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub progress: f64,
    pub finished: f64,
    pub rosette: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            progress: WEIGHT_PROGRESS,
            finished: WEIGHT_FINISHED,
            rosette: WEIGHT_ROSETTE,
        }
    }
}

/// Score `state` for `perspective`. Positive means `perspective` is ahead.
///
/// The score is zero-sum: swapping the perspective negates it.
pub fn evaluate(state: &GameState, perspective: Player, weights: &Weights) -> f64 {
    side_score(state, perspective, weights) - side_score(state, perspective.opponent(), weights)
}

fn side_score(state: &GameState, player: Player, weights: &Weights) -> f64 {
    let rules = state.rules();
    let mut progress = 0i32;
    let mut finished = 0i32;
    let mut rosettes = 0i32;
    for (i, &step) in state.pieces(player).iter().enumerate() {
        // OFFBOARD must not leak a negative step into the sum
        if step < 0 {
            continue;
        }
        progress += step as i32;
        if step == FINAL_STEP {
            finished += 1;
        } else if state.square_of(player, i).is_some_and(|sq| rules.is_rosette(sq)) {
            rosettes += 1;
        }
    }
    weights.progress * progress as f64
        + weights.finished * finished as f64
        + weights.rosette * rosettes as f64
}
