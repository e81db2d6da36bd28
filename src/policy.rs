//! Decision policies ("bots").
//!
//! Every policy answers the same question: given a position and a roll,
//! which piece moves? The heuristic bots are short cascades over the
//! predicates in [`crate::analysis`], so they all share one reading of the
//! rules. Random choices come from a seeded `fastrand::Rng` owned by the bot,
//! which keeps whole games reproducible from a seed.

use crate::analysis::{
    can_opponent_capture_after_move, finishes, is_rosette, landing_square, will_capture,
};
use crate::eval::{Weights, evaluate};
use crate::expectimax::{ExpectimaxBot, SearchConfig};
use crate::game::{GameState, apply_move, legal_moves};

/// A move-selection strategy.
pub trait Policy: Send {
    fn name(&self) -> &str;

    /// Piece to move for the player to act, or `None` when `roll` has no
    /// legal move. A returned piece must be in `legal_moves(state, roll)`.
    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize>;
}

fn pick(rng: &mut fastrand::Rng, moves: &[usize]) -> Option<usize> {
    if moves.is_empty() {
        None
    } else {
        Some(moves[rng.usize(..moves.len())])
    }
}

fn rosette_moves(state: &GameState, moves: &[usize], roll: u8) -> Vec<usize> {
    let me = state.turn;
    moves
        .iter()
        .copied()
        .filter(|&m| {
            landing_square(state, me, m, roll).is_some_and(|sq| is_rosette(state.rules(), sq))
        })
        .collect()
}

fn capture_moves(state: &GameState, moves: &[usize], roll: u8) -> Vec<usize> {
    moves
        .iter()
        .copied()
        .filter(|&m| will_capture(state, state.turn, m, roll))
        .collect()
}

fn finishing_move(state: &GameState, moves: &[usize], roll: u8) -> Option<usize> {
    moves
        .iter()
        .copied()
        .find(|&m| finishes(state, state.turn, m, roll))
}

/// Safe moves first: capture, then rosette, then anything safe, then anything.
fn safe_cascade(rng: &mut fastrand::Rng, state: &GameState, moves: &[usize], roll: u8) -> Option<usize> {
    let safe: Vec<usize> = moves
        .iter()
        .copied()
        .filter(|&m| !can_opponent_capture_after_move(state, state.turn, m, roll))
        .collect();
    pick(rng, &capture_moves(state, &safe, roll))
        .or_else(|| pick(rng, &rosette_moves(state, &safe, roll)))
        .or_else(|| pick(rng, &safe))
        .or_else(|| pick(rng, moves))
}

/// Uniformly random legal move.
pub struct RandomBot {
    rng: fastrand::Rng,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Policy for RandomBot {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        pick(&mut self.rng, &legal_moves(state, roll).to_vec())
    }
}

/// One-move lookahead on the static evaluation, no chance nodes.
#[derive(Default)]
pub struct GreedyBot {
    weights: Weights,
}

impl GreedyBot {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }
}

impl Policy for GreedyBot {
    fn name(&self) -> &str {
        "greedy"
    }

    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        let me = state.turn;
        let mut best: Option<(usize, f64)> = None;
        for m in legal_moves(state, roll).iter() {
            let mut after = *state;
            apply_move(&mut after, m, roll);
            let score = evaluate(&after, me, &self.weights);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((m, score));
            }
        }
        best.map(|(m, _)| m)
    }
}

/// Always moves the rearmost piece.
#[derive(Default)]
pub struct ProgressBot;

impl Policy for ProgressBot {
    fn name(&self) -> &str {
        "progress"
    }

    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        let me = state.turn;
        legal_moves(state, roll)
            .iter()
            .min_by_key(|&m| state.step(me, m))
    }
}

/// Captures whenever it can.
pub struct CaptureFirstBot {
    rng: fastrand::Rng,
}

impl CaptureFirstBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Policy for CaptureFirstBot {
    fn name(&self) -> &str {
        "capture"
    }

    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        let moves = legal_moves(state, roll).to_vec();
        pick(&mut self.rng, &capture_moves(state, &moves, roll))
            .or_else(|| pick(&mut self.rng, &moves))
    }
}

/// Lands on a rosette whenever it can.
pub struct RosetteFirstBot {
    rng: fastrand::Rng,
}

impl RosetteFirstBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Policy for RosetteFirstBot {
    fn name(&self) -> &str {
        "rosette"
    }

    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        let moves = legal_moves(state, roll).to_vec();
        pick(&mut self.rng, &rosette_moves(state, &moves, roll))
            .or_else(|| pick(&mut self.rng, &moves))
    }
}

/// Avoids moves the opponent can punish next turn.
pub struct SafeCaptureBot {
    rng: fastrand::Rng,
}

impl SafeCaptureBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Policy for SafeCaptureBot {
    fn name(&self) -> &str {
        "safe-capture"
    }

    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        let moves = legal_moves(state, roll).to_vec();
        safe_cascade(&mut self.rng, state, &moves, roll)
    }
}

/// Bears off when possible, otherwise prefers rosettes.
pub struct GreedyFinishBot {
    rng: fastrand::Rng,
}

impl GreedyFinishBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Policy for GreedyFinishBot {
    fn name(&self) -> &str {
        "greedy-finish"
    }

    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        let moves = legal_moves(state, roll).to_vec();
        finishing_move(state, &moves, roll)
            .or_else(|| pick(&mut self.rng, &rosette_moves(state, &moves, roll)))
            .or_else(|| pick(&mut self.rng, &moves))
    }
}

/// Bears off when possible, otherwise plays like [`SafeCaptureBot`].
pub struct BalancedBot {
    rng: fastrand::Rng,
}

impl BalancedBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Policy for BalancedBot {
    fn name(&self) -> &str {
        "balanced"
    }

    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        let moves = legal_moves(state, roll).to_vec();
        finishing_move(state, &moves, roll)
            .or_else(|| safe_cascade(&mut self.rng, state, &moves, roll))
    }
}

/// Every built-in policy, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Random,
    Greedy,
    Progress,
    Capture,
    Rosette,
    SafeCapture,
    GreedyFinish,
    Balanced,
    Expectimax1,
    Expectimax2,
    /// Expectimax at the depth of the supplied [`SearchConfig`].
    Expectimax,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 11] = [
        PolicyKind::Random,
        PolicyKind::Greedy,
        PolicyKind::Progress,
        PolicyKind::Capture,
        PolicyKind::Rosette,
        PolicyKind::SafeCapture,
        PolicyKind::GreedyFinish,
        PolicyKind::Balanced,
        PolicyKind::Expectimax1,
        PolicyKind::Expectimax2,
        PolicyKind::Expectimax,
    ];

    /// Build the policy. `search` configures the expectimax kinds;
    /// `Expectimax1` and `Expectimax2` override its depth.
    pub fn build(self, seed: u64, search: SearchConfig) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomBot::new(seed)),
            PolicyKind::Greedy => Box::new(GreedyBot::new(search.weights)),
            PolicyKind::Progress => Box::new(ProgressBot),
            PolicyKind::Capture => Box::new(CaptureFirstBot::new(seed)),
            PolicyKind::Rosette => Box::new(RosetteFirstBot::new(seed)),
            PolicyKind::SafeCapture => Box::new(SafeCaptureBot::new(seed)),
            PolicyKind::GreedyFinish => Box::new(GreedyFinishBot::new(seed)),
            PolicyKind::Balanced => Box::new(BalancedBot::new(seed)),
            PolicyKind::Expectimax1 => Box::new(ExpectimaxBot::new(SearchConfig { depth: 1, ..search })),
            PolicyKind::Expectimax2 => Box::new(ExpectimaxBot::new(SearchConfig { depth: 2, ..search })),
            PolicyKind::Expectimax => Box::new(ExpectimaxBot::new(search)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Player, Rules};
    use crate::constants::{FINAL_STEP, OFFBOARD, PIECES};

    const OFF: [i8; PIECES] = [OFFBOARD; PIECES];

    fn position(first: [i8; PIECES], second: [i8; PIECES]) -> GameState {
        GameState::from_positions(&Rules::STANDARD, [first, second], Player::First)
    }

    #[test]
    fn test_every_policy_passes_on_zero_roll() {
        let state = GameState::new();
        for kind in PolicyKind::ALL {
            let mut bot = kind.build(1, SearchConfig::default());
            assert_eq!(bot.choose(&state, 0), None, "{}", bot.name());
        }
    }

    #[test]
    fn test_every_policy_returns_legal_moves() {
        let mut first = OFF;
        first[0] = 4;
        first[1] = 10;
        first[2] = FINAL_STEP;
        let mut second = OFF;
        second[0] = 6;
        second[1] = 3;
        let state = position(first, second);
        for kind in PolicyKind::ALL {
            let mut bot = kind.build(3, SearchConfig::default());
            for roll in 1..=4 {
                let legal = legal_moves(&state, roll);
                let choice = bot.choose(&state, roll);
                assert!(choice.is_some_and(|m| legal.contains(m)), "{} roll {roll}", bot.name());
            }
        }
    }

    #[test]
    fn test_expectimax_kind_uses_configured_depth() {
        let deep = PolicyKind::Expectimax.build(0, SearchConfig::depth(3));
        assert_eq!(deep.name(), "expectimax3");
        let fixed = PolicyKind::Expectimax1.build(0, SearchConfig::depth(3));
        assert_eq!(fixed.name(), "expectimax1");
    }

    #[test]
    fn test_capture_first() {
        let mut first = OFF;
        first[0] = 4; // square 6
        first[1] = 0; // square 3
        let mut second = OFF;
        second[0] = 6; // square 8
        let state = position(first, second);
        let mut bot = CaptureFirstBot::new(0);
        assert_eq!(bot.choose(&state, 2), Some(0));
    }

    #[test]
    fn test_rosette_first() {
        let mut first = OFF;
        first[0] = 1; // step 1 + 2 = step 3, square 0
        let state = position(first, OFF);
        let mut bot = RosetteFirstBot::new(0);
        assert_eq!(bot.choose(&state, 2), Some(0));
    }

    #[test]
    fn test_progress_moves_rearmost() {
        let mut first = OFF;
        first[0] = 5;
        first[1] = 2;
        let mut state = position(first, OFF);
        for i in 2..PIECES {
            state.positions[0][i] = FINAL_STEP;
        }
        assert_eq!(ProgressBot.choose(&state, 1), Some(1));
    }

    #[test]
    fn test_greedy_finish_bears_off() {
        let mut first = OFF;
        first[3] = FINAL_STEP - 2;
        let state = position(first, OFF);
        let mut bot = GreedyFinishBot::new(0);
        assert_eq!(bot.choose(&state, 2), Some(3));
    }

    #[test]
    fn test_safe_capture_avoids_threat() {
        let mut first = OFF;
        first[0] = 4; // square 6
        first[1] = 5; // square 7
        let mut second = OFF;
        second[0] = 3; // square 13, threatens squares 6..=8 of the shared row
        let state = position(first, second);
        // Roll 2: piece 0 -> square 8 (threatened), piece 1 -> square 9
        // (safe rosette), waiting pieces -> square 2 (private).
        let mut bot = SafeCaptureBot::new(0);
        assert_eq!(bot.choose(&state, 2), Some(1));
    }

    #[test]
    fn test_balanced_prefers_finishing() {
        let mut first = OFF;
        first[0] = 4;
        first[5] = FINAL_STEP - 1;
        let mut second = OFF;
        second[0] = 5; // square 7, capturable with a 1
        let state = position(first, second);
        let mut bot = BalancedBot::new(0);
        assert_eq!(bot.choose(&state, 1), Some(5));
    }
}
