//! Depth-bounded expectimax search over dice outcomes.
//!
//! The search alternates three kinds of node:
//! - the root decision, where the player to act picks the move with the
//!   highest expected value;
//! - chance nodes, which average over the next roll using the dice PMF;
//! - decision nodes under each roll, which maximize when the acting player
//!   is the root player and minimize when it is the opponent.
//!
//! Depth counts chance plies after the root move: depth 1 looks at the
//! opponent's reply, depth 2 adds the root player's following move, and so
//! on. Every node works on its own copy of the state.
//!
//! Whose turn a ply belongs to is controlled by [`TurnModel`]. The default
//! reads it from the copied state, so a rosette that keeps the turn is
//! searched as the root player's move. [`TurnModel::Alternating`] instead
//! assumes strict alternation and evaluates leaves from the side to move,
//! which reproduces the behavior of the older fixed-depth bots.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, trace};

use crate::board::Player;
use crate::constants::DEFAULT_DEPTH;
use crate::dice::Dice;
use crate::eval::{Weights, evaluate};
use crate::game::{GameState, apply_move, legal_moves, pass_turn};
use crate::policy::Policy;

/// How the search decides who acts at each ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnModel {
    /// Actor taken from the state's turn; leaves scored for the root player.
    #[default]
    FollowTurn,
    /// Opponent, self, opponent, ... regardless of rosettes; leaves scored
    /// for the player to move.
    Alternating,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("search depth must be at least 1")]
    ZeroDepth,
    #[error("dice probabilities sum to {0}, expected 1")]
    DiceNotNormalized(f64),
}

/// Knobs for [`Expectimax`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Chance plies searched after the root move.
    pub depth: u32,
    pub weights: Weights,
    pub dice: Dice,
    pub turn_model: TurnModel,
    /// Score root moves on the rayon pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            weights: Weights::default(),
            dice: Dice::STANDARD,
            turn_model: TurnModel::default(),
            parallel: false,
        }
    }
}

impl SearchConfig {
    /// Default configuration at the given depth.
    pub fn depth(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn with_turn_model(mut self, turn_model: TurnModel) -> Self {
        self.turn_model = turn_model;
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_dice(mut self, dice: Dice) -> Self {
        self.dice = dice;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        let total: f64 = self.dice.pmf().iter().sum();
        if (total - 1.0).abs() > 1e-9 {
            return Err(ConfigError::DiceNotNormalized(total));
        }
        Ok(())
    }
}

/// Expected value of one root move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub piece: usize,
    pub value: f64,
}

/// Node counts for the last search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaves: u64,
}

impl SearchStats {
    fn merge(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
    }
}

#[derive(Clone, Copy)]
enum Ply {
    Max,
    Min,
}

impl Ply {
    fn flip(self) -> Ply {
        match self {
            Ply::Max => Ply::Min,
            Ply::Min => Ply::Max,
        }
    }
}

/// Expectimax searcher. Holds only configuration and counters, so one
/// instance can be reused across moves and games.
#[derive(Debug, Clone)]
pub struct Expectimax {
    cfg: SearchConfig,
    stats: SearchStats,
}

impl Default for Expectimax {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Expectimax {
    pub fn new(cfg: SearchConfig) -> Self {
        Self {
            cfg,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    /// Counters from the last call to [`Self::choose`] or
    /// [`Self::branch_evals`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Best move for the player to act, or `None` when `roll` has no legal
    /// move. Ties go to the first move in [`legal_moves`] order.
    ///
    /// The caller's state is never modified; on `None` passing the turn is
    /// the caller's job.
    pub fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        let evals = self.branch_evals(state, roll);
        for eval in &evals {
            trace!(piece = eval.piece, value = eval.value, "root branch");
        }
        let best = best_branch(&evals)?;
        debug!(
            player = %state.turn,
            roll,
            piece = best.piece,
            value = best.value,
            nodes = self.stats.nodes,
            "expectimax choice"
        );
        Some(best.piece)
    }

    /// Expected value of every legal root move, in [`legal_moves`] order.
    pub fn branch_evals(&mut self, state: &GameState, roll: u8) -> Vec<BranchEval> {
        self.stats = SearchStats::default();
        let moves = legal_moves(state, roll).to_vec();
        if !self.cfg.parallel {
            return moves
                .into_iter()
                .map(|piece| BranchEval {
                    piece,
                    value: self.root_branch(state, piece, roll),
                })
                .collect();
        }

        let cfg = self.cfg;
        let results: Vec<(BranchEval, SearchStats)> = moves
            .into_par_iter()
            .map(|piece| {
                let mut worker = Expectimax::new(cfg);
                let value = worker.root_branch(state, piece, roll);
                (BranchEval { piece, value }, worker.stats)
            })
            .collect();
        results
            .into_iter()
            .map(|(eval, stats)| {
                self.stats.merge(stats);
                eval
            })
            .collect()
    }

    fn root_branch(&mut self, state: &GameState, piece: usize, roll: u8) -> f64 {
        let mover = state.turn;
        let mut child = *state;
        apply_move(&mut child, piece, roll);
        self.score_own_horizon(&child, mover, self.cfg.depth)
    }

    /// Value for `mover` of a position it just produced, before the next
    /// roll is known, searching `plies` chance plies.
    pub fn score_own_horizon(&mut self, state: &GameState, mover: Player, plies: u32) -> f64 {
        self.expect(state, mover, plies, Ply::Min)
    }

    fn expect(&mut self, state: &GameState, root: Player, plies: u32, ply: Ply) -> f64 {
        self.stats.nodes += 1;
        let terminal = self.cfg.turn_model == TurnModel::FollowTurn && state.is_over();
        if plies == 0 || terminal {
            return self.leaf(state, root);
        }
        let dice = self.cfg.dice;
        dice.outcomes()
            .filter(|&(_, p)| p > 0.0)
            .map(|(roll, p)| p * self.decide(state, root, roll, plies, ply))
            .sum()
    }

    fn decide(&mut self, state: &GameState, root: Player, roll: u8, plies: u32, ply: Ply) -> f64 {
        self.stats.nodes += 1;
        let moves = legal_moves(state, roll);
        if moves.is_empty() {
            let mut passed = *state;
            pass_turn(&mut passed);
            return self.expect(&passed, root, plies - 1, ply.flip());
        }

        let maximize = match self.cfg.turn_model {
            TurnModel::FollowTurn => state.turn == root,
            TurnModel::Alternating => matches!(ply, Ply::Max),
        };
        let mut best = if maximize { f64::NEG_INFINITY } else { f64::INFINITY };
        for piece in moves.iter() {
            let mut child = *state;
            apply_move(&mut child, piece, roll);
            let value = self.expect(&child, root, plies - 1, ply.flip());
            best = if maximize { best.max(value) } else { best.min(value) };
        }
        best
    }

    fn leaf(&mut self, state: &GameState, root: Player) -> f64 {
        self.stats.leaves += 1;
        let perspective = match self.cfg.turn_model {
            TurnModel::FollowTurn => root,
            TurnModel::Alternating => state.turn,
        };
        evaluate(state, perspective, &self.cfg.weights)
    }
}

/// Highest-valued branch; ties go to the earliest.
pub fn best_branch(evals: &[BranchEval]) -> Option<BranchEval> {
    let mut best: Option<BranchEval> = None;
    for &eval in evals {
        if best.is_none_or(|b| eval.value > b.value) {
            best = Some(eval);
        }
    }
    best
}

/// Search-based policy.
pub struct ExpectimaxBot {
    name: String,
    search: Expectimax,
}

impl ExpectimaxBot {
    pub fn new(cfg: SearchConfig) -> Self {
        Self {
            name: format!("expectimax{}", cfg.depth),
            search: Expectimax::new(cfg),
        }
    }

    pub fn search(&self) -> &Expectimax {
        &self.search
    }
}

impl Policy for ExpectimaxBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, state: &GameState, roll: u8) -> Option<usize> {
        self.search.choose(state, roll)
    }
}
