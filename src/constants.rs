//! Constants for board geometry, dice, evaluation weights and search defaults.
//!
//! Board squares are numbered `0..SQUARES`. Each player walks a private
//! entry lane, the shared middle row (squares 6 to 12), then a private exit
//! lane. A piece's progress is stored as a *step* index along its own path
//! rather than as a square, so the two players never need to agree on
//! direction.

// =============================================================================
// Pieces and Steps
// =============================================================================

/// Pieces per player.
pub const PIECES: usize = 7;

/// Number of on-board steps. A piece at this step has borne off.
pub const FINAL_STEP: i8 = 13;

/// Step value of a piece that has not entered the board yet.
pub const OFFBOARD: i8 = -1;

/// Total number of distinct board squares.
pub const SQUARES: usize = 19;

// =============================================================================
// Paths and Distinguished Squares
// =============================================================================

/// Squares visited by the first player, in step order.
pub const PATH_FIRST: [u8; FINAL_STEP as usize] = [3, 2, 1, 0, 6, 7, 8, 9, 10, 11, 12, 5, 4];

/// Squares visited by the second player, in step order.
pub const PATH_SECOND: [u8; FINAL_STEP as usize] =
    [16, 15, 14, 13, 6, 7, 8, 9, 10, 11, 12, 18, 17];

/// Rosette squares: landing on one (without finishing) grants another turn.
pub const ROSETTES: [u8; 5] = [0, 4, 9, 13, 17];

/// Squares where a piece can never be captured. Only the central rosette
/// under the standard rules.
pub const SAFE_SQUARES: [u8; 1] = [9];

// =============================================================================
// Dice
// =============================================================================

/// Highest possible roll (four binary dice).
pub const MAX_ROLL: u8 = 4;

/// Number of binary dice thrown per turn.
pub const DICE_COUNT: u32 = 4;

/// Probability of each roll `0..=4` for four fair binary dice.
pub const DICE_PROBS: [f64; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

// =============================================================================
// Evaluation Weights
// =============================================================================

/// Score per step of progress (own minus opponent).
pub const WEIGHT_PROGRESS: f64 = 2.0;

/// Score per finished piece (own minus opponent).
pub const WEIGHT_FINISHED: f64 = 15.0;

/// Score per piece standing on a rosette (own minus opponent).
pub const WEIGHT_ROSETTE: f64 = 3.0;

// =============================================================================
// Search and Game Driver
// =============================================================================

/// Default expectimax depth, counted in chance plies after the root move.
pub const DEFAULT_DEPTH: u32 = 2;

/// Hard cap on turns in a single game. Real games finish far sooner; the
/// cap only guards against a policy that keeps passing.
pub const MAX_GAME_TURNS: usize = 10_000;

/// Default number of games for a head-to-head run.
pub const DEFAULT_GAMES: usize = 200;
