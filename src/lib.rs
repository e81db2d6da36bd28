//! Ur-Arena: a Royal Game of Ur race engine with expectimax bots.
//!
//! This crate provides the rules engine for a two-player Ur variant and a
//! set of decision policies that can be pitted against each other, the
//! strongest of which search the dice tree with depth-bounded expectimax.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, dice table and default parameters
//! - [`board`] - Paths, players and the rosette/safe square sets
//! - [`dice`] - Dice distribution and sampling
//! - [`game`] - Core game logic (legal moves, captures, bonus turns, winning)
//! - [`eval`] - Static positional evaluation
//! - [`analysis`] - Move predicates shared by the heuristic bots
//! - [`expectimax`] - Expectimax search over dice outcomes
//! - [`policy`] - The policy trait and the heuristic bots
//! - [`playout`] - Game driver
//!
//! ## Example
//!
//! ```
//! use ur_arena::dice::roll_dice;
//! use ur_arena::expectimax::{Expectimax, SearchConfig};
//! use ur_arena::game::{GameState, apply_move, legal_moves, pass_turn};
//!
//! let mut state = GameState::new();
//! let mut rng = fastrand::Rng::with_seed(42);
//! let mut search = Expectimax::new(SearchConfig::depth(1));
//!
//! let roll = roll_dice(&mut rng);
//! match search.choose(&state, roll) {
//!     Some(piece) => {
//!         assert!(legal_moves(&state, roll).contains(piece));
//!         apply_move(&mut state, piece, roll);
//!     }
//!     None => pass_turn(&mut state),
//! }
//! ```

pub mod analysis;
pub mod board;
pub mod constants;
pub mod dice;
pub mod eval;
pub mod expectimax;
pub mod game;
pub mod playout;
pub mod policy;
