//! Game state representation and move execution.
//!
//! This module provides the core rules engine:
//! - `Copy` game state with fixed-size piece arrays
//! - Legal move generation for a given roll
//! - Move application (captures, rosette bonus turns, bearing off)
//! - Win detection
//!
//! Search code copies the state freely, so everything here is plain data and
//! none of it allocates.

use std::fmt;

use thiserror::Error;

use crate::board::{LAYOUT, Player, Rules, Square};
use crate::constants::{FINAL_STEP, MAX_ROLL, OFFBOARD, PIECES};

/// Why a move cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: a roll of 0 never moves a piece")]
    ZeroRoll,
    #[error("illegal move: roll {0} is outside 0..={max}", max = MAX_ROLL)]
    InvalidRoll(u8),
    #[error("illegal move: no piece with index {0}")]
    NoSuchPiece(usize),
    #[error("illegal move: piece {0} has already finished")]
    AlreadyFinished(usize),
    #[error("illegal move: piece {piece} would overshoot the final step (reaches {step})")]
    Overshoot { piece: usize, step: i8 },
    #[error("illegal move: square {square} is occupied by one of your pieces")]
    BlockedByOwnPiece { square: Square },
    #[error("illegal move: square {square} is safe and occupied by the opponent")]
    SafeSquareOccupied { square: Square },
}

/// What happened when a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub piece: usize,
    pub from: i8,
    pub to: i8,
    /// Index of the opponent piece sent back off the board, if any.
    pub captured: Option<usize>,
    /// The mover keeps the turn (landed on a rosette).
    pub extra_turn: bool,
    pub finished: bool,
    /// The move finished the mover's last piece.
    pub won: bool,
}

/// Legal moves for one roll: piece indices in ascending order.
///
/// Fixed capacity so move generation inside the search never allocates.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MoveList {
    moves: [u8; PIECES],
    len: u8,
}

impl MoveList {
    const fn new() -> Self {
        MoveList {
            moves: [0; PIECES],
            len: 0,
        }
    }

    #[inline]
    fn push(&mut self, piece: usize) {
        self.moves[self.len as usize] = piece as u8;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, piece: usize) -> bool {
        self.iter().any(|m| m == piece)
    }

    /// The `i`-th legal move, if any.
    pub fn get(&self, i: usize) -> Option<usize> {
        (i < self.len()).then(|| self.moves[i] as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.moves[..self.len()].iter().map(|&m| m as usize)
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A game position.
///
/// Each piece is stored as a step along its owner's path: [`OFFBOARD`] before
/// entering, `0..FINAL_STEP` on the path, [`FINAL_STEP`] once borne off.
#[derive(Clone, Copy, PartialEq)]
pub struct GameState {
    pub positions: [[i8; PIECES]; 2],
    pub turn: Player,
    winner: Option<Player>,
    rules: &'static Rules,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh game under the standard rules: all pieces off the board, first
    /// player to act.
    pub fn new() -> Self {
        Self::with_rules(&Rules::STANDARD)
    }

    pub fn with_rules(rules: &'static Rules) -> Self {
        GameState {
            positions: [[OFFBOARD; PIECES]; 2],
            turn: Player::First,
            winner: None,
            rules,
        }
    }

    /// Build a position directly. The winner is derived from `positions`.
    ///
    /// Steps outside `OFFBOARD..=FINAL_STEP` are clamped into range.
    pub fn from_positions(
        rules: &'static Rules,
        positions: [[i8; PIECES]; 2],
        turn: Player,
    ) -> Self {
        let mut state = GameState {
            positions: positions.map(|side| side.map(|s| s.clamp(OFFBOARD, FINAL_STEP))),
            turn,
            winner: None,
            rules,
        };
        state.winner = Player::BOTH.into_iter().find(|&p| state.all_finished(p));
        state
    }

    #[inline]
    pub fn rules(&self) -> &'static Rules {
        self.rules
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Steps of all of `player`'s pieces.
    #[inline]
    pub fn pieces(&self, player: Player) -> &[i8; PIECES] {
        &self.positions[player.index()]
    }

    #[inline]
    pub fn step(&self, player: Player, piece: usize) -> i8 {
        self.positions[player.index()][piece]
    }

    /// Square under a piece, or `None` when it is off the board or finished.
    #[inline]
    pub fn square_of(&self, player: Player, piece: usize) -> Option<Square> {
        let step = self.step(player, piece);
        (0..FINAL_STEP)
            .contains(&step)
            .then(|| self.rules.square(player, step))
    }

    /// Index of `player`'s piece standing on `square`, if any.
    pub fn piece_at(&self, player: Player, square: Square) -> Option<usize> {
        (0..PIECES).find(|&i| self.square_of(player, i) == Some(square))
    }

    /// Who, if anyone, stands on `square`.
    pub fn occupant(&self, square: Square) -> Option<(Player, usize)> {
        Player::BOTH
            .into_iter()
            .find_map(|p| self.piece_at(p, square).map(|i| (p, i)))
    }

    pub fn finished_count(&self, player: Player) -> usize {
        self.pieces(player).iter().filter(|&&s| s == FINAL_STEP).count()
    }

    fn all_finished(&self, player: Player) -> bool {
        self.pieces(player).iter().all(|&s| s == FINAL_STEP)
    }
}

/// Check whether the player to act may move `piece` by `roll`.
///
/// This is the single legality predicate behind [`legal_moves`],
/// [`apply_move`] and [`try_apply_move`].
pub fn check_move(state: &GameState, piece: usize, roll: u8) -> Result<(), MoveError> {
    if roll == 0 {
        return Err(MoveError::ZeroRoll);
    }
    if roll > MAX_ROLL {
        return Err(MoveError::InvalidRoll(roll));
    }
    if piece >= PIECES {
        return Err(MoveError::NoSuchPiece(piece));
    }
    let me = state.turn;
    let step = state.step(me, piece);
    if step == FINAL_STEP {
        return Err(MoveError::AlreadyFinished(piece));
    }
    let new = step + roll as i8;
    if new > FINAL_STEP {
        return Err(MoveError::Overshoot { piece, step: new });
    }
    // Bearing off with the exact roll is never blocked
    if new == FINAL_STEP {
        return Ok(());
    }
    let target = state.rules.square(me, new);
    if state.piece_at(me, target).is_some() {
        return Err(MoveError::BlockedByOwnPiece { square: target });
    }
    if state.rules.is_safe(target) && state.piece_at(me.opponent(), target).is_some() {
        return Err(MoveError::SafeSquareOccupied { square: target });
    }
    Ok(())
}

/// Pieces the player to act may move with `roll`, in ascending index order.
///
/// Empty for a roll of 0, a roll the dice cannot produce, or when every
/// piece is blocked; the caller is then responsible for passing the turn.
pub fn legal_moves(state: &GameState, roll: u8) -> MoveList {
    let mut moves = MoveList::new();
    if roll == 0 || roll > MAX_ROLL {
        return moves;
    }
    for piece in 0..PIECES {
        if check_move(state, piece, roll).is_ok() {
            moves.push(piece);
        }
    }
    moves
}

/// Apply a legal move for the player to act.
///
/// # Panics
/// If `piece` is not in `legal_moves(state, roll)`. Playing an illegal move
/// is a programming error; use [`try_apply_move`] for untrusted input.
pub fn apply_move(state: &mut GameState, piece: usize, roll: u8) -> MoveOutcome {
    if let Err(e) = check_move(state, piece, roll) {
        panic!("apply_move({piece}, roll {roll}) for {}: {e}", state.turn);
    }
    apply_unchecked(state, piece, roll)
}

/// Apply a move if it is legal; on error the state is left untouched.
pub fn try_apply_move(
    state: &mut GameState,
    piece: usize,
    roll: u8,
) -> Result<MoveOutcome, MoveError> {
    check_move(state, piece, roll)?;
    Ok(apply_unchecked(state, piece, roll))
}

/// Give the turn to the other player without moving.
#[inline]
pub fn pass_turn(state: &mut GameState) {
    state.turn = state.turn.opponent();
}

fn apply_unchecked(state: &mut GameState, piece: usize, roll: u8) -> MoveOutcome {
    let me = state.turn;
    let from = state.step(me, piece);
    let to = from + roll as i8;
    state.positions[me.index()][piece] = to;

    let mut outcome = MoveOutcome {
        piece,
        from,
        to,
        captured: None,
        extra_turn: false,
        finished: false,
        won: false,
    };

    // Bearing off never grants another turn
    if to == FINAL_STEP {
        outcome.finished = true;
        if state.all_finished(me) {
            state.winner = Some(me);
            outcome.won = true;
        }
        pass_turn(state);
        return outcome;
    }

    let target = state.rules.square(me, to);
    if !state.rules.is_safe(target) {
        let opp = me.opponent();
        if let Some(victim) = state.piece_at(opp, target) {
            state.positions[opp.index()][victim] = OFFBOARD;
            outcome.captured = Some(victim);
        }
    }

    if state.rules.is_rosette(target) {
        outcome.extra_turn = true;
    } else {
        pass_turn(state);
    }
    outcome
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("positions", &self.positions)
            .field("turn", &self.turn)
            .field("winner", &self.winner)
            .field("rules", &self.rules.name)
            .finish()
    }
}

/// Plain-text board: `A`/`B` for pieces, `*` rosette, `#` safe rosette.
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in LAYOUT {
            for cell in row {
                let ch = match cell {
                    None => ' ',
                    Some(sq) => match self.occupant(sq) {
                        Some((Player::First, _)) => 'A',
                        Some((Player::Second, _)) => 'B',
                        None if self.rules.is_safe(sq) => '#',
                        None if self.rules.is_rosette(sq) => '*',
                        None => '.',
                    },
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        for p in Player::BOTH {
            let waiting = self.pieces(p).iter().filter(|&&s| s == OFFBOARD).count();
            writeln!(
                f,
                "{p}: waiting {waiting}, finished {}",
                self.finished_count(p)
            )?;
        }
        match self.winner {
            Some(w) => writeln!(f, "winner: {w}"),
            None => writeln!(f, "to move: {}", self.turn),
        }
    }
}
