//! Board geometry: per-player paths and the rosette/safe square sets.
//!
//! A [`Rules`] table is immutable `'static` data shared by every game state,
//! so states stay `Copy` no matter which rule variant is in force.

use std::fmt;

use crate::constants::{FINAL_STEP, PATH_FIRST, PATH_SECOND, ROSETTES, SAFE_SQUARES};

/// A board square identifier, `0..SQUARES`.
pub type Square = u8;

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Both players in turn order.
    pub const BOTH: [Player; 2] = [Player::First, Player::Second];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.index())
    }
}

const fn mask_of(squares: &[u8]) -> u32 {
    let mut mask = 0u32;
    let mut i = 0;
    while i < squares.len() {
        mask |= 1 << squares[i];
        i += 1;
    }
    mask
}

/// Paths plus the two distinguished square sets.
///
/// Square sets are bitmasks indexed by square id.
#[derive(Debug, PartialEq, Eq)]
pub struct Rules {
    pub name: &'static str,
    paths: [[Square; FINAL_STEP as usize]; 2],
    rosettes: u32,
    safe: u32,
}

impl Rules {
    /// Canonical rule set: five rosettes, only the central one is safe.
    pub const STANDARD: Rules = Rules {
        name: "standard",
        paths: [PATH_FIRST, PATH_SECOND],
        rosettes: mask_of(&ROSETTES),
        safe: mask_of(&SAFE_SQUARES),
    };

    /// Variant without safe squares: the central rosette can be taken.
    pub const OPEN_CENTER: Rules = Rules {
        name: "open-center",
        paths: [PATH_FIRST, PATH_SECOND],
        rosettes: mask_of(&ROSETTES),
        safe: 0,
    };

    /// The ordered squares `player` visits.
    #[inline]
    pub fn path(&self, player: Player) -> &[Square; FINAL_STEP as usize] {
        &self.paths[player.index()]
    }

    /// Square under an on-path step. `step` must be in `0..FINAL_STEP`.
    #[inline]
    pub fn square(&self, player: Player, step: i8) -> Square {
        debug_assert!((0..FINAL_STEP).contains(&step), "step {step} is not on the path");
        self.paths[player.index()][step as usize]
    }

    #[inline]
    pub fn is_rosette(&self, square: Square) -> bool {
        self.rosettes & (1 << square) != 0
    }

    #[inline]
    pub fn is_safe(&self, square: Square) -> bool {
        self.safe & (1 << square) != 0
    }
}

/// Display layout: three rows of eight columns, `None` for gaps.
///
/// Top row is the first player's private lane, bottom row the second's.
pub(crate) const LAYOUT: [[Option<Square>; 8]; 3] = [
    [Some(0), Some(1), Some(2), Some(3), None, None, Some(4), Some(5)],
    [Some(6), Some(7), Some(8), Some(9), Some(10), Some(11), Some(12), None],
    [Some(13), Some(14), Some(15), Some(16), None, None, Some(17), Some(18)],
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SQUARES;

    #[test]
    fn test_paths_share_middle_row_only() {
        let rules = &Rules::STANDARD;
        let first = rules.path(Player::First);
        let second = rules.path(Player::Second);
        let shared: Vec<_> = first.iter().filter(|sq| second.contains(sq)).collect();
        assert_eq!(shared, vec![&6, &7, &8, &9, &10, &11, &12]);
        assert_eq!(first[4..11], second[4..11]);
    }

    #[test]
    fn test_square_sets() {
        let rules = &Rules::STANDARD;
        let rosettes: Vec<u8> = (0..SQUARES as u8).filter(|&s| rules.is_rosette(s)).collect();
        let safe: Vec<u8> = (0..SQUARES as u8).filter(|&s| rules.is_safe(s)).collect();
        assert_eq!(rosettes, vec![0, 4, 9, 13, 17]);
        assert_eq!(safe, vec![9]);

        let variant = &Rules::OPEN_CENTER;
        assert!((0..SQUARES as u8).all(|s| !variant.is_safe(s)));
        assert!(variant.is_rosette(9));
    }

    #[test]
    fn test_layout_covers_every_square_once() {
        let mut seen = [0u8; SQUARES];
        for row in LAYOUT {
            for sq in row.into_iter().flatten() {
                seen[sq as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Player::First.opponent(), Player::Second);
        assert_eq!(Player::Second.opponent().index(), 0);
    }
}
