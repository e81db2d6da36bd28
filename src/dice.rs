//! Dice: four binary dice summed into a roll in `0..=4`.
//!
//! A [`Dice`] carries both the per-die pip probability (used for sampling)
//! and the matching probability mass function (used by the search's chance
//! nodes), so the two can never drift apart.

use crate::constants::{DICE_COUNT, DICE_PROBS, MAX_ROLL};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dice {
    pip: f64,
    pmf: [f64; MAX_ROLL as usize + 1],
}

impl Default for Dice {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl Dice {
    /// Four fair binary dice: `P(0..=4) = 1,4,6,4,1 / 16`.
    pub const STANDARD: Dice = Dice {
        pip: 0.5,
        pmf: DICE_PROBS,
    };

    /// Four binary dice that each show a pip with probability `pip`.
    ///
    /// `pip` is clamped to `[0, 1]`.
    pub fn with_pip_probability(pip: f64) -> Self {
        let pip = pip.clamp(0.0, 1.0);
        let n = DICE_COUNT as i32;
        let mut pmf = [0.0; MAX_ROLL as usize + 1];
        for (k, p) in pmf.iter_mut().enumerate() {
            let k = k as i32;
            *p = binomial(n, k) * pip.powi(k) * (1.0 - pip).powi(n - k);
        }
        Dice { pip, pmf }
    }

    #[inline]
    pub fn pip_probability(&self) -> f64 {
        self.pip
    }

    /// Probability of each roll, indexed by roll value.
    #[inline]
    pub fn pmf(&self) -> &[f64; MAX_ROLL as usize + 1] {
        &self.pmf
    }

    /// `(roll, probability)` pairs for every roll value.
    pub fn outcomes(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.pmf.iter().enumerate().map(|(r, &p)| (r as u8, p))
    }

    /// Throw the dice.
    pub fn roll(&self, rng: &mut fastrand::Rng) -> u8 {
        (0..DICE_COUNT).filter(|_| rng.f64() < self.pip).count() as u8
    }
}

/// Roll the standard dice.
#[inline]
pub fn roll_dice(rng: &mut fastrand::Rng) -> u8 {
    Dice::STANDARD.roll(rng)
}

fn binomial(n: i32, k: i32) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_verbatim() {
        assert_eq!(
            Dice::STANDARD.pmf(),
            &[1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0]
        );
        let fair = Dice::with_pip_probability(0.5);
        for (a, b) in fair.pmf().iter().zip(Dice::STANDARD.pmf()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_biased_pmf_sums_to_one() {
        let biased = Dice::with_pip_probability(0.75);
        let total: f64 = biased.pmf().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((biased.pmf()[4] - 81.0 / 256.0).abs() < 1e-12);
        assert!((biased.pmf()[0] - 1.0 / 256.0).abs() < 1e-12);
    }

    #[test]
    fn test_roll_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            assert!(roll_dice(&mut rng) <= MAX_ROLL);
        }
    }

    #[test]
    fn test_sampled_distribution_matches_table() {
        let mut rng = fastrand::Rng::with_seed(2024);
        let samples = 200_000;
        let mut counts = [0usize; 5];
        for _ in 0..samples {
            counts[roll_dice(&mut rng) as usize] += 1;
        }
        for (roll, &expected) in DICE_PROBS.iter().enumerate() {
            let observed = counts[roll] as f64 / samples as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "roll {roll}: observed {observed:.4}, expected {expected:.4}"
            );
        }
    }
}
