//! Memory model formulas.
//!
//! Every function is pure. Weight indices are 0-based into
//! [`Parameters::weights`]; see [`DEFAULT_WEIGHTS`](super::DEFAULT_WEIGHTS)
//! for their roles.

use super::parameters::Parameters;
use super::types::Rating;

pub const MIN_STABILITY: f64 = 0.1;
pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Days-per-stability factor of the forgetting curve.
const DECAY_FACTOR: f64 = 9.0;

/// Estimated recall probability after `elapsed_days` for a given stability.
///
/// `R = (1 + t / (9 * S))^-1`
pub fn retrievability(elapsed_days: u32, stability: f64) -> f64 {
    (1.0 + f64::from(elapsed_days) / (DECAY_FACTOR * stability)).powi(-1)
}

pub fn clamp_difficulty(difficulty: f64) -> f64 {
    difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

impl Parameters {
    /// `max(W[r-1], 0.1)`
    pub fn init_stability(&self, rating: Rating) -> f64 {
        self.w(rating as usize - 1).max(MIN_STABILITY)
    }

    /// `clamp(W[4] - W[5] * (r - 3), 1, 10)`
    pub fn init_difficulty(&self, rating: Rating) -> f64 {
        clamp_difficulty(self.w(4) - self.w(5) * (rating.value() - 3.0))
    }

    /// Days until recall probability decays to the requested retention,
    /// rounded half-to-even and clamped to `[1, maximum_interval]`.
    pub fn next_interval(&self, stability: f64) -> u32 {
        let interval = stability * DECAY_FACTOR * (1.0 / self.request_retention() - 1.0);
        let max = f64::from(self.maximum_interval());
        // NaN falls through the clamp and saturates to 0 in the cast
        (interval.round_ties_even().clamp(1.0, max) as u32).max(1)
    }

    /// `W[7] * init + (1 - W[7]) * current`
    pub fn mean_reversion(&self, init: f64, current: f64) -> f64 {
        self.w(7) * init + (1.0 - self.w(7)) * current
    }

    /// `clamp(mean_reversion(W[4], d - W[6] * (r - 3)), 1, 10)`
    pub fn next_difficulty(&self, difficulty: f64, rating: Rating) -> f64 {
        let next = difficulty - self.w(6) * (rating.value() - 3.0);
        clamp_difficulty(self.mean_reversion(self.w(4), next))
    }

    /// Stability after a successful recall (Hard, Good or Easy).
    pub fn next_recall_stability(&self, difficulty: f64, stability: f64, retrievability: f64, rating: Rating) -> f64 {
        let hard_penalty = if rating == Rating::Hard { self.w(15) } else { 1.0 };
        let easy_bonus = if rating == Rating::Easy { self.w(16) } else { 1.0 };
        stability
            * (1.0
                + self.w(8).exp()
                    * (11.0 - difficulty)
                    * stability.powf(-self.w(9))
                    * (((1.0 - retrievability) * self.w(10)).exp() - 1.0)
                    * hard_penalty
                    * easy_bonus)
    }

    /// Stability after a lapse (Again).
    pub fn next_forget_stability(&self, difficulty: f64, stability: f64, retrievability: f64) -> f64 {
        self.w(11)
            * difficulty.powf(-self.w(12))
            * ((stability + 1.0).powf(self.w(13)) - 1.0)
            * ((1.0 - retrievability) * self.w(14)).exp()
    }
}
