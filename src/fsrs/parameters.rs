//! Model parameters: target retention, interval cap and the weight vector.

use crate::error::{KarteiError, Result};

/// Number of model weights.
pub const WEIGHT_COUNT: usize = 17;

/// Default weights.
///
/// | index | role |
/// |---|---|
/// | 0..=3 | initial stability for Again/Hard/Good/Easy |
/// | 4, 5 | initial difficulty center and slope |
/// | 6 | difficulty delta per rating step |
/// | 7 | mean reversion weight |
/// | 8..=10 | recall stability growth |
/// | 11..=14 | forget stability |
/// | 15 | hard penalty |
/// | 16 | easy bonus |
pub const DEFAULT_WEIGHTS: [f64; WEIGHT_COUNT] = [
    0.4, 0.6, 2.4, 5.8, 4.93, 0.94, 0.86, 0.01, 1.49, 0.14, 0.94, 2.18, 0.05, 0.34, 1.26, 0.29, 2.61,
];

pub const DEFAULT_REQUEST_RETENTION: f64 = 0.9;
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36500;

/// Largest accepted interval cap, in days. Due dates must stay inside the
/// calendar range even after the ordering bumps add a day or two.
pub const MAX_MAXIMUM_INTERVAL: u32 = DEFAULT_MAXIMUM_INTERVAL * 100;

/// Immutable scheduler configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    request_retention: f64,
    maximum_interval: u32,
    weights: [f64; WEIGHT_COUNT],
}

impl Parameters {
    /// Validate and build a parameter set.
    ///
    /// Rejects a weight vector that is not exactly 17 finite values, a
    /// retention outside the open interval (0, 1) and an interval cap outside
    /// `1..=MAX_MAXIMUM_INTERVAL`.
    pub fn new(request_retention: f64, maximum_interval: u32, weights: &[f64]) -> Result<Self> {
        if !request_retention.is_finite() || request_retention <= 0.0 || request_retention >= 1.0 {
            return Err(KarteiError::InvalidConfiguration(format!(
                "request retention must be in (0, 1), got {}",
                request_retention
            )));
        }
        if maximum_interval == 0 {
            return Err(KarteiError::InvalidConfiguration(
                "maximum interval must be at least one day".to_string(),
            ));
        }
        if maximum_interval > MAX_MAXIMUM_INTERVAL {
            return Err(KarteiError::InvalidConfiguration(format!(
                "maximum interval must be at most {} days, got {}",
                MAX_MAXIMUM_INTERVAL, maximum_interval
            )));
        }
        let weights: [f64; WEIGHT_COUNT] = weights.try_into().map_err(|_| {
            KarteiError::InvalidConfiguration(format!("expected {} weights, got {}", WEIGHT_COUNT, weights.len()))
        })?;
        if let Some(idx) = weights.iter().position(|w| !w.is_finite()) {
            return Err(KarteiError::InvalidConfiguration(format!(
                "weight {} is not a finite number",
                idx
            )));
        }

        Ok(Self {
            request_retention,
            maximum_interval,
            weights,
        })
    }

    pub fn request_retention(&self) -> f64 {
        self.request_retention
    }

    pub fn maximum_interval(&self) -> u32 {
        self.maximum_interval
    }

    pub fn weights(&self) -> &[f64; WEIGHT_COUNT] {
        &self.weights
    }

    pub(crate) fn w(&self, idx: usize) -> f64 {
        self.weights[idx]
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            request_retention: DEFAULT_REQUEST_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            weights: DEFAULT_WEIGHTS,
        }
    }
}
