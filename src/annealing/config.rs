//! Annealing configuration and cooling schedules.

use crate::error::{Result, TuneError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cooling schedule: temperature as a function of the number of judged
/// rounds `k`.
///
/// Every schedule is monotonically non-increasing in `k` and starts at the
/// configured maximum temperature.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - Linear: fixed-duration cooling
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_k = T_0 * alpha^k`.
    ///
    /// Never reaches zero. Typical `alpha`: 0.9–0.99.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling: `T_k = T_0 * (1 - k / rounds)`, floored at zero.
    ///
    /// Once the temperature reaches zero only non-worsening moves are
    /// accepted.
    Linear {
        /// Number of rounds after which the walk is purely greedy.
        rounds: usize,
    },

    /// Lundy-Mees cooling: `T_k = T_0 / (1 + k * beta * T_0)`.
    ///
    /// Closed form of `T_{k+1} = T_k / (1 + beta * T_k)`. Cools fast at high
    /// T, slow at low T.
    LundyMees {
        /// Cooling parameter, positive.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

impl CoolingSchedule {
    /// Temperature after `round` judged rounds, starting from `max_temperature`.
    pub fn temperature(&self, max_temperature: f64, round: usize) -> f64 {
        let k = round as f64;
        match *self {
            CoolingSchedule::Geometric { alpha } => max_temperature * alpha.powf(k),
            CoolingSchedule::Linear { rounds } => {
                if rounds == 0 {
                    0.0
                } else {
                    (max_temperature * (1.0 - k / rounds as f64)).max(0.0)
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                max_temperature / (1.0 + k * beta * max_temperature)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            CoolingSchedule::Geometric { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(TuneError::InvalidConfig(format!(
                        "geometric alpha must be in (0, 1), got {alpha}"
                    )));
                }
            }
            CoolingSchedule::Linear { rounds } => {
                if rounds == 0 {
                    return Err(TuneError::InvalidConfig(
                        "linear cooling needs at least one round".into(),
                    ));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if !(beta > 0.0 && beta.is_finite()) {
                    return Err(TuneError::InvalidConfig(format!(
                        "lundy-mees beta must be positive, got {beta}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Configuration for the simulated-annealing searcher.
///
/// # Examples
///
/// ```
/// use u_tuner::annealing::{AnnealingConfig, CoolingSchedule};
///
/// let config = AnnealingConfig::default()
///     .with_fraction(0.5)
///     .with_max_temperature(4.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnealingConfig {
    /// Share of a configuration's neighbours sampled per round, in (0, 1].
    ///
    /// Bounds the cost of neighbour generation in high-dimensional spaces.
    pub fraction: f64,

    /// Initial temperature. Should be on the scale of the energy
    /// differences between neighbours.
    pub max_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            fraction: 1.0,
            max_temperature: 4.0,
            cooling: CoolingSchedule::default(),
            seed: None,
        }
    }
}

impl AnnealingConfig {
    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    pub fn with_max_temperature(mut self, t: f64) -> Self {
        self.max_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.fraction > 0.0 && self.fraction <= 1.0) {
            return Err(TuneError::InvalidConfig(format!(
                "fraction must be in (0, 1], got {}",
                self.fraction
            )));
        }
        if !(self.max_temperature > 0.0 && self.max_temperature.is_finite()) {
            return Err(TuneError::InvalidConfig(format!(
                "max_temperature must be positive, got {}",
                self.max_temperature
            )));
        }
        self.cooling.validate()
    }
}
