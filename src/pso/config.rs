//! Particle-swarm configuration.

use crate::error::{Result, TuneError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the discrete particle-swarm searcher.
///
/// On every move, each parameter of a particle independently takes the
/// global best's value with probability `influence_global`, the particle's
/// own best value with probability `influence_local`, a random legal value
/// with probability `influence_random`, and otherwise keeps its value.
///
/// # Examples
///
/// ```
/// use u_tuner::pso::PsoConfig;
///
/// let config = PsoConfig::default()
///     .with_swarm_size(8)
///     .with_influences(0.5, 0.2, 0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PsoConfig {
    /// Number of particles.
    pub swarm_size: usize,
    /// Pull towards the swarm's best configuration.
    pub influence_global: f64,
    /// Pull towards the particle's own best configuration.
    pub influence_local: f64,
    /// Chance of a random jump per parameter.
    pub influence_random: f64,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            swarm_size: 4,
            influence_global: 0.4,
            influence_local: 0.2,
            influence_random: 0.4,
            seed: None,
        }
    }
}

impl PsoConfig {
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    /// Sets the global, local and random influences.
    pub fn with_influences(mut self, global: f64, local: f64, random: f64) -> Self {
        self.influence_global = global;
        self.influence_local = local;
        self.influence_random = random;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.swarm_size == 0 {
            return Err(TuneError::InvalidConfig("swarm_size must be at least 1".into()));
        }
        let influences = [
            ("influence_global", self.influence_global),
            ("influence_local", self.influence_local),
            ("influence_random", self.influence_random),
        ];
        for (name, value) in influences {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuneError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        let total = self.influence_global + self.influence_local + self.influence_random;
        if total > 1.0 + 1e-9 {
            return Err(TuneError::InvalidConfig(format!(
                "influences must sum to at most 1, got {total}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(PsoConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_swarm_size() {
        assert!(PsoConfig::default().with_swarm_size(0).validate().is_err());
    }

    #[test]
    fn test_validate_influences() {
        assert!(PsoConfig::default().with_influences(-0.1, 0.0, 0.0).validate().is_err());
        assert!(PsoConfig::default().with_influences(0.6, 0.3, 0.3).validate().is_err());
        assert!(PsoConfig::default().with_influences(0.0, 0.0, 0.0).validate().is_ok());
    }
}
