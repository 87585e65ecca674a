//! Tuning-run configuration.

use crate::error::{Result, TuneError};

/// Budget and stopping rules for [`TuneRunner`](super::TuneRunner).
///
/// # Examples
///
/// ```
/// use u_tuner::tuner::TuneConfig;
///
/// let config = TuneConfig::default()
///     .with_max_rounds(200)
///     .with_stop_on_exhaustion(false);
/// assert_eq!(config.max_rounds, 200);
/// ```
#[derive(Debug, Clone)]
pub struct TuneConfig {
    /// Maximum number of rounds. 0 = one per configuration in the space.
    pub max_rounds: usize,

    /// Stop as soon as the searcher reports exhaustion.
    pub stop_on_exhaustion: bool,

    /// Reuse a recorded outcome when the searcher revisits a configuration
    /// instead of measuring it again.
    pub reuse_evaluations: bool,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            max_rounds: 0,
            stop_on_exhaustion: true,
            reuse_evaluations: true,
        }
    }
}

impl TuneConfig {
    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    pub fn with_stop_on_exhaustion(mut self, stop: bool) -> Self {
        self.stop_on_exhaustion = stop;
        self
    }

    pub fn with_reuse_evaluations(mut self, reuse: bool) -> Self {
        self.reuse_evaluations = reuse;
        self
    }

    /// Effective round budget for a space of `size` configurations.
    pub fn budget(&self, size: usize) -> usize {
        if self.max_rounds == 0 {
            size
        } else {
            self.max_rounds
        }
    }

    /// Validates the configuration against the space size.
    pub fn validate(&self, size: usize) -> Result<()> {
        if self.budget(size) == 0 {
            return Err(TuneError::InvalidConfig(
                "round budget is zero for an empty space".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_defaults_to_space_size() {
        assert_eq!(TuneConfig::default().budget(37), 37);
        assert_eq!(TuneConfig::default().with_max_rounds(5).budget(37), 5);
    }

    #[test]
    fn test_validate() {
        assert!(TuneConfig::default().validate(3).is_ok());
        assert!(TuneConfig::default().validate(0).is_err());
    }
}
