//! Uniform random search without replacement.

use super::types::Searcher;
use crate::energy::EnergyTable;
use crate::error::{Result, TuneError};
use crate::random::{rng_from, sample_count};
use crate::space::{Configuration, ConfigurationSpace};

/// Visits a random `fraction` of the space, each configuration at most once.
///
/// The visiting order is drawn up front from the seeded generator, so two
/// searchers built with the same seed walk the same sequence.
#[derive(Debug, Clone)]
pub struct RandomSearch<'a> {
    space: &'a ConfigurationSpace,
    order: Vec<usize>,
    cursor: usize,
    rounds: usize,
}

impl<'a> RandomSearch<'a> {
    /// Creates a random searcher.
    ///
    /// `fraction` must be in `(0, 1]`.
    pub fn new(space: &'a ConfigurationSpace, fraction: f64, seed: Option<u64>) -> Result<Self> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(TuneError::InvalidConfig(format!(
                "fraction must be in (0, 1], got {fraction}"
            )));
        }
        let mut rng = rng_from(seed);
        let amount = sample_count(fraction, space.size());
        let order = rand::seq::index::sample(&mut rng, space.size(), amount).into_vec();

        Ok(Self {
            space,
            order,
            cursor: 0,
            rounds: 0,
        })
    }

    /// Number of configurations this searcher will visit.
    pub fn planned(&self) -> usize {
        self.order.len()
    }
}

impl Searcher for RandomSearch<'_> {
    fn name(&self) -> &str {
        "random"
    }

    fn index(&self) -> usize {
        self.order[self.cursor.min(self.order.len() - 1)]
    }

    fn configuration(&self) -> &Configuration {
        self.space.configuration(self.index())
    }

    fn calculate_next_index(&mut self, _energies: &EnergyTable) {
        self.rounds += 1;
        if self.cursor < self.order.len() {
            self.cursor += 1;
        }
    }

    fn num_configurations(&self) -> usize {
        self.rounds
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.order.len()
    }
}
