//! Exhaustive search in index order.

use super::types::Searcher;
use crate::energy::EnergyTable;
use crate::space::{Configuration, ConfigurationSpace};

/// Visits every configuration once, in index order.
#[derive(Debug, Clone)]
pub struct FullSearch<'a> {
    space: &'a ConfigurationSpace,
    index: usize,
    rounds: usize,
    exhausted: bool,
}

impl<'a> FullSearch<'a> {
    pub fn new(space: &'a ConfigurationSpace) -> Self {
        Self {
            space,
            index: 0,
            rounds: 0,
            exhausted: false,
        }
    }
}

impl Searcher for FullSearch<'_> {
    fn name(&self) -> &str {
        "full"
    }

    fn index(&self) -> usize {
        self.index
    }

    fn configuration(&self) -> &Configuration {
        self.space.configuration(self.index)
    }

    fn calculate_next_index(&mut self, _energies: &EnergyTable) {
        self.rounds += 1;
        if self.index + 1 < self.space.size() {
            self.index += 1;
        } else {
            self.exhausted = true;
        }
    }

    fn num_configurations(&self) -> usize {
        self.rounds
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
