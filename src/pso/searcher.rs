//! Discrete particle-swarm searcher.

use super::config::PsoConfig;
use crate::energy::EnergyTable;
use crate::error::Result;
use crate::random::rng_from;
use crate::searcher::Searcher;
use crate::space::{Configuration, ConfigurationSpace};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// Particle-swarm searcher over parameter positions.
///
/// Particles are evaluated round-robin. After a particle's configuration
/// has been measured, its personal best and the swarm's global best are
/// updated and the particle moves: each parameter is pulled towards the
/// global best, its own best, or a random value. A move that lands on a
/// configuration missing from the space (filtered out by a constraint)
/// becomes a jump to a random configuration.
///
/// The swarm never reports exhaustion; the orchestrator's budget ends it.
#[derive(Debug, Clone)]
pub struct PsoSearcher<'a> {
    space: &'a ConfigurationSpace,
    config: PsoConfig,
    positions: Vec<usize>,
    local_best: Vec<Option<(usize, f64)>>,
    global_best: Option<(usize, f64)>,
    particle: usize,
    rounds: usize,
    rng: StdRng,
}

impl<'a> PsoSearcher<'a> {
    /// Creates a swarm with particles at random configurations.
    pub fn new(space: &'a ConfigurationSpace, config: PsoConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = rng_from(config.seed);
        let positions = (0..config.swarm_size)
            .map(|_| rng.random_range(0..space.size()))
            .collect();

        Ok(Self {
            space,
            local_best: vec![None; config.swarm_size],
            config,
            positions,
            global_best: None,
            particle: 0,
            rounds: 0,
            rng,
        })
    }

    /// Best `(index, energy)` seen by the whole swarm.
    pub fn global_best(&self) -> Option<(usize, f64)> {
        self.global_best
    }

    /// Best `(index, energy)` seen by one particle.
    pub fn local_best(&self, particle: usize) -> Option<(usize, f64)> {
        self.local_best.get(particle).copied().flatten()
    }

    /// Current configuration index of every particle.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// The particle whose configuration is surfaced next.
    pub fn particle(&self) -> usize {
        self.particle
    }

    fn update_bests(&mut self, index: usize, energy: f64) {
        if !energy.is_finite() {
            return;
        }
        let local = &mut self.local_best[self.particle];
        if local.is_none_or(|(_, best)| energy < best) {
            *local = Some((index, energy));
        }
        if self.global_best.is_none_or(|(_, best)| energy < best) {
            debug!("pso: new global best {} at index {}", energy, index);
            self.global_best = Some((index, energy));
        }
    }

    fn move_particle(&mut self) -> usize {
        let space = self.space;
        let current = self.positions[self.particle];
        let Some(from) = space.positions(current) else {
            return self.rng.random_range(0..space.size());
        };
        let mut target = from.to_vec();

        let global = self.global_best.and_then(|(i, _)| space.positions(i));
        let local = self.local_best[self.particle].and_then(|(i, _)| space.positions(i));
        let g = self.config.influence_global;
        let l = g + self.config.influence_local;
        let r = l + self.config.influence_random;

        for (dim, param) in space.parameters().iter().enumerate() {
            let draw: f64 = self.rng.random();
            if draw < g {
                if let Some(best) = global {
                    target[dim] = best[dim];
                }
            } else if draw < l {
                if let Some(best) = local {
                    target[dim] = best[dim];
                }
            } else if draw < r {
                target[dim] = self.rng.random_range(0..param.len());
            }
        }

        match space.index_of_positions(&target) {
            Some(index) => index,
            None => self.rng.random_range(0..space.size()),
        }
    }
}

impl Searcher for PsoSearcher<'_> {
    fn name(&self) -> &str {
        "pso"
    }

    fn index(&self) -> usize {
        self.positions[self.particle]
    }

    fn configuration(&self) -> &Configuration {
        self.space.configuration(self.index())
    }

    fn calculate_next_index(&mut self, energies: &EnergyTable) {
        let index = self.index();
        if let Some(energy) = energies.energy(index) {
            self.update_bests(index, energy);
        }
        let next = self.move_particle();
        self.positions[self.particle] = next;
        self.particle = (self.particle + 1) % self.positions.len();
        self.rounds += 1;
    }

    fn num_configurations(&self) -> usize {
        self.rounds
    }
}
