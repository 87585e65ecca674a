//! Simulated-annealing searcher over an indexed configuration space.

use super::config::AnnealingConfig;
use crate::energy::EnergyTable;
use crate::error::Result;
use crate::random::{rng_from, sample_count};
use crate::searcher::Searcher;
use crate::space::{Configuration, ConfigurationSpace};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info, warn};

/// Number of consecutive judged rounds without a move after which the
/// searcher reports exhaustion (once the counter exceeds it).
pub const MAX_ALREADY_VISITED_STATES: usize = 10;

/// Metropolis acceptance probability of moving from `current_energy` to
/// `neighbour_energy` at `temperature`.
///
/// - a non-finite neighbour energy (failed evaluation) is never accepted;
/// - a strict improvement is always accepted;
/// - at `temperature <= 0` equal energies are accepted, worse ones are not;
/// - otherwise `exp(-(neighbour - current) / temperature)`, so equal
///   energies give exactly 1.
///
/// The result is always in `[0, 1]`.
pub fn acceptance_probability(current_energy: f64, neighbour_energy: f64, temperature: f64) -> f64 {
    if !neighbour_energy.is_finite() {
        return 0.0;
    }
    if neighbour_energy < current_energy {
        return 1.0;
    }
    if temperature <= 0.0 {
        return if neighbour_energy == current_energy { 1.0 } else { 0.0 };
    }
    let p = (-(neighbour_energy - current_energy) / temperature).exp();
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Simulated-annealing searcher.
///
/// Performs a Metropolis random walk over the space: each round a neighbour
/// of the current state (a configuration differing in one parameter) is
/// proposed, evaluated by the orchestrator, and then accepted or rejected.
/// Early on, at high temperature, worse neighbours are often accepted; as the
/// temperature cools the walk becomes a greedy descent.
///
/// # Rounds
///
/// The first call to [`calculate_next_index`](Searcher::calculate_next_index)
/// is a seeding round: only the start state has been evaluated, so it just
/// proposes the first neighbour. Every later call judges the pending
/// neighbour, updates the counters, and proposes the next one.
///
/// # Examples
///
/// ```
/// use u_tuner::annealing::{AnnealingConfig, AnnealingSearcher};
/// use u_tuner::energy::{EnergyTable, Evaluation};
/// use u_tuner::searcher::Searcher;
/// use u_tuner::space::{ConfigurationSpace, Parameter};
///
/// let space = ConfigurationSpace::cartesian(vec![
///     Parameter::new("TILE", vec![8, 16, 32, 64]),
///     Parameter::new("VW", vec![1, 2, 4]),
/// ])
/// .unwrap();
/// let config = AnnealingConfig::default().with_max_temperature(2.0).with_seed(7);
/// let mut searcher = AnnealingSearcher::new(&space, config).unwrap();
/// let mut energies = EnergyTable::new(space.size());
///
/// for _ in 0..50 {
///     let c = searcher.configuration();
///     let cost = (c.get("TILE").unwrap() as f64 - 32.0).abs() + c.get("VW").unwrap() as f64;
///     energies.record(searcher.index(), Evaluation::Energy(cost));
///     if searcher.is_exhausted() {
///         break;
///     }
///     searcher.calculate_next_index(&energies);
/// }
/// assert!(energies.best().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct AnnealingSearcher<'a> {
    space: &'a ConfigurationSpace,
    config: AnnealingConfig,

    current_state: usize,
    neighbour_state: usize,
    num_visited_states: usize,
    num_already_visited_states: usize,

    rounds: usize,
    proposed: bool,
    exhaustion_reported: bool,

    rng: StdRng,
}

impl<'a> AnnealingSearcher<'a> {
    /// Creates an annealing searcher bound to `space`.
    ///
    /// The start state is drawn uniformly from the seeded generator.
    pub fn new(space: &'a ConfigurationSpace, config: AnnealingConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = rng_from(config.seed);
        let start = rng.random_range(0..space.size());

        Ok(Self {
            space,
            config,
            current_state: start,
            neighbour_state: start,
            num_visited_states: 0,
            num_already_visited_states: 0,
            rounds: 0,
            proposed: false,
            exhaustion_reported: false,
            rng,
        })
    }

    /// Index of the currently accepted working point.
    pub fn current_state(&self) -> usize {
        self.current_state
    }

    /// Index of the most recently proposed candidate.
    pub fn neighbour_state(&self) -> usize {
        self.neighbour_state
    }

    /// Number of judged rounds; drives the cooling schedule.
    pub fn num_visited_states(&self) -> usize {
        self.num_visited_states
    }

    /// Consecutive judged rounds in which the current state did not change.
    pub fn num_already_visited_states(&self) -> usize {
        self.num_already_visited_states
    }

    /// Temperature for the next judged round.
    pub fn temperature(&self) -> f64 {
        self.config
            .cooling
            .temperature(self.config.max_temperature, self.num_visited_states)
    }

    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// A random `fraction` of the configurations one parameter away from
    /// `reference`, sampled without replacement.
    ///
    /// Never contains `reference`; empty when `reference` has no
    /// neighbours.
    pub fn neighbours_of(&mut self, reference: usize) -> Vec<usize> {
        let all = self.space.neighbours_of(reference);
        if all.is_empty() {
            return all;
        }
        let amount = sample_count(self.config.fraction, all.len());
        rand::seq::index::sample(&mut self.rng, all.len(), amount)
            .into_iter()
            .map(|i| all[i])
            .collect()
    }

    fn judge(&mut self, energies: &EnergyTable) {
        let previous = self.current_state;
        let temperature = self.temperature();

        let accepted = match (
            energies.energy(self.current_state),
            energies.energy(self.neighbour_state),
        ) {
            (Some(current_energy), Some(neighbour_energy)) => {
                let probability =
                    acceptance_probability(current_energy, neighbour_energy, temperature);
                let draw: f64 = self.rng.random();
                let accepted = draw < probability;
                debug!(
                    "annealing round {}: T={:.4} current={} ({}) neighbour={} ({}) p={:.4} accepted={}",
                    self.num_visited_states,
                    temperature,
                    self.current_state,
                    current_energy,
                    self.neighbour_state,
                    neighbour_energy,
                    probability,
                    accepted
                );
                accepted
            }
            _ => {
                warn!(
                    "annealing round {}: energy missing for state {} or {}, rejecting",
                    self.num_visited_states, self.current_state, self.neighbour_state
                );
                false
            }
        };

        if accepted {
            self.current_state = self.neighbour_state;
        }

        if self.current_state == previous {
            self.num_already_visited_states += 1;
        } else {
            self.num_already_visited_states = 0;
        }
        self.num_visited_states += 1;

        if self.is_exhausted() && !self.exhaustion_reported {
            info!(
                "annealing exhausted after {} rounds at state {}",
                self.num_visited_states, self.current_state
            );
            self.exhaustion_reported = true;
        } else if !self.is_exhausted() {
            self.exhaustion_reported = false;
        }
    }

    fn propose(&mut self) {
        let neighbours = self.neighbours_of(self.current_state);
        self.neighbour_state = neighbours
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(self.current_state);
    }
}

impl Searcher for AnnealingSearcher<'_> {
    fn name(&self) -> &str {
        "annealing"
    }

    fn index(&self) -> usize {
        if self.proposed {
            self.neighbour_state
        } else {
            self.current_state
        }
    }

    fn configuration(&self) -> &Configuration {
        self.space.configuration(self.index())
    }

    fn calculate_next_index(&mut self, energies: &EnergyTable) {
        if self.proposed {
            self.judge(energies);
        }
        self.propose();
        self.proposed = true;
        self.rounds += 1;
    }

    fn num_configurations(&self) -> usize {
        self.rounds
    }

    fn is_exhausted(&self) -> bool {
        self.num_already_visited_states > MAX_ALREADY_VISITED_STATES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annealing::CoolingSchedule;
    use crate::energy::Evaluation;
    use crate::space::Parameter;
    use proptest::prelude::*;

    fn grid() -> ConfigurationSpace {
        ConfigurationSpace::cartesian(vec![
            Parameter::new("TILE", vec![8, 16, 32, 64]),
            Parameter::new("VW", vec![1, 2, 4, 8]),
            Parameter::new("UNROLL", vec![1, 2]),
        ])
        .unwrap()
    }

    fn bowl(c: &Configuration) -> f64 {
        let tile = c.get("TILE").unwrap_or(0) as f64;
        let vw = c.get("VW").unwrap_or(0) as f64;
        let unroll = c.get("UNROLL").unwrap_or(0) as f64;
        (tile - 32.0).abs() + (vw - 4.0).abs() * 3.0 + unroll
    }

    /// Drives `rounds` get/evaluate/advance cycles and returns the
    /// `(current, neighbour)` pair after every advance.
    fn drive<F>(searcher: &mut AnnealingSearcher<'_>, rounds: usize, mut oracle: F) -> Vec<(usize, usize)>
    where
        F: FnMut(usize, &Configuration) -> Evaluation,
    {
        let mut energies = EnergyTable::new(searcher.space.size());
        let mut trace = Vec::new();
        for _ in 0..rounds {
            let index = searcher.index();
            let outcome = oracle(index, searcher.configuration());
            energies.record(index, outcome);
            searcher.calculate_next_index(&energies);
            trace.push((searcher.current_state(), searcher.neighbour_state()));
        }
        trace
    }

    #[test]
    fn test_rejects_invalid_config() {
        let space = grid();
        assert!(AnnealingSearcher::new(&space, AnnealingConfig::default().with_fraction(0.0)).is_err());
        assert!(AnnealingSearcher::new(&space, AnnealingConfig::default().with_max_temperature(0.0)).is_err());
    }

    #[test]
    fn test_acceptance_equal_energies() {
        for t in [1e-9, 0.5, 1.0, 100.0] {
            assert_eq!(acceptance_probability(3.0, 3.0, t), 1.0);
        }
        assert_eq!(acceptance_probability(3.0, 3.0, 0.0), 1.0);
    }

    #[test]
    fn test_acceptance_improvement_and_failure() {
        assert_eq!(acceptance_probability(5.0, 1.0, 0.0), 1.0);
        assert_eq!(acceptance_probability(5.0, f64::INFINITY, 1e9), 0.0);
        assert_eq!(acceptance_probability(f64::INFINITY, f64::INFINITY, 1.0), 0.0);
        assert_eq!(acceptance_probability(f64::INFINITY, 2.0, 1.0), 1.0);
        assert_eq!(acceptance_probability(1.0, 2.0, 0.0), 0.0);
        assert_eq!(acceptance_probability(1.0, 2.0, -1.0), 0.0);
    }

    #[test]
    fn test_acceptance_cools_towards_zero() {
        let temperatures = [100.0, 10.0, 1.0, 0.1, 0.01];
        let probabilities: Vec<f64> = temperatures
            .iter()
            .map(|&t| acceptance_probability(1.0, 2.0, t))
            .collect();
        for w in probabilities.windows(2) {
            assert!(w[1] < w[0], "probability should drop as T drops: {probabilities:?}");
        }
        assert!(probabilities[4] < 1e-40);
    }

    #[test]
    fn test_configuration_is_idempotent() {
        let space = grid();
        let mut searcher = AnnealingSearcher::new(&space, AnnealingConfig::default().with_seed(1)).unwrap();
        let first = searcher.configuration().clone();
        assert_eq!(searcher.configuration(), &first);

        let mut energies = EnergyTable::new(space.size());
        energies.record(searcher.index(), Evaluation::Energy(bowl(&first)));
        searcher.calculate_next_index(&energies);

        let proposed = searcher.configuration().clone();
        assert_eq!(searcher.configuration(), &proposed);
        assert_eq!(searcher.index(), searcher.neighbour_state());
    }

    #[test]
    fn test_seeding_round_only_proposes() {
        let space = grid();
        let mut searcher = AnnealingSearcher::new(&space, AnnealingConfig::default().with_seed(3)).unwrap();
        let start = searcher.current_state();
        assert_eq!(searcher.index(), start);

        let mut energies = EnergyTable::new(space.size());
        energies.record(start, Evaluation::Energy(1.0));
        searcher.calculate_next_index(&energies);

        assert_eq!(searcher.current_state(), start);
        assert_eq!(searcher.num_visited_states(), 0);
        assert_eq!(searcher.num_already_visited_states(), 0);
        assert_eq!(searcher.num_configurations(), 1);
        assert_ne!(searcher.neighbour_state(), start);
        assert_eq!(space.configuration(start).distance(searcher.configuration()), 1);
    }

    #[test]
    fn test_neighbour_sampling_fraction() {
        let space = grid();
        // Every configuration has 3 + 3 + 1 = 7 neighbours.
        let mut half = AnnealingSearcher::new(&space, AnnealingConfig::default().with_fraction(0.5).with_seed(5)).unwrap();
        let sampled = half.neighbours_of(0);
        assert_eq!(sampled.len(), 4);
        for &n in &sampled {
            assert_ne!(n, 0);
            assert_eq!(space.configuration(0).distance(space.configuration(n)), 1);
        }

        let mut tiny = AnnealingSearcher::new(&space, AnnealingConfig::default().with_fraction(1e-6).with_seed(5)).unwrap();
        assert_eq!(tiny.neighbours_of(0).len(), 1);

        let mut full = AnnealingSearcher::new(&space, AnnealingConfig::default().with_seed(5)).unwrap();
        let mut all = full.neighbours_of(0);
        all.sort_unstable();
        assert_eq!(all, space.neighbours_of(0));
    }

    #[test]
    fn test_deterministic_given_seed() {
        let space = grid();
        let config = AnnealingConfig::default().with_max_temperature(5.0).with_seed(2024);
        let oracle = |_: usize, c: &Configuration| Evaluation::Energy(bowl(c));

        let a = drive(&mut AnnealingSearcher::new(&space, config.clone()).unwrap(), 60, oracle);
        let b = drive(&mut AnnealingSearcher::new(&space, config).unwrap(), 60, oracle);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cycle_space_always_moves_on_decreasing_energies() {
        let space = ConfigurationSpace::cartesian(vec![Parameter::new("VW", vec![1, 2, 4, 8])]).unwrap();
        let config = AnnealingConfig::default()
            .with_fraction(1.0)
            .with_max_temperature(100.0)
            .with_seed(11);
        let mut searcher = AnnealingSearcher::new(&space, config).unwrap();

        // Every evaluation is cheaper than the one before.
        let mut next_energy = 100.0;
        let mut oracle = |_: usize, _: &Configuration| {
            let e = next_energy;
            next_energy -= 20.0;
            Evaluation::Energy(e)
        };

        // Seeding round plus three judged rounds.
        let trace = drive(&mut searcher, 4, &mut oracle);
        let moves = trace.windows(2).filter(|w| w[0].0 != w[1].0).count();

        assert_eq!(moves, 3, "trace: {trace:?}");
        assert_eq!(searcher.num_visited_states(), 3);
        assert_eq!(searcher.num_already_visited_states(), 0);
    }

    #[test]
    fn test_stagnation_counts_and_exhausts_after_ten() {
        let space = grid();
        let mut searcher = AnnealingSearcher::new(&space, AnnealingConfig::default().with_seed(8)).unwrap();
        let start = searcher.current_state();
        let mut energies = EnergyTable::new(space.size());
        energies.record(start, Evaluation::Energy(1.0));
        searcher.calculate_next_index(&energies);

        for round in 1..=MAX_ALREADY_VISITED_STATES + 1 {
            energies.record(searcher.index(), Evaluation::Infeasible("local memory".into()));
            searcher.calculate_next_index(&energies);
            assert_eq!(searcher.current_state(), start);
            assert_eq!(searcher.num_already_visited_states(), round);
            assert_eq!(
                searcher.is_exhausted(),
                round > MAX_ALREADY_VISITED_STATES,
                "round {round}"
            );
        }
    }

    #[test]
    fn test_stagnation_resets_on_move() {
        let space = grid();
        let mut searcher = AnnealingSearcher::new(&space, AnnealingConfig::default().with_seed(21)).unwrap();
        let start = searcher.current_state();
        let mut energies = EnergyTable::new(space.size());
        energies.record(start, Evaluation::Energy(10.0));
        searcher.calculate_next_index(&energies);

        for _ in 0..4 {
            energies.record(searcher.index(), Evaluation::BuildError("bad unroll".into()));
            searcher.calculate_next_index(&energies);
        }
        assert_eq!(searcher.num_already_visited_states(), 4);

        let candidate = searcher.index();
        energies.record(candidate, Evaluation::Energy(1.0));
        searcher.calculate_next_index(&energies);
        assert_eq!(searcher.current_state(), candidate);
        assert_eq!(searcher.num_already_visited_states(), 0);
    }

    #[test]
    fn test_flat_landscape_keeps_moving_when_cold() {
        let space = grid();
        let config = AnnealingConfig::default()
            .with_max_temperature(1.0)
            .with_cooling(CoolingSchedule::Linear { rounds: 20 })
            .with_seed(99);
        let mut searcher = AnnealingSearcher::new(&space, config).unwrap();

        let trace = drive(&mut searcher, 200, |_, _| Evaluation::Energy(7.0));

        assert_eq!(searcher.temperature(), 0.0);
        // Equal energies are always accepted, so every judged round moves.
        let moves = trace.windows(2).filter(|w| w[0].0 != w[1].0).count();
        assert_eq!(moves, trace.len() - 1);
        assert_eq!(searcher.num_already_visited_states(), 0);
        assert!(!searcher.is_exhausted());
    }

    #[test]
    fn test_single_configuration_forces_revisit_and_exhausts() {
        let space = ConfigurationSpace::cartesian(vec![Parameter::new("A", vec![4])]).unwrap();
        let mut searcher = AnnealingSearcher::new(&space, AnnealingConfig::default().with_seed(0)).unwrap();
        let trace = drive(&mut searcher, 12, |_, _| Evaluation::Energy(1.0));

        assert!(trace.iter().all(|&(c, n)| c == 0 && n == 0));
        assert_eq!(searcher.num_already_visited_states(), 11);
        assert!(searcher.is_exhausted());
    }

    #[test]
    fn test_missing_energy_rejects_without_panic() {
        let space = grid();
        let mut searcher = AnnealingSearcher::new(&space, AnnealingConfig::default().with_seed(4)).unwrap();
        let start = searcher.current_state();
        let empty = EnergyTable::new(space.size());
        searcher.calculate_next_index(&empty);
        searcher.calculate_next_index(&empty);
        assert_eq!(searcher.current_state(), start);
        assert_eq!(searcher.num_already_visited_states(), 1);
    }

    #[test]
    fn test_finds_bowl_minimum() {
        let space = grid();
        let config = AnnealingConfig::default()
            .with_max_temperature(4.0)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
            .with_seed(42);
        let mut searcher = AnnealingSearcher::new(&space, config).unwrap();
        let mut energies = EnergyTable::new(space.size());

        for _ in 0..300 {
            let c = searcher.configuration();
            energies.record(searcher.index(), Evaluation::Energy(bowl(c)));
            searcher.calculate_next_index(&energies);
        }

        let (_, best) = energies.best().unwrap();
        assert!(best <= 2.0, "expected near-optimal energy, got {best}");
    }

    proptest! {
        #[test]
        fn prop_acceptance_in_unit_interval(
            current in -1e6f64..1e6,
            neighbour in -1e6f64..1e6,
            temperature in -10.0f64..1e4,
        ) {
            let p = acceptance_probability(current, neighbour, temperature);
            prop_assert!((0.0..=1.0).contains(&p));
        }

        #[test]
        fn prop_acceptance_monotone_in_temperature(
            low in -1e3f64..1e3,
            delta in 1e-3f64..1e2,
            t in 1e-2f64..1e3,
        ) {
            let high = low + delta;
            let hot = acceptance_probability(low, high, t * 2.0);
            let cold = acceptance_probability(low, high, t);
            prop_assert!(cold <= hot);
        }

        #[test]
        fn prop_sampled_neighbours_valid(seed in any::<u64>(), fraction in 0.01f64..=1.0, reference in 0usize..32) {
            let space = grid();
            let config = AnnealingConfig::default().with_fraction(fraction).with_seed(seed);
            let mut searcher = AnnealingSearcher::new(&space, config).unwrap();
            let sampled = searcher.neighbours_of(reference);
            prop_assert!(!sampled.is_empty());
            for n in sampled {
                prop_assert!(n < space.size());
                prop_assert_ne!(n, reference);
            }
        }
    }
}
