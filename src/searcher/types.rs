//! The searcher contract.

use crate::energy::EnergyTable;
use crate::space::Configuration;

/// A search strategy over a [`ConfigurationSpace`](crate::space::ConfigurationSpace).
///
/// The orchestrator drives every strategy with the same strictly
/// alternating protocol:
///
/// 1. [`configuration`](Searcher::configuration) — what to evaluate next;
/// 2. evaluate it and record the outcome under [`index`](Searcher::index)
///    in the [`EnergyTable`];
/// 3. [`calculate_next_index`](Searcher::calculate_next_index) — advance;
/// 4. repeat until a budget is spent or [`is_exhausted`](Searcher::is_exhausted).
///
/// # Examples
///
/// ```
/// use u_tuner::energy::{EnergyTable, Evaluation};
/// use u_tuner::searcher::{FullSearch, Searcher};
/// use u_tuner::space::{ConfigurationSpace, Parameter};
///
/// let space = ConfigurationSpace::cartesian(vec![Parameter::new("VW", vec![1, 2, 4])]).unwrap();
/// let mut searcher = FullSearch::new(&space);
/// let mut energies = EnergyTable::new(space.size());
///
/// while !searcher.is_exhausted() {
///     let vw = searcher.configuration().get("VW").unwrap();
///     energies.record(searcher.index(), Evaluation::Energy(10.0 / vw as f64));
///     searcher.calculate_next_index(&energies);
/// }
/// assert_eq!(energies.best(), Some((2, 2.5)));
/// ```
pub trait Searcher {
    /// Short strategy name, used in logs.
    fn name(&self) -> &str;

    /// Index of the configuration returned by [`configuration`](Searcher::configuration).
    fn index(&self) -> usize;

    /// The configuration to evaluate next.
    ///
    /// A pure read: calling it twice without advancing returns the same
    /// configuration. Always a member of the bound space.
    fn configuration(&self) -> &Configuration;

    /// Advances the search by one round.
    ///
    /// The configuration last returned by
    /// [`configuration`](Searcher::configuration) must have been recorded in
    /// `energies` before this call.
    fn calculate_next_index(&mut self, energies: &EnergyTable);

    /// Number of rounds attempted so far (completed advances).
    fn num_configurations(&self) -> usize;

    /// Whether the strategy has nothing useful left to explore.
    fn is_exhausted(&self) -> bool {
        false
    }
}
