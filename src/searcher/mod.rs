//! Search strategies.
//!
//! Every strategy implements [`Searcher`] and is picked once per tuning run,
//! usually through [`SearcherKind`]:
//!
//! - [`FullSearch`]: every configuration, in index order.
//! - [`RandomSearch`]: a random fraction of the space, without replacement.
//! - [`AnnealingSearcher`](crate::annealing::AnnealingSearcher): simulated annealing.
//! - [`PsoSearcher`](crate::pso::PsoSearcher): discrete particle swarm.

mod full;
mod random;
mod types;

pub use full::FullSearch;
pub use random::RandomSearch;
pub use types::Searcher;

use crate::annealing::{AnnealingConfig, AnnealingSearcher};
use crate::error::Result;
use crate::pso::{PsoConfig, PsoSearcher};
use crate::space::ConfigurationSpace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Strategy selection for a tuning run.
///
/// # Examples
///
/// ```
/// use u_tuner::annealing::AnnealingConfig;
/// use u_tuner::searcher::SearcherKind;
/// use u_tuner::space::{ConfigurationSpace, Parameter};
///
/// let space = ConfigurationSpace::cartesian(vec![Parameter::new("VW", vec![1, 2, 4])]).unwrap();
/// let kind = SearcherKind::Annealing(AnnealingConfig::default().with_seed(1));
/// let searcher = kind.build(&space).unwrap();
/// assert_eq!(searcher.name(), "annealing");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearcherKind {
    Full,
    Random { fraction: f64, seed: Option<u64> },
    Annealing(AnnealingConfig),
    Pso(PsoConfig),
}

impl Default for SearcherKind {
    fn default() -> Self {
        SearcherKind::Annealing(AnnealingConfig::default())
    }
}

impl SearcherKind {
    /// Builds the strategy over `space`, validating its configuration.
    pub fn build<'a>(&self, space: &'a ConfigurationSpace) -> Result<Box<dyn Searcher + 'a>> {
        let searcher: Box<dyn Searcher + 'a> = match self {
            SearcherKind::Full => Box::new(FullSearch::new(space)),
            SearcherKind::Random { fraction, seed } => {
                Box::new(RandomSearch::new(space, *fraction, *seed)?)
            }
            SearcherKind::Annealing(config) => {
                Box::new(AnnealingSearcher::new(space, config.clone())?)
            }
            SearcherKind::Pso(config) => Box::new(PsoSearcher::new(space, config.clone())?),
        };
        Ok(searcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Parameter;

    #[test]
    fn test_build_every_kind() {
        let space = ConfigurationSpace::cartesian(vec![Parameter::new("A", vec![1, 2, 3])]).unwrap();
        let kinds = [
            (SearcherKind::Full, "full"),
            (SearcherKind::Random { fraction: 1.0, seed: Some(1) }, "random"),
            (SearcherKind::Annealing(AnnealingConfig::default().with_seed(1)), "annealing"),
            (SearcherKind::Pso(PsoConfig::default().with_seed(1)), "pso"),
        ];
        for (kind, name) in kinds {
            let searcher = kind.build(&space).unwrap();
            assert_eq!(searcher.name(), name);
            assert!(searcher.index() < space.size());
            assert_eq!(searcher.num_configurations(), 0);
        }
    }

    #[test]
    fn test_build_propagates_validation() {
        let space = ConfigurationSpace::cartesian(vec![Parameter::new("A", vec![1])]).unwrap();
        let bad = SearcherKind::Annealing(AnnealingConfig::default().with_max_temperature(-1.0));
        assert!(bad.build(&space).is_err());
        let bad = SearcherKind::Random { fraction: 2.0, seed: None };
        assert!(bad.build(&space).is_err());
    }
}
