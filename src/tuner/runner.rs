//! Tuning loop.

use super::config::TuneConfig;
use super::types::Oracle;
use crate::energy::{EnergyTable, Evaluation};
use crate::error::{Result, TuneError};
use crate::searcher::{Searcher, SearcherKind};
use crate::space::{Configuration, ConfigurationSpace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a tuning run.
#[derive(Debug, Clone)]
pub struct TuneResult {
    /// Index of the fastest configuration found.
    pub best_index: usize,

    /// The fastest configuration found.
    pub best_configuration: Configuration,

    /// Its energy.
    pub best_energy: f64,

    /// Number of rounds (configurations surfaced by the searcher).
    pub rounds: usize,

    /// Number of oracle calls. Lower than `rounds` when evaluations are reused.
    pub evaluations: usize,

    /// Number of oracle calls that did not produce a usable energy.
    pub failures: usize,

    /// Whether the searcher reported exhaustion.
    pub exhausted: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best energy after each round (non-increasing; `inf` until the first
    /// usable energy).
    pub history: Vec<f64>,

    /// Every outcome recorded during the run.
    pub energies: EnergyTable,
}

/// Drives a searcher against an oracle.
pub struct TuneRunner;

impl TuneRunner {
    /// Builds the searcher for `kind` and runs it.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tuner::energy::Evaluation;
    /// use u_tuner::searcher::SearcherKind;
    /// use u_tuner::space::{Configuration, ConfigurationSpace, Parameter};
    /// use u_tuner::tuner::{TuneConfig, TuneRunner};
    ///
    /// let space = ConfigurationSpace::cartesian(vec![
    ///     Parameter::new("TILE", vec![8, 16, 32]),
    ///     Parameter::new("VW", vec![1, 2, 4]),
    /// ])
    /// .unwrap();
    /// let mut oracle = |c: &Configuration| {
    ///     let tile = c.get("TILE").unwrap() as f64;
    ///     Evaluation::Energy((tile - 16.0).abs() + c.get("VW").unwrap() as f64)
    /// };
    ///
    /// let result = TuneRunner::tune(&space, &SearcherKind::Full, &mut oracle, &TuneConfig::default()).unwrap();
    /// assert_eq!(result.best_configuration.to_string(), "TILE=16 VW=1");
    /// ```
    pub fn tune<O: Oracle>(
        space: &ConfigurationSpace,
        kind: &SearcherKind,
        oracle: &mut O,
        config: &TuneConfig,
    ) -> Result<TuneResult> {
        let mut searcher = kind.build(space)?;
        Self::run(space, searcher.as_mut(), oracle, config)
    }

    /// Runs an already built searcher.
    pub fn run<S, O>(
        space: &ConfigurationSpace,
        searcher: &mut S,
        oracle: &mut O,
        config: &TuneConfig,
    ) -> Result<TuneResult>
    where
        S: Searcher + ?Sized,
        O: Oracle,
    {
        Self::run_with_cancel(space, searcher, oracle, config, None)
    }

    /// Runs with an optional cancellation token, polled once per round.
    pub fn run_with_cancel<S, O>(
        space: &ConfigurationSpace,
        searcher: &mut S,
        oracle: &mut O,
        config: &TuneConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TuneResult>
    where
        S: Searcher + ?Sized,
        O: Oracle,
    {
        config.validate(space.size())?;
        let budget = config.budget(space.size());

        info!(
            "tuning with {} search: {} configurations, budget {} rounds",
            searcher.name(),
            space.size(),
            budget
        );

        let mut energies = EnergyTable::new(space.size());
        let mut best: Option<(usize, f64)> = None;
        let mut history = Vec::with_capacity(budget);
        let mut rounds = 0usize;
        let mut evaluations = 0usize;
        let mut failures = 0usize;
        let mut cancelled = false;

        while rounds < budget {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let index = searcher.index();
            if !(config.reuse_evaluations && energies.contains(index)) {
                let outcome = oracle.evaluate(searcher.configuration());
                evaluations += 1;
                match outcome {
                    Evaluation::Energy(e) if e.is_finite() => {
                        if best.is_none_or(|(_, b)| e < b) {
                            debug!("round {}: new best {} at {}", rounds, e, searcher.configuration());
                            best = Some((index, e));
                        }
                    }
                    ref failed => {
                        failures += 1;
                        debug!("round {}: configuration {} failed: {:?}", rounds, index, failed);
                    }
                }
                energies.record(index, outcome);
            }

            history.push(best.map_or(f64::INFINITY, |(_, e)| e));
            rounds += 1;

            if rounds == budget {
                break;
            }
            searcher.calculate_next_index(&energies);
            if config.stop_on_exhaustion && searcher.is_exhausted() {
                break;
            }
        }

        let exhausted = searcher.is_exhausted();
        info!(
            "tuning finished after {} rounds ({} evaluations, {} failures){}{}",
            rounds,
            evaluations,
            failures,
            if exhausted { ", exhausted" } else { "" },
            if cancelled { ", cancelled" } else { "" }
        );

        let (best_index, best_energy) = best.ok_or(TuneError::NoFeasibleConfiguration)?;

        Ok(TuneResult {
            best_index,
            best_configuration: space.configuration(best_index).clone(),
            best_energy,
            rounds,
            evaluations,
            failures,
            exhausted,
            cancelled,
            history,
            energies,
        })
    }
}
