//! Evaluation outcomes and the shared energy lookup.
//!
//! The orchestrator writes one [`Evaluation`] per configuration index into
//! an [`EnergyTable`] after measuring it; searchers read the table when
//! they advance. A failed evaluation has an effective energy of `+inf` so it
//! can never win an acceptance comparison.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one configuration on the device.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Evaluation {
    /// Measured cost (e.g. kernel time in milliseconds). Lower is better.
    Energy(f64),
    /// The configuration cannot run on this device (e.g. local memory).
    Infeasible(String),
    /// The kernel failed to compile with these parameters.
    BuildError(String),
    /// The kernel compiled but failed while executing.
    RuntimeError(String),
}

impl Evaluation {
    /// Effective energy: the measured value, or `+inf` for any failure.
    pub fn energy(&self) -> f64 {
        match self {
            Evaluation::Energy(e) => *e,
            _ => f64::INFINITY,
        }
    }

    /// Whether the evaluation produced a measured energy.
    pub fn is_success(&self) -> bool {
        matches!(self, Evaluation::Energy(_))
    }
}

/// Index-keyed lookup of evaluation outcomes.
///
/// # Examples
///
/// ```
/// use u_tuner::energy::{EnergyTable, Evaluation};
///
/// let mut table = EnergyTable::new(4);
/// table.record(2, Evaluation::Energy(1.5));
/// table.record(3, Evaluation::Infeasible("local memory".into()));
///
/// assert_eq!(table.energy(2), Some(1.5));
/// assert_eq!(table.energy(3), Some(f64::INFINITY));
/// assert_eq!(table.energy(0), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnergyTable {
    entries: Vec<Option<Evaluation>>,
}

impl EnergyTable {
    /// Creates an empty table for a space of `size` configurations.
    pub fn new(size: usize) -> Self {
        Self {
            entries: vec![None; size],
        }
    }

    /// Records (or overwrites) the outcome for `index`.
    ///
    /// The table grows if `index` is beyond its current size.
    pub fn record(&mut self, index: usize, evaluation: Evaluation) {
        if index >= self.entries.len() {
            self.entries.resize(index + 1, None);
        }
        self.entries[index] = Some(evaluation);
    }

    /// Outcome recorded for `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Evaluation> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Effective energy of `index`; `None` while not yet evaluated.
    pub fn energy(&self, index: usize) -> Option<f64> {
        self.get(index).map(Evaluation::energy)
    }

    /// Whether `index` has been evaluated.
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Number of evaluated indices.
    pub fn evaluated(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Index and energy of the lowest finite energy recorded so far.
    ///
    /// Ties go to the lowest index.
    pub fn best(&self) -> Option<(usize, f64)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e {
                Some(Evaluation::Energy(v)) if v.is_finite() => Some((i, *v)),
                _ => None,
            })
            .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
                Some((_, b)) if b <= v => best,
                _ => Some((i, v)),
            })
    }
}
