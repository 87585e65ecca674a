//! The indexed configuration space.

use super::types::{Configuration, Parameter, Setting};
use crate::error::{Result, TuneError};
use std::collections::{HashMap, HashSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An ordered, fully materialised collection of legal configurations.
///
/// Every configuration is addressed by a dense index `0..size()`. Indices
/// are assigned at construction and never change.
///
/// Internally each configuration is also stored as a tuple of value
/// positions (one per parameter), which is what neighbour computation and
/// particle moves operate on.
///
/// # Examples
///
/// ```
/// use u_tuner::space::{ConfigurationSpace, Parameter};
///
/// let space = ConfigurationSpace::cartesian(vec![
///     Parameter::new("TILE", vec![8, 16, 32]),
///     Parameter::new("VW", vec![1, 2, 4]),
/// ])
/// .unwrap();
///
/// assert_eq!(space.size(), 9);
/// // Changing exactly one parameter: 2 other tiles + 2 other widths.
/// assert_eq!(space.neighbours_of(0).len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigurationSpace {
    parameters: Vec<Parameter>,
    configurations: Vec<Configuration>,
    positions: Vec<Vec<usize>>,
    lookup: HashMap<Vec<usize>, usize>,
}

impl ConfigurationSpace {
    /// Builds a space from an explicit list of configurations.
    ///
    /// Each configuration must assign every parameter, in parameter order,
    /// a value from that parameter's legal list. Duplicates are rejected.
    pub fn new(parameters: Vec<Parameter>, configurations: Vec<Configuration>) -> Result<Self> {
        if configurations.is_empty() {
            return Err(TuneError::EmptySpace);
        }
        validate_parameters(&parameters)?;

        let mut positions = Vec::with_capacity(configurations.len());
        let mut lookup = HashMap::with_capacity(configurations.len());

        for (index, configuration) in configurations.iter().enumerate() {
            let pos = positions_of(&parameters, configuration)
                .map_err(|msg| TuneError::InvalidSpace(format!("configuration {index}: {msg}")))?;
            if let Some(first) = lookup.insert(pos.clone(), index) {
                return Err(TuneError::InvalidSpace(format!(
                    "configuration {index} duplicates configuration {first}"
                )));
            }
            positions.push(pos);
        }

        Ok(Self {
            parameters,
            configurations,
            positions,
            lookup,
        })
    }

    /// Builds the full cartesian product of the parameters' values.
    ///
    /// The last parameter varies fastest.
    pub fn cartesian(parameters: Vec<Parameter>) -> Result<Self> {
        Self::filtered(parameters, |_| true)
    }

    /// Builds the cartesian product and keeps only configurations accepted
    /// by `keep` (e.g. a local-memory budget check).
    pub fn filtered<F>(parameters: Vec<Parameter>, keep: F) -> Result<Self>
    where
        F: Fn(&Configuration) -> bool,
    {
        validate_parameters(&parameters)?;

        let mut combos: Vec<Vec<Setting>> = vec![Vec::new()];
        for param in &parameters {
            let mut next = Vec::with_capacity(combos.len() * param.len());
            for existing in &combos {
                for &value in &param.values {
                    let mut combo = existing.clone();
                    combo.push(Setting::new(param.name.clone(), value));
                    next.push(combo);
                }
            }
            combos = next;
        }

        let configurations = combos
            .into_iter()
            .map(Configuration::new)
            .filter(|c| keep(c))
            .collect();

        Self::new(parameters, configurations)
    }

    /// Number of configurations.
    pub fn size(&self) -> usize {
        self.configurations.len()
    }

    /// The parameter dimensions.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Configuration at `index`, or `None` when out of range.
    pub fn at(&self, index: usize) -> Option<&Configuration> {
        self.configurations.get(index)
    }

    /// Configuration at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size()`, like slice indexing.
    pub fn configuration(&self, index: usize) -> &Configuration {
        &self.configurations[index]
    }

    /// All configurations in index order.
    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    /// Index of a configuration, if it belongs to the space.
    pub fn index_of(&self, configuration: &Configuration) -> Option<usize> {
        let pos = positions_of(&self.parameters, configuration).ok()?;
        self.lookup.get(&pos).copied()
    }

    /// Value positions of the configuration at `index`.
    pub fn positions(&self, index: usize) -> Option<&[usize]> {
        self.positions.get(index).map(Vec::as_slice)
    }

    /// Index of the configuration with the given value positions.
    pub fn index_of_positions(&self, positions: &[usize]) -> Option<usize> {
        self.lookup.get(positions).copied()
    }

    /// All configurations that differ from `reference` in exactly one
    /// parameter, in ascending index order.
    ///
    /// Returns an empty vec for an out-of-range `reference`.
    pub fn neighbours_of(&self, reference: usize) -> Vec<usize> {
        let Some(target) = self.positions.get(reference) else {
            return Vec::new();
        };
        let is_neighbour = |pos: &[usize]| {
            pos.iter().zip(target).filter(|(a, b)| a != b).count() == 1
        };

        #[cfg(feature = "parallel")]
        {
            self.positions
                .par_iter()
                .enumerate()
                .filter(|(_, pos)| is_neighbour(pos.as_slice()))
                .map(|(i, _)| i)
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.positions
                .iter()
                .enumerate()
                .filter(|(_, pos)| is_neighbour(pos.as_slice()))
                .map(|(i, _)| i)
                .collect()
        }
    }
}

fn validate_parameters(parameters: &[Parameter]) -> Result<()> {
    let mut names = HashSet::new();
    for param in parameters {
        if !names.insert(param.name.as_str()) {
            return Err(TuneError::InvalidSpace(format!(
                "duplicate parameter '{}'",
                param.name
            )));
        }
        if param.is_empty() {
            return Err(TuneError::InvalidSpace(format!(
                "parameter '{}' has no values",
                param.name
            )));
        }
        let distinct: HashSet<_> = param.values.iter().collect();
        if distinct.len() != param.len() {
            return Err(TuneError::InvalidSpace(format!(
                "parameter '{}' has repeated values",
                param.name
            )));
        }
    }
    Ok(())
}

fn positions_of(
    parameters: &[Parameter],
    configuration: &Configuration,
) -> std::result::Result<Vec<usize>, String> {
    if configuration.len() != parameters.len() {
        return Err(format!(
            "expected {} settings, got {}",
            parameters.len(),
            configuration.len()
        ));
    }
    parameters
        .iter()
        .zip(configuration.settings())
        .map(|(param, setting)| {
            if param.name != setting.name {
                return Err(format!(
                    "expected parameter '{}', got '{}'",
                    param.name, setting.name
                ));
            }
            param.position_of(setting.value).ok_or_else(|| {
                format!(
                    "value {} is not legal for parameter '{}'",
                    setting.value, param.name
                )
            })
        })
        .collect()
}
