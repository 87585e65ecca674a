//! Parameter and configuration types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tunable kernel parameter and its legal values.
///
/// Values are kept in the order given; that order defines the parameter's
/// positions used by [`ConfigurationSpace`](super::ConfigurationSpace).
///
/// # Examples
///
/// ```
/// use u_tuner::space::Parameter;
///
/// let tile = Parameter::new("TILE", vec![8, 16, 32]);
/// assert_eq!(tile.len(), 3);
/// assert_eq!(tile.position_of(16), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    /// Parameter name (e.g. `"TILE_M"`), unique within a space.
    pub name: String,
    /// Distinct legal values.
    pub values: Vec<usize>,
}

impl Parameter {
    /// Creates a new parameter with the given legal values.
    pub fn new(name: impl Into<String>, values: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of legal values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the parameter has no legal value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of `value` in the legal value list.
    pub fn position_of(&self, value: usize) -> Option<usize> {
        self.values.iter().position(|&v| v == value)
    }
}

/// One `name = value` assignment inside a [`Configuration`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Setting {
    pub name: String,
    pub value: usize,
}

impl Setting {
    pub fn new(name: impl Into<String>, value: usize) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One point of the tuning space: a value for every parameter, in
/// parameter order.
///
/// Equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Configuration {
    settings: Vec<Setting>,
}

impl Configuration {
    /// Creates a configuration from its settings.
    pub fn new(settings: Vec<Setting>) -> Self {
        Self { settings }
    }

    /// All settings, in parameter order.
    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// Value of the named parameter.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.settings
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value)
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Number of settings whose values differ from `other`.
    ///
    /// Both configurations must come from the same space (same parameter
    /// order).
    pub fn distance(&self, other: &Configuration) -> usize {
        self.settings
            .iter()
            .zip(&other.settings)
            .filter(|(a, b)| a.value != b.value)
            .count()
    }
}

impl FromIterator<(String, usize)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, value)| Setting { name, value })
                .collect(),
        )
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.settings.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={}", s.name, s.value)?;
        }
        Ok(())
    }
}
