//! Error type shared by every module of the crate.

use thiserror::Error;

/// Errors raised while setting up a tuning run.
///
/// Failed or infeasible evaluations are not errors; they are recorded as
/// [`Evaluation`](crate::energy::Evaluation) values and the search goes on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuneError {
    #[error("configuration space is empty")]
    EmptySpace,

    #[error("invalid configuration space: {0}")]
    InvalidSpace(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no configuration produced a usable energy")]
    NoFeasibleConfiguration,
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, TuneError>;
