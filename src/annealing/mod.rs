//! Simulated annealing over a configuration space.
//!
//! A Metropolis random walk from configuration to neighbouring
//! configuration. Worse neighbours are accepted with a probability that
//! shrinks as the temperature cools, which lets the walk leave poor local
//! optima early and settle into greedy descent later. The search reports
//! exhaustion after more than [`MAX_ALREADY_VISITED_STATES`] consecutive
//! rounds without a move.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod searcher;

pub use config::{AnnealingConfig, CoolingSchedule};
pub use searcher::{acceptance_probability, AnnealingSearcher, MAX_ALREADY_VISITED_STATES};
