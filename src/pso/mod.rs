//! Particle swarm optimisation over a configuration space.
//!
//! A discrete variant: particles do not have velocities, instead every
//! parameter of a moving particle is drawn from the swarm's best, the
//! particle's own best, or a random legal value.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"

mod config;
mod searcher;

pub use config::PsoConfig;
pub use searcher::PsoSearcher;
