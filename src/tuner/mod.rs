//! Reference tuning loop.
//!
//! [`TuneRunner`] alternates the searcher protocol with an [`Oracle`]:
//! surface a configuration, evaluate it, record the outcome, advance. It
//! stops when the round budget is spent, the searcher reports exhaustion,
//! or a cancellation flag is raised, and returns the best configuration.

mod config;
mod runner;
mod types;

pub use config::TuneConfig;
pub use runner::{TuneResult, TuneRunner};
pub use types::Oracle;
