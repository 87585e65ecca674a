//! Search strategies for kernel auto-tuning.
//!
//! A tuning run looks for the fastest configuration of a compute kernel
//! (tile sizes, vector widths, unroll factors, ...) in a finite space of
//! legal parameter combinations. This crate provides the search side of
//! that loop:
//!
//! - **Configuration spaces**: dense, index-addressable sets of
//!   configurations with one-parameter-change neighbourhoods.
//! - **Searchers**: a uniform protocol ([`searcher::Searcher`]) with full
//!   search, random search, simulated annealing and a discrete particle
//!   swarm behind it.
//! - **Energy table**: the index-keyed record of measured costs and failed
//!   evaluations shared by the orchestrator and the searchers.
//! - **Runner**: a reference orchestrator driving a searcher against an
//!   evaluation oracle.
//!
//! # Architecture
//!
//! Compiling and timing kernels on a device is left to the caller's
//! [`tuner::Oracle`]; the crate only sees a scalar energy or a typed
//! failure per configuration.

pub mod annealing;
pub mod energy;
pub mod error;
pub mod pso;
pub mod random;
pub mod searcher;
pub mod space;
pub mod tuner;

pub use error::{Result, TuneError};
