//! Configuration spaces.
//!
//! A [`ConfigurationSpace`] is the finite, ordered set of legal kernel
//! parameter assignments a searcher explores. It is fully materialised
//! before the search starts; searchers only ever see dense indices into it.
//!
//! Two configurations are neighbours when they differ in exactly one
//! parameter (Hamming distance 1 over the parameter tuple).

mod configurations;
mod types;

pub use configurations::ConfigurationSpace;
pub use types::{Configuration, Parameter, Setting};
