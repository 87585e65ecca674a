//! The evaluation oracle.

use crate::energy::Evaluation;
use crate::space::Configuration;

/// Realises a configuration on the device and reports its cost.
///
/// Implementations compile the kernel with the configuration's parameters,
/// run it, and return the measured time as [`Evaluation::Energy`], or one of
/// the failure variants. Failures never abort a tuning run.
///
/// Any `FnMut(&Configuration) -> Evaluation` closure is an oracle.
///
/// # Examples
///
/// ```ignore
/// struct OpenClOracle { queue: Queue, program_source: String }
///
/// impl Oracle for OpenClOracle {
///     fn evaluate(&mut self, configuration: &Configuration) -> Evaluation {
///         let kernel = match self.compile(configuration) {
///             Ok(k) => k,
///             Err(e) => return Evaluation::BuildError(e.to_string()),
///         };
///         if kernel.local_memory() > self.queue.device().local_memory() {
///             return Evaluation::Infeasible("local memory".into());
///         }
///         match self.queue.run_and_time(&kernel) {
///             Ok(ms) => Evaluation::Energy(ms),
///             Err(e) => Evaluation::RuntimeError(e.to_string()),
///         }
///     }
/// }
/// ```
pub trait Oracle {
    fn evaluate(&mut self, configuration: &Configuration) -> Evaluation;
}

impl<F> Oracle for F
where
    F: FnMut(&Configuration) -> Evaluation,
{
    fn evaluate(&mut self, configuration: &Configuration) -> Evaluation {
        self(configuration)
    }
}
