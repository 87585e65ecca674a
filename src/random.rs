//! Seeded random sources owned by individual searchers.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a reproducible generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed; `None` draws a fresh seed.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Number of items to keep when sampling `fraction` of `total`.
///
/// Rounds up and never returns less than one (for a non-empty `total`).
pub(crate) fn sample_count(fraction: f64, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let n = (fraction * total as f64).ceil() as usize;
    n.clamp(1, total)
}
