//! Weighted categorical sampling.
//!
//! The corpus builder draws workload types and urgencies from declarative
//! weight tables instead of chained threshold comparisons, so a
//! distribution change is a data edit, not a code edit.

use rand::Rng;

/// One entry in a weight table.
#[derive(Debug, Clone, Copy)]
pub struct Weighted<T> {
    pub value: T,
    pub weight: f64,
}

/// Draw a value from a weight table using a cumulative threshold scan.
///
/// Weights need not sum to 1; the draw is taken over their total.
/// Negative weights count as zero. Returns `None` for an empty table or a
/// non-positive total.
pub fn sample_weighted<T: Copy>(table: &[Weighted<T>], rng: &mut impl Rng) -> Option<T> {
    let total: f64 = table.iter().map(|entry| entry.weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let draw = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for entry in table {
        cumulative += entry.weight.max(0.0);
        if draw < cumulative {
            return Some(entry.value);
        }
    }

    // Float accumulation can leave `draw` a hair past the final threshold.
    table.last().map(|entry| entry.value)
}
