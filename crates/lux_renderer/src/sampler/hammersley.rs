//! Hammersley low-discrepancy sampling.
//!
//! Point `j` of `n` is `(j / n, radical_inverse(j))`. The sequence has no
//! random component, so all sets are identical.

use lux_math::DVec2;

use super::Pattern;

/// Base-2 radical inverse: mirror the binary digits of `j` about the binary
/// point, so 1 -> 0.5, 2 -> 0.25, 3 -> 0.75.
pub fn radical_inverse(mut j: usize) -> f64 {
    let mut x = 0.0;
    let mut f = 0.5;
    while j > 0 {
        x += f * (j % 2) as f64;
        j /= 2;
        f *= 0.5;
    }
    x
}

pub(super) fn generate(num_samples: usize, num_sets: usize) -> Pattern {
    let set: Vec<DVec2> = (0..num_samples)
        .map(|j| DVec2::new(j as f64 / num_samples as f64, radical_inverse(j)))
        .collect();

    let mut points = Vec::with_capacity(num_samples * num_sets);
    for _ in 0..num_sets {
        points.extend_from_slice(&set);
    }

    Pattern {
        num_samples,
        points,
    }
}
