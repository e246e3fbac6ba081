//! Regular grid sampling: the center of every cell, no randomness.

use lux_math::DVec2;

use super::{grid_size, Pattern};

pub(super) fn generate(num_samples: usize, num_sets: usize) -> Pattern {
    let n = grid_size(num_samples);
    let nf = n as f64;

    let mut points = Vec::with_capacity(n * n * num_sets);
    for _ in 0..num_sets {
        for j in 0..n {
            for k in 0..n {
                points.push(DVec2::new((0.5 + k as f64) / nf, (0.5 + j as f64) / nf));
            }
        }
    }

    Pattern {
        num_samples: n * n,
        points,
    }
}
