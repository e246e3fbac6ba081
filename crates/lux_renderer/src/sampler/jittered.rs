//! Jittered (stratified) sampling.
//!
//! The unit square is cut into an n x n grid and each cell receives one
//! uniformly placed point. Points are stored row by row: index `j * n + k` is
//! the cell in row `j`, column `k`.

use lux_math::DVec2;
use rand::rngs::StdRng;
use rand::Rng;

use super::{grid_size, Pattern};

pub(super) fn generate(num_samples: usize, num_sets: usize, rng: &mut StdRng) -> Pattern {
    let n = grid_size(num_samples);
    let nf = n as f64;

    let mut points = Vec::with_capacity(n * n * num_sets);
    for _ in 0..num_sets {
        for j in 0..n {
            for k in 0..n {
                let x = (k as f64 + rng.gen::<f64>()) / nf;
                let y = (j as f64 + rng.gen::<f64>()) / nf;
                points.push(DVec2::new(x, y));
            }
        }
    }

    Pattern {
        num_samples: n * n,
        points,
    }
}
