//! Uniform random sampling: no structure at all.

use lux_math::DVec2;
use rand::rngs::StdRng;
use rand::Rng;

use super::Pattern;

pub(super) fn generate(num_samples: usize, num_sets: usize, rng: &mut StdRng) -> Pattern {
    let points = (0..num_samples * num_sets)
        .map(|_| DVec2::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    Pattern {
        num_samples,
        points,
    }
}
