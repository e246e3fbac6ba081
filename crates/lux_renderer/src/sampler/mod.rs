//! Sampling engine.
//!
//! A [`Sampler`] precomputes `num_sets` independent pattern sets of 2D points
//! in the unit square and hands them out one at a time. Each new round of
//! `num_samples` draws picks a random set, then walks that set through its own
//! shuffled index table, so consecutive pixels do not see the same layout.
//!
//! Samplers are shared by many pixel jobs; the draw cursor is the only
//! mutable state and sits behind a mutex.

mod hammersley;
mod jittered;
mod random;
mod regular;

use std::f64::consts::PI;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use lux_math::{DVec2, DVec3};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::SamplerError;

pub use hammersley::radical_inverse;

/// Number of pattern sets used when none is given. Prime, so rounds do not
/// line up with common image widths.
pub const DEFAULT_NUM_SETS: usize = 83;

/// Sampling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    /// Independent uniform points.
    Random,
    /// One random point per cell of an n x n grid.
    Jittered,
    /// Hammersley low-discrepancy points; every set is identical.
    Hammersley,
    /// Cell centers of an n x n grid.
    Regular,
}

/// Points for all sets, laid out set after set.
struct Pattern {
    num_samples: usize,
    points: Vec<DVec2>,
}

/// Draw state shared by everyone holding the sampler.
struct Cursor {
    index: usize,
    jump: usize,
    rng: StdRng,
}

/// Thread-safe 2D sample generator.
pub struct Sampler {
    kind: SamplerKind,
    num_samples: usize,
    num_sets: usize,
    samples: Vec<DVec2>,
    shuffled_indices: Vec<usize>,
    cursor: Mutex<Cursor>,
}

impl Sampler {
    /// Create a sampler seeded from OS entropy.
    pub fn new(kind: SamplerKind, num_samples: usize, num_sets: usize) -> Result<Self, SamplerError> {
        Self::with_rng(kind, num_samples, num_sets, StdRng::from_entropy())
    }

    /// Create a sampler whose patterns and draw order depend only on `seed`.
    pub fn with_seed(
        kind: SamplerKind,
        num_samples: usize,
        num_sets: usize,
        seed: u64,
    ) -> Result<Self, SamplerError> {
        Self::with_rng(kind, num_samples, num_sets, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        kind: SamplerKind,
        num_samples: usize,
        num_sets: usize,
        mut rng: StdRng,
    ) -> Result<Self, SamplerError> {
        if num_samples == 0 {
            return Err(SamplerError::NoSamples);
        }
        if num_sets == 0 {
            return Err(SamplerError::NoSets);
        }

        let pattern = match kind {
            SamplerKind::Random => random::generate(num_samples, num_sets, &mut rng),
            SamplerKind::Jittered => jittered::generate(num_samples, num_sets, &mut rng),
            SamplerKind::Hammersley => hammersley::generate(num_samples, num_sets),
            SamplerKind::Regular => regular::generate(num_samples, num_sets),
        };
        let shuffled_indices = shuffled_indices(pattern.num_samples, num_sets, &mut rng);

        Ok(Self {
            kind,
            num_samples: pattern.num_samples,
            num_sets,
            samples: pattern.points,
            shuffled_indices,
            cursor: Mutex::new(Cursor {
                index: 0,
                jump: 0,
                rng,
            }),
        })
    }

    /// The strategy this sampler was built with.
    pub fn kind(&self) -> SamplerKind {
        self.kind
    }

    /// Samples per set. Grid strategies round the requested count down to a
    /// perfect square.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Points of pattern set `set`, in generation order.
    ///
    /// # Panics
    ///
    /// Panics if `set >= num_sets()`.
    pub fn pattern(&self, set: usize) -> &[DVec2] {
        let start = set * self.num_samples;
        &self.samples[start..start + self.num_samples]
    }

    /// Draw order of pattern set `set`: a permutation of `0..num_samples()`.
    ///
    /// # Panics
    ///
    /// Panics if `set >= num_sets()`.
    pub fn shuffled_indices(&self, set: usize) -> &[usize] {
        let start = set * self.num_samples;
        &self.shuffled_indices[start..start + self.num_samples]
    }

    /// Draw the next sample point in `[0,1) x [0,1)`.
    pub fn sample(&self) -> DVec2 {
        let mut guard = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        let cursor = &mut *guard;

        let offset = cursor.index % self.num_samples;
        if offset == 0 {
            cursor.jump = cursor.rng.gen_range(0..self.num_sets) * self.num_samples;
        }
        cursor.index = cursor.index.wrapping_add(1);

        let jump = cursor.jump;
        self.samples[jump + self.shuffled_indices[jump + offset]]
    }

    /// Map the next sample onto the unit hemisphere around +Z with a
    /// cosine-power density of exponent `e`.
    pub fn sample_hemisphere(&self, e: f64) -> DVec3 {
        let sample = self.sample();

        let (sin_phi, cos_phi) = (2.0 * PI * sample.x).sin_cos();
        let cos_theta = (1.0 - sample.y).powf(1.0 / (e + 1.0));
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        DVec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sampler")
            .field("kind", &self.kind)
            .field("num_samples", &self.num_samples)
            .field("num_sets", &self.num_sets)
            .finish_non_exhaustive()
    }
}

/// Side of the largest square grid that fits in `num_samples`.
fn grid_size(num_samples: usize) -> usize {
    let mut n = (num_samples as f64).sqrt() as usize;
    while n * n > num_samples {
        n -= 1;
    }
    while (n + 1) * (n + 1) <= num_samples {
        n += 1;
    }
    n
}

/// One independent shuffle of `0..num_samples` per set. Each set shuffles the
/// previous set's order rather than starting from identity.
fn shuffled_indices(num_samples: usize, num_sets: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..num_samples).collect();
    let mut table = Vec::with_capacity(num_samples * num_sets);
    for _ in 0..num_sets {
        indices.shuffle(rng);
        table.extend_from_slice(&indices);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    const KINDS: [SamplerKind; 4] = [
        SamplerKind::Random,
        SamplerKind::Jittered,
        SamplerKind::Hammersley,
        SamplerKind::Regular,
    ];

    fn in_unit_square(p: DVec2) -> bool {
        (0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y)
    }

    #[test]
    fn test_grid_size() {
        assert_eq!(grid_size(1), 1);
        assert_eq!(grid_size(3), 1);
        assert_eq!(grid_size(4), 2);
        assert_eq!(grid_size(15), 3);
        assert_eq!(grid_size(16), 4);
        assert_eq!(grid_size(10_000), 100);
    }

    #[test]
    fn test_all_points_in_unit_square() {
        for kind in KINDS {
            for &(samples, sets) in &[(1, 1), (4, 3), (9, 83), (16, 7), (25, 2)] {
                let sampler = Sampler::with_seed(kind, samples, sets, 7).unwrap();
                for set in 0..sampler.num_sets() {
                    for &p in sampler.pattern(set) {
                        assert!(in_unit_square(p), "{kind:?} produced {p:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_grid_kinds_round_down_to_square() {
        let jittered = Sampler::with_seed(SamplerKind::Jittered, 10, 2, 1).unwrap();
        let regular = Sampler::with_seed(SamplerKind::Regular, 24, 2, 1).unwrap();
        let random = Sampler::with_seed(SamplerKind::Random, 10, 2, 1).unwrap();
        let hammersley = Sampler::with_seed(SamplerKind::Hammersley, 10, 2, 1).unwrap();

        assert_eq!(jittered.num_samples(), 9);
        assert_eq!(regular.num_samples(), 16);
        assert_eq!(random.num_samples(), 10);
        assert_eq!(hammersley.num_samples(), 10);
    }

    #[test]
    fn test_shuffled_indices_are_permutations() {
        for kind in KINDS {
            let sampler = Sampler::with_seed(kind, 16, 11, 99).unwrap();
            for set in 0..sampler.num_sets() {
                let mut seen = sampler.shuffled_indices(set).to_vec();
                seen.sort_unstable();
                assert_eq!(seen, (0..16).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            Sampler::new(SamplerKind::Jittered, 0, 83).unwrap_err(),
            SamplerError::NoSamples
        );
        assert_eq!(
            Sampler::new(SamplerKind::Random, 4, 0).unwrap_err(),
            SamplerError::NoSets
        );
    }

    #[test]
    fn test_seed_determinism() {
        let a = Sampler::with_seed(SamplerKind::Jittered, 16, 83, 1234).unwrap();
        let b = Sampler::with_seed(SamplerKind::Jittered, 16, 83, 1234).unwrap();
        for _ in 0..200 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_round_draws_one_whole_set() {
        let sampler = Sampler::with_seed(SamplerKind::Jittered, 16, 5, 3).unwrap();

        for _ in 0..10 {
            let round: Vec<DVec2> = (0..16).map(|_| sampler.sample()).collect();

            // Every point of a round comes from one set, each exactly once
            let set = (0..sampler.num_sets())
                .find(|&s| sampler.pattern(s).contains(&round[0]))
                .unwrap();
            let mut expected = sampler.pattern(set).to_vec();
            let mut drawn = round.clone();
            let key = |p: &DVec2| (p.x.to_bits(), p.y.to_bits());
            expected.sort_by_key(key);
            drawn.sort_by_key(key);
            assert_eq!(drawn, expected);
        }
    }

    #[test]
    fn test_round_follows_shuffled_order() {
        let sampler = Sampler::with_seed(SamplerKind::Regular, 9, 1, 5).unwrap();
        let order = sampler.shuffled_indices(0).to_vec();
        let pattern = sampler.pattern(0).to_vec();

        for _ in 0..3 {
            for &i in &order {
                assert_eq!(sampler.sample(), pattern[i]);
            }
        }
    }

    #[test]
    fn test_concurrent_draws() {
        let sampler = Arc::new(Sampler::with_seed(SamplerKind::Hammersley, 16, 83, 8).unwrap());
        let valid: HashSet<(u64, u64)> = sampler
            .pattern(0)
            .iter()
            .map(|p| (p.x.to_bits(), p.y.to_bits()))
            .collect();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let sampler = Arc::clone(&sampler);
                let valid = &valid;
                scope.spawn(move || {
                    for _ in 0..1000 {
                        let p = sampler.sample();
                        assert!(valid.contains(&(p.x.to_bits(), p.y.to_bits())));
                    }
                });
            }
        });
    }

    #[test]
    fn test_hemisphere_samples() {
        let sampler = Sampler::with_seed(SamplerKind::Jittered, 64, 10, 21).unwrap();
        for e in [0.0, 1.0, 10.0, 100.0] {
            for _ in 0..256 {
                let d = sampler.sample_hemisphere(e);
                assert!((d.length() - 1.0).abs() < 1e-9);
                assert!(d.z > 0.0);
            }
        }
    }

    #[test]
    fn test_hemisphere_exponent_tightens_lobe() {
        let sampler = Sampler::with_seed(SamplerKind::Jittered, 64, 10, 4).unwrap();
        let mean_z = |e: f64| (0..640).map(|_| sampler.sample_hemisphere(e).z).sum::<f64>() / 640.0;
        assert!(mean_z(50.0) > mean_z(1.0));
    }
}
