// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::math::constants::{Float, ONE_MINUS_EPSILON};

/// Deterministic low-discrepancy source: `(dimension, index) -> [0, 1)`.
pub trait SampleSource: Send + Sync {
    fn sample(&self, dimension: usize, index: u64) -> Float;
}

impl<F> SampleSource for F
where
    F: Fn(usize, u64) -> Float + Send + Sync,
{
    fn sample(&self, dimension: usize, index: u64) -> Float {
        self(dimension, index)
    }
}

const DIMENSIONS: usize = 8;
const PRIMES: [u64; DIMENSIONS] = [2, 3, 5, 7, 11, 13, 17, 19];

pub fn radical_inverse(base: u64, mut index: u64) -> f64 {
    let inv_base = 1.0 / base as f64;
    let mut inv_base_n = 1.0;
    let mut reversed: u64 = 0;
    while index > 0 {
        let next = index / base;
        let digit = index - next * base;
        reversed = reversed * base + digit;
        inv_base_n *= inv_base;
        index = next;
    }
    reversed as f64 * inv_base_n
}

/// Halton sequence with a per-dimension Cranley-Patterson rotation.
/// Seed 0 keeps the plain, unrotated sequence.
pub struct HaltonSource {
    offsets: [f64; DIMENSIONS],
}

impl HaltonSource {
    pub fn new(seed: u64) -> Self {
        let mut offsets = [0.0; DIMENSIONS];
        if seed != 0 {
            let mut rng = LcgRng::new(seed);
            for offset in offsets.iter_mut() {
                *offset = rng.next_f32() as f64;
            }
        }
        Self { offsets }
    }

    pub fn dimensions(&self) -> usize {
        DIMENSIONS
    }
}

impl SampleSource for HaltonSource {
    fn sample(&self, dimension: usize, index: u64) -> Float {
        let d = dimension % DIMENSIONS;
        let v = (radical_inverse(PRIMES[d], index) + self.offsets[d]).fract();
        (v as Float).min(ONE_MINUS_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radical_inverse_base_two() {
        assert_eq!(radical_inverse(2, 0), 0.0);
        assert_eq!(radical_inverse(2, 1), 0.5);
        assert_eq!(radical_inverse(2, 2), 0.25);
        assert_eq!(radical_inverse(2, 3), 0.75);
        assert!((radical_inverse(3, 1) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_halton_values_in_unit_interval() {
        let source = HaltonSource::new(1234);
        for d in 0..source.dimensions() {
            for i in 0..512u64 {
                let v = source.sample(d, i);
                assert!(v >= 0.0 && v < 1.0, "dim {} index {} -> {}", d, i, v);
            }
        }
    }

    #[test]
    fn test_closure_source() {
        let source = |d: usize, i: u64| (d as Float + i as Float) * 0.01;
        assert!((source.sample(2, 3) - 0.05).abs() < 1e-6);
    }
}
