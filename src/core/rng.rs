// Copyright @yucwang 2026

use crate::math::constants::{Float, ONE_MINUS_EPSILON};

pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Uniform value in [0, 1).
    pub fn next_f32(&mut self) -> Float {
        let v = (self.next_u32() >> 8) as Float / (1u32 << 24) as Float;
        v.min(ONE_MINUS_EPSILON)
    }
}
