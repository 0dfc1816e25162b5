// Copyright @yucwang 2026

use crate::core::parallel::parallel_fill;
use crate::core::records::{RayBlock, ReturnedSample};
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;

pub use super::renderer::RayShader;

/// Procedural scene: a checkerboard ground plane under a sky gradient.
pub struct BackdropRenderer {
    ground_height: Float,
    checker_size: Float,
    light: Vector3f,
    dark: Vector3f,
    horizon: Vector3f,
    zenith: Vector3f,
}

impl Default for BackdropRenderer {
    fn default() -> Self {
        Self::new(-1.0, 0.5)
    }
}

impl BackdropRenderer {
    pub fn new(ground_height: Float, checker_size: Float) -> Self {
        Self {
            ground_height,
            checker_size,
            light: Vector3f::new(0.8, 0.8, 0.75),
            dark: Vector3f::new(0.1, 0.1, 0.12),
            horizon: Vector3f::new(0.9, 0.85, 0.8),
            zenith: Vector3f::new(0.2, 0.4, 0.9),
        }
    }

    pub fn radiance(&self, ray: &Ray3f) -> Vector3f {
        let d = ray.dir();
        if d.y < 0.0 {
            let t = (self.ground_height - ray.origin().y) / d.y;
            if t > 0.0 {
                let p = ray.at(t);
                let cell = (p.x / self.checker_size).floor() as i64 + (p.z / self.checker_size).floor() as i64;
                return if cell.rem_euclid(2) == 0 { self.light } else { self.dark };
            }
        }
        let up = d.normalize().y.max(0.0);
        self.horizon * (1.0 - up) + self.zenith * up
    }
}

impl RayShader for BackdropRenderer {
    fn shade(&self, rays: &RayBlock) -> Vec<ReturnedSample> {
        let mut samples = vec![ReturnedSample::default(); rays.len()];
        parallel_fill(&mut samples, |i| {
            let origin = &rays.origins[i];
            if origin.pixel.is_dead() {
                return ReturnedSample::new(Vector3f::zeros(), origin.pixel);
            }
            let ray = Ray3f::new(origin.origin, rays.directions[i].direction);
            ReturnedSample::new(self.radiance(&ray), origin.pixel)
        });
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::{PackedPixel, RayDirectionRecord, RayOriginRecord};

    #[test]
    fn test_ground_and_sky() {
        let backdrop = BackdropRenderer::new(-1.0, 1.0);
        let down = Ray3f::new(Vector3f::new(0.25, 0.0, 0.0), Vector3f::new(0.0, -1.0, -0.5));
        // Hits (0.25, -1, -0.5): cells 0 and -1.
        assert_eq!(backdrop.radiance(&down), backdrop.dark);
        let up = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0));
        assert!((backdrop.radiance(&up) - backdrop.zenith).norm() < 1e-6);
        let level = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0));
        assert!((backdrop.radiance(&level) - backdrop.horizon).norm() < 1e-6);
    }

    #[test]
    fn test_dead_rays_return_black() {
        let backdrop = BackdropRenderer::default();
        let rays = RayBlock {
            origins: vec![
                RayOriginRecord { origin: Vector3f::new(0.0, -1.0e7, 0.0), pixel: PackedPixel::DEAD },
                RayOriginRecord { origin: Vector3f::zeros(), pixel: PackedPixel::pack(3, 4) },
            ],
            directions: vec![
                RayDirectionRecord { direction: Vector3f::new(0.0, -1.0, 0.0) },
                RayDirectionRecord { direction: Vector3f::new(0.0, 0.0, -1.0) },
            ],
        };
        let samples = backdrop.shade(&rays);
        assert_eq!(samples[0].radiance, Vector3f::zeros());
        assert!(samples[0].pixel.is_dead());
        assert_eq!(samples[1].pixel, PackedPixel::pack(3, 4));
        assert!(samples[1].radiance.norm_squared() > 0.0);
    }
}
