// Copyright @yucwang 2026

use crate::core::accumulator::ContributionAccumulator;
use crate::core::camera_loader::DofSettings;
use crate::core::error::CameraError;
use crate::core::parallel::parallel_fill;
use crate::core::records::{PackedPixel, RayBlock, RayDirectionRecord, RayOriginRecord, ReturnedSample};
use crate::core::sampler::SampleSource;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f, Vector4f};
use crate::math::transform::Transform;
use crate::math::warp::map_samples_to_disc;
use crate::sensors::{pixel_coordinate, validate_image_size};

/// Pinhole camera driven by an inverse projection matrix, with optional
/// thin-lens depth of field.
pub struct ThinLensCamera {
    width: u32,
    height: u32,
    projection_inverse: Transform,
    dof: DofSettings,
    sampler: Box<dyn SampleSource>,
    counter: u64,
    accumulator: ContributionAccumulator,
}

impl ThinLensCamera {
    pub fn new(
        width: u32,
        height: u32,
        projection_inverse: Transform,
        dof: DofSettings,
        sampler: Box<dyn SampleSource>,
    ) -> Result<Self, CameraError> {
        validate_image_size(width, height)?;
        if dof.enabled {
            log::info!(
                "ThinLensCamera: {}x{}, lens radius {}, focal distance {}.",
                width, height, dof.lens_radius, dof.focal_distance
            );
        } else {
            log::info!("ThinLensCamera: {}x{}, pinhole.", width, height);
        }
        Ok(Self {
            width,
            height,
            projection_inverse,
            dof,
            sampler,
            counter: 0,
            accumulator: ContributionAccumulator::new(width as usize, height as usize),
        })
    }

    pub fn ray_counter(&self) -> u64 {
        self.counter
    }

    pub fn spp_done(&self) -> f64 {
        self.accumulator.spp_done()
    }

    fn eye_ray_dir(&self, x: Float, y: Float) -> Vector3f {
        let w = self.width as Float;
        let h = self.height as Float;
        let ndc = Vector4f::new(2.0 * (x + 0.5) / w - 1.0, -2.0 * (y + 0.5) / h + 1.0, 0.0, 1.0);
        self.projection_inverse.apply_homogeneous(ndc).normalize()
    }

    pub fn generate_ray(&self, index: u64) -> (RayOriginRecord, RayDirectionRecord) {
        let u0 = self.sampler.sample(0, index);
        let u1 = self.sampler.sample(1, index);
        let x = self.width as Float * u0;
        let y = self.height as Float * u1;

        let mut origin = Vector3f::zeros();
        let mut dir = self.eye_ray_dir(x, y);

        // Rays that never reach the focal plane keep the pinhole origin.
        if self.dof.enabled && dir.z < 0.0 {
            let lens_x = self.sampler.sample(2, index);
            let lens_y = self.sampler.sample(3, index);
            let t_focus = self.dof.focal_distance / (-dir.z);
            let focus = origin + dir * t_focus;
            let disc = map_samples_to_disc(&Vector2f::new(lens_x - 0.5, lens_y - 0.5)) * (2.0 * self.dof.lens_radius);
            origin.x += disc.x;
            origin.y += disc.y;
            dir = (focus - origin).normalize();
        }

        let pixel = PackedPixel::pack(pixel_coordinate(self.width, u0), pixel_coordinate(self.height, u1));
        (RayOriginRecord { origin, pixel }, RayDirectionRecord { direction: dir })
    }

    /// Rays carry no auxiliary data, so the pass id only keeps the call
    /// shape shared with the lens camera.
    pub fn generate_rays(&mut self, block_size: usize, _pass_id: u32) -> RayBlock {
        let base = self.counter;
        let mut generated = vec![(RayOriginRecord::default(), RayDirectionRecord::default()); block_size];
        {
            let camera: &ThinLensCamera = self;
            parallel_fill(&mut generated, |i| camera.generate_ray(base + i as u64));
        }
        self.counter += block_size as u64;

        RayBlock {
            origins: generated.iter().map(|r| r.0).collect(),
            directions: generated.iter().map(|r| r.1).collect(),
        }
    }

    pub fn add_contribution(&mut self, samples: &[ReturnedSample], framebuffer: &mut Bitmap) {
        self.accumulator.accumulate(None, samples, framebuffer);
    }

    pub fn normalized(&self, framebuffer: &Bitmap) -> Result<Bitmap, CameraError> {
        self.accumulator.normalized(framebuffer)
    }

    pub fn finish(&mut self, framebuffer: &Bitmap) -> Result<Bitmap, CameraError> {
        self.accumulator.finish(framebuffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Matrix4f;

    const WIDTH: u32 = 64;
    const HEIGHT: u32 = 48;

    fn projection_inverse() -> Transform {
        let aspect = WIDTH as Float / HEIGHT as Float;
        Transform::new(Matrix4f::new_perspective(aspect, 0.8, 0.1, 100.0)).inverse()
    }

    // Sample values that land exactly on the image center after the half-pixel offset.
    fn centered(d: usize, _i: u64) -> Float {
        match d {
            0 => (WIDTH as Float * 0.5 - 0.5) / WIDTH as Float,
            1 => (HEIGHT as Float * 0.5 - 0.5) / HEIGHT as Float,
            2 => 0.9,
            _ => 0.5,
        }
    }

    #[test]
    fn test_pinhole_center_ray() {
        let camera = ThinLensCamera::new(WIDTH, HEIGHT, projection_inverse(), DofSettings::default(), Box::new(centered)).unwrap();
        let (origin, direction) = camera.generate_ray(0);
        assert_eq!(origin.origin, Vector3f::zeros());
        assert_eq!(origin.pixel.unpack(), (31, 23));
        assert!((direction.direction - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_pinhole_corner_rays_diverge() {
        let corner = |d: usize, _i: u64| -> Float { if d == 0 { 0.0 } else { 0.99 } };
        let camera = ThinLensCamera::new(WIDTH, HEIGHT, projection_inverse(), DofSettings::default(), Box::new(corner)).unwrap();
        let (origin, direction) = camera.generate_ray(0);
        let (x, y) = origin.pixel.unpack();
        assert_eq!((x, y), (0, 47));
        // Left edge points to -x, bottom edge to -y.
        assert!(direction.direction.x < 0.0);
        assert!(direction.direction.y < 0.0);
        assert!(direction.direction.z < 0.0);
    }

    #[test]
    fn test_dof_rays_meet_at_focal_plane() {
        let dof = DofSettings { enabled: true, lens_radius: 0.5, focal_distance: 10.0 };
        let camera = ThinLensCamera::new(WIDTH, HEIGHT, projection_inverse(), dof, Box::new(centered)).unwrap();
        let (origin, direction) = camera.generate_ray(0);
        assert!((origin.origin - Vector3f::new(0.4, 0.0, 0.0)).norm() < 1e-5);
        let d = direction.direction;
        let t = -10.0 / d.z;
        let hit = origin.origin + d * t;
        assert!((hit - Vector3f::new(0.0, 0.0, -10.0)).norm() < 1e-4);
    }

    #[test]
    fn test_dof_skips_rays_parallel_to_focal_plane() {
        // The identity projection puts every eye ray in the z = 0 plane.
        let dof = DofSettings { enabled: true, lens_radius: 0.5, focal_distance: 10.0 };
        let corner = |d: usize, _i: u64| -> Float { if d == 0 { 0.0 } else { 0.99 } };
        let camera = ThinLensCamera::new(WIDTH, HEIGHT, Transform::default(), dof, Box::new(corner)).unwrap();
        let (origin, direction) = camera.generate_ray(0);
        assert_eq!(origin.origin, Vector3f::zeros());
        assert!(direction.direction.iter().all(|c| c.is_finite()));
        assert_eq!(direction.direction.z, 0.0);
    }

    #[test]
    fn test_unit_weight_accumulation_and_finish() {
        let mut camera = ThinLensCamera::new(2, 2, Transform::default(), DofSettings::default(), Box::new(centered)).unwrap();
        let mut fb = Bitmap::new(2, 2);
        let block = camera.generate_rays(4, 0);
        assert_eq!(camera.ray_counter(), 4);
        let samples: Vec<ReturnedSample> = block
            .origins
            .iter()
            .map(|o| ReturnedSample::new(Vector3f::new(1.0, 1.0, 1.0), o.pixel))
            .collect();
        camera.add_contribution(&samples, &mut fb);
        assert!((camera.spp_done() - 1.0).abs() < 1e-12);

        let (x, y) = block.origins[0].pixel.unpack();
        let image = camera.finish(&fb).unwrap();
        assert_eq!(image[(x as usize, y as usize)], Vector4f::new(1.0, 1.0, 1.0, 1.0));
        assert!(camera.finish(&fb).is_err());
    }
}
