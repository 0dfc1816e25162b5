// Copyright @yucwang 2026

use crate::core::accumulator::ContributionAccumulator;
use crate::core::camera_loader::OpticalSystem;
use crate::core::error::CameraError;
use crate::core::lens::LensStack;
use crate::core::parallel::parallel_fill;
use crate::core::pipeline::{ContributionPipeline, PipelineConfig};
use crate::core::records::{
    AuxiliaryRecord, PackedPixel, RayBlock, RayDirectionRecord, RayOriginRecord, ReturnedSample,
};
use crate::core::sampler::SampleSource;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::warp::map_samples_to_disc;
use crate::sensors::{pixel_coordinate, validate_image_size};

/// Where discarded rays are sent: far below anything a scene would contain.
pub const DEAD_RAY_ORIGIN: [Float; 3] = [0.0, -1.0e7, 0.0];
pub const DEAD_RAY_DIRECTION: [Float; 3] = [0.0, -1.0, 0.0];

/// Physical sensor extent for a diagonal and an aspect ratio `height / width`.
pub fn physical_size(diagonal: Float, aspect: Float) -> Vector2f {
    let width = 2.0 * (diagonal * diagonal / (1.0 + aspect * aspect)).sqrt();
    Vector2f::new(width, aspect * width)
}

/// Everything generation produces for one ray index.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GeneratedRay {
    pub origin: RayOriginRecord,
    pub direction: RayDirectionRecord,
    pub aux: AuxiliaryRecord,
}

/// Camera that simulates a tabulated multi-element lens between the film and
/// the scene.
pub struct TableLensCamera {
    width: u32,
    height: u32,
    phys_size: Vector2f,
    stack: LensStack,
    sampler: Box<dyn SampleSource>,
    counter: u64,
    pipeline: ContributionPipeline,
    accumulator: ContributionAccumulator,
}

impl TableLensCamera {
    pub fn new(
        width: u32,
        height: u32,
        system: OpticalSystem,
        pipeline: PipelineConfig,
        sampler: Box<dyn SampleSource>,
    ) -> Result<Self, CameraError> {
        validate_image_size(width, height)?;
        let aspect = height as Float / width as Float;
        let camera = Self {
            width,
            height,
            phys_size: physical_size(system.sensor_diagonal, aspect),
            stack: system.stack,
            sampler,
            counter: 0,
            pipeline: ContributionPipeline::new(pipeline)?,
            accumulator: ContributionAccumulator::new(width as usize, height as usize),
        };

        log::info!(
            "TableLensCamera: {}x{}, sensor {} x {}, pipeline depth {} latency {}.",
            width, height, camera.phys_size.x, camera.phys_size.y, pipeline.depth, pipeline.latency
        );
        log::info!("{}", camera.stack.describe());
        camera.log_calibration_ray();
        Ok(camera)
    }

    fn log_calibration_ray(&self) {
        let origin = Vector3f::new(1.0, 0.0, 0.0);
        let target = Vector3f::new(0.0, 0.0, self.stack.rear_z());
        let ray = Ray3f::new(origin, (target - origin).normalize());
        match self.stack.trace_from_film(&ray) {
            Ok(exit) => log::debug!(
                "Calibration ray exits at {:?} heading {:?}.",
                exit.origin(), exit.dir().normalize()
            ),
            Err(failure) => log::debug!("Calibration ray failed: {:?}.", failure),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn physical_size(&self) -> Vector2f {
        self.phys_size
    }

    pub fn stack(&self) -> &LensStack {
        &self.stack
    }

    pub fn ray_counter(&self) -> u64 {
        self.counter
    }

    pub fn spp_done(&self) -> f64 {
        self.accumulator.spp_done()
    }

    /// Generate the ray for global sample index `index`.
    pub fn generate_ray(&self, index: u64) -> GeneratedRay {
        let sens_x = self.sampler.sample(0, index);
        let sens_y = self.sampler.sample(1, index);
        let lens_x = self.sampler.sample(2, index);
        let lens_y = self.sampler.sample(3, index);

        let xy = (self.phys_size * 0.25).component_mul(&Vector2f::new(2.0 * sens_x - 1.0, 2.0 * sens_y - 1.0));
        let pixel = PackedPixel::pack(pixel_coordinate(self.width, sens_x), pixel_coordinate(self.height, sens_y));

        let film_point = Vector3f::new(xy.x, xy.y, 0.0);
        let rear = map_samples_to_disc(&Vector2f::new(lens_x - 0.5, lens_y - 0.5)) * (2.0 * self.stack.rear_radius());
        let shoot_to = Vector3f::new(rear.x, rear.y, self.stack.rear_z());
        let dir = (shoot_to - film_point).normalize();
        let cos_theta = dir.z.abs();
        let weight = (cos_theta * cos_theta) * (cos_theta * cos_theta);

        let (origin, direction, pixel) = match self.stack.trace_from_film(&Ray3f::new(film_point, dir)) {
            Ok(exit) => {
                let exit = exit.normalized();
                (-exit.origin(), -exit.dir(), pixel)
            }
            Err(_) => (
                Vector3f::from(DEAD_RAY_ORIGIN),
                Vector3f::from(DEAD_RAY_DIRECTION),
                PackedPixel::DEAD,
            ),
        };

        GeneratedRay {
            origin: RayOriginRecord { origin, pixel },
            direction: RayDirectionRecord { direction },
            aux: AuxiliaryRecord { weight, pixel },
        }
    }

    /// Generate `block_size` rays for pass `pass_id` and keep their auxiliary
    /// records in the pipeline slot for that pass.
    pub fn generate_rays(&mut self, block_size: usize, pass_id: u32) -> RayBlock {
        let base = self.counter;
        let mut generated = vec![GeneratedRay::default(); block_size];
        {
            let camera: &TableLensCamera = self;
            parallel_fill(&mut generated, |i| camera.generate_ray(base + i as u64));
        }

        let slot = self.pipeline.slot_for_generation(pass_id, block_size);
        for (record, ray) in slot.iter_mut().zip(generated.iter()) {
            *record = ray.aux;
        }
        self.counter += block_size as u64;

        RayBlock {
            origins: generated.iter().map(|r| r.origin).collect(),
            directions: generated.iter().map(|r| r.direction).collect(),
        }
    }

    /// Accumulate radiance returned under `pass_id`, weighted by the records
    /// stored when the rays were generated.
    pub fn add_contribution(&mut self, pass_id: u32, samples: &[ReturnedSample], framebuffer: &mut Bitmap) {
        let records = self.pipeline.slot_for_accumulation(pass_id);
        self.accumulator.accumulate(Some(records), samples, framebuffer);
    }

    pub fn normalized(&self, framebuffer: &Bitmap) -> Result<Bitmap, CameraError> {
        self.accumulator.normalized(framebuffer)
    }

    pub fn finish(&mut self, framebuffer: &Bitmap) -> Result<Bitmap, CameraError> {
        self.accumulator.finish(framebuffer)
    }
}
