// Copyright @yucwang 2026

use crate::core::camera_loader::CameraDocument;
use crate::core::error::CameraError;
use crate::core::pipeline::PipelineConfig;
use crate::core::records::{RayBlock, ReturnedSample};
use crate::core::sampler::SampleSource;
use crate::io::ImageWriter;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::transform::Transform;
use crate::sensors::table_lens::TableLensCamera;
use crate::sensors::thin_lens::ThinLensCamera;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    TableLens,
    ThinLens,
}

impl SensorKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "table_lens" | "tablelens" => Some(SensorKind::TableLens),
            "thin_lens" | "dof" => Some(SensorKind::ThinLens),
            _ => None,
        }
    }
}

/// Camera variant chosen at configuration time. Both variants share the same
/// generate / accumulate / finish cycle.
pub enum Sensor {
    TableLens(TableLensCamera),
    ThinLens(ThinLensCamera),
}

impl Sensor {
    /// `projection_inverse` is 16 row-major floats; only the thin-lens variant uses it.
    pub fn configure(
        kind: SensorKind,
        width: u32,
        height: u32,
        projection_inverse: &[Float; 16],
        document: &CameraDocument,
        pipeline: PipelineConfig,
        sampler: Box<dyn SampleSource>,
    ) -> Result<Sensor, CameraError> {
        match kind {
            SensorKind::TableLens => {
                let system = document.optical_system_or_empty();
                if system.stack.is_empty() && document.optical_system.is_some() {
                    log::warn!("optical_system has no lens lines; every ray will be discarded.");
                }
                Ok(Sensor::TableLens(TableLensCamera::new(width, height, system, pipeline, sampler)?))
            }
            SensorKind::ThinLens => {
                let transform = Transform::from_row_major(projection_inverse);
                Ok(Sensor::ThinLens(ThinLensCamera::new(width, height, transform, document.dof, sampler)?))
            }
        }
    }

    pub fn generate_rays(&mut self, block_size: usize, pass_id: u32) -> RayBlock {
        match self {
            Sensor::TableLens(camera) => camera.generate_rays(block_size, pass_id),
            Sensor::ThinLens(camera) => camera.generate_rays(block_size, pass_id),
        }
    }

    pub fn add_contribution(&mut self, pass_id: u32, samples: &[ReturnedSample], framebuffer: &mut Bitmap) {
        match self {
            Sensor::TableLens(camera) => camera.add_contribution(pass_id, samples, framebuffer),
            Sensor::ThinLens(camera) => camera.add_contribution(samples, framebuffer),
        }
    }

    pub fn spp_done(&self) -> f64 {
        match self {
            Sensor::TableLens(camera) => camera.spp_done(),
            Sensor::ThinLens(camera) => camera.spp_done(),
        }
    }

    pub fn normalized(&self, framebuffer: &Bitmap) -> Result<Bitmap, CameraError> {
        match self {
            Sensor::TableLens(camera) => camera.normalized(framebuffer),
            Sensor::ThinLens(camera) => camera.normalized(framebuffer),
        }
    }

    pub fn finish(&mut self, framebuffer: &Bitmap) -> Result<Bitmap, CameraError> {
        match self {
            Sensor::TableLens(camera) => camera.finish(framebuffer),
            Sensor::ThinLens(camera) => camera.finish(framebuffer),
        }
    }

    /// Tone-map the framebuffer and hand the image to `writer`.
    pub fn finish_rendering(&mut self, framebuffer: &Bitmap, writer: &mut dyn ImageWriter) -> Result<(), CameraError> {
        let image = self.finish(framebuffer)?;
        writer.write(&image)
    }

    pub fn describe(&self) -> String {
        match self {
            Sensor::TableLens(camera) => format!(
                "TableLensCamera: {}x{}, {} interfaces",
                camera.width(), camera.height(), camera.stack().len()
            ),
            Sensor::ThinLens(camera) => format!("ThinLensCamera: {} rays generated", camera.ray_counter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::camera_loader::parse_camera_str;
    use crate::core::records::PackedPixel;
    use crate::math::constants::Vector3f;

    const IDENTITY: [Float; 16] = [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];

    struct CountingWriter {
        images: Vec<Bitmap>,
    }

    impl ImageWriter for CountingWriter {
        fn write(&mut self, image: &Bitmap) -> Result<(), CameraError> {
            self.images.push(image.clone());
            Ok(())
        }
    }

    fn half(_d: usize, _i: u64) -> Float {
        0.5
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SensorKind::from_name("table_lens"), Some(SensorKind::TableLens));
        assert_eq!(SensorKind::from_name("dof"), Some(SensorKind::ThinLens));
        assert_eq!(SensorKind::from_name("fisheye"), None);
    }

    #[test]
    fn test_table_lens_without_optics_discards_everything() {
        let document = parse_camera_str(r#"<camera name="no_optics"/>"#).unwrap();
        let config = PipelineConfig::new(4, 2).unwrap();
        let mut sensor = Sensor::configure(SensorKind::TableLens, 16, 16, &IDENTITY, &document, config, Box::new(half)).unwrap();
        let block = sensor.generate_rays(8, 0);
        assert!(block.origins.iter().all(|o| o.pixel.is_dead()));
    }

    #[test]
    fn test_finish_rendering_hands_image_to_writer() {
        let document = parse_camera_str("<camera/>").unwrap();
        let config = PipelineConfig::new(1, 0).unwrap();
        let mut sensor = Sensor::configure(SensorKind::ThinLens, 2, 2, &IDENTITY, &document, config, Box::new(half)).unwrap();
        let mut fb = Bitmap::new(2, 2);
        sensor.generate_rays(4, 0);
        let samples = vec![ReturnedSample::new(Vector3f::new(0.5, 0.5, 0.5), PackedPixel::pack(1, 1)); 4];
        sensor.add_contribution(0, &samples, &mut fb);

        let mut writer = CountingWriter { images: Vec::new() };
        sensor.finish_rendering(&fb, &mut writer).unwrap();
        assert_eq!(writer.images.len(), 1);
        assert_eq!(writer.images[0][(1, 1)].x, (2.0 as Float).powf(1.0 / 2.2).min(1.0));
        assert!(sensor.finish_rendering(&fb, &mut writer).is_err());
        assert_eq!(writer.images.len(), 1);
    }
}
