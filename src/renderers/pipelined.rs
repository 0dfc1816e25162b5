// Copyright @yucwang 2026

use std::collections::VecDeque;

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::pipeline::PipelineConfig;
use crate::core::records::ReturnedSample;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;

pub use super::renderer::{RayShader, Renderer};

/// Runs generation passes while keeping `latency` shaded blocks in flight.
/// The block generated in pass `g` is accumulated under pass id `g + latency`.
pub struct PipelinedRenderer {
    shader: Box<dyn RayShader>,
    pipeline: PipelineConfig,
    passes: u32,
    block_size: usize,
}

impl PipelinedRenderer {
    pub fn new(shader: Box<dyn RayShader>, pipeline: PipelineConfig, passes: u32, block_size: usize) -> Self {
        Self { shader, pipeline, passes, block_size }
    }
}

impl Renderer for PipelinedRenderer {
    fn render(&self, sensor: &mut Sensor, framebuffer: &mut Bitmap) {
        let latency = self.pipeline.latency as u32;
        let progress = ProgressBar::new(self.passes as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} passes")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut in_flight: VecDeque<(u32, Vec<ReturnedSample>)> = VecDeque::new();
        for pass in 0..self.passes {
            let rays = sensor.generate_rays(self.block_size, pass);
            in_flight.push_back((pass, self.shader.shade(&rays)));
            if in_flight.len() > latency as usize {
                if let Some((generated, samples)) = in_flight.pop_front() {
                    sensor.add_contribution(generated + latency, &samples, framebuffer);
                }
            }
            progress.inc(1);
        }
        while let Some((generated, samples)) = in_flight.pop_front() {
            sensor.add_contribution(generated + latency, &samples, framebuffer);
        }
        progress.finish_and_clear();

        log::info!("{} after {} passes, {:.3} spp.", sensor.describe(), self.passes, sensor.spp_done());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::camera_loader::parse_camera_str;
    use crate::core::sampler::HaltonSource;
    use crate::core::sensor::SensorKind;
    use crate::math::constants::Float;
    use crate::renderers::backdrop::BackdropRenderer;

    const IDENTITY: [Float; 16] = [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];

    const STOP_AND_SPHERE: &str = r#"
        <camera name="test">
          <optical_system sensor_diagonal="1.0" order="sensor_to_scene">
            <line id="0" curvature_radius="0" thickness="1.0" ior="0" aperture_radius="2.0"/>
            <line id="1" curvature_radius="5.0" thickness="2.0" ior="1.5" aperture_radius="3.0"/>
          </optical_system>
        </camera>"#;

    fn render_with(depth: usize, latency: usize) -> (Sensor, Bitmap) {
        let document = parse_camera_str(STOP_AND_SPHERE).unwrap();
        let config = PipelineConfig::new(depth, latency).unwrap();
        let mut sensor = Sensor::configure(
            SensorKind::TableLens, 32, 24, &IDENTITY, &document, config, Box::new(HaltonSource::new(5)),
        )
        .unwrap();
        let mut framebuffer = Bitmap::new(32, 24);
        let renderer = PipelinedRenderer::new(Box::new(BackdropRenderer::default()), config, 7, 384);
        renderer.render(&mut sensor, &mut framebuffer);
        (sensor, framebuffer)
    }

    #[test]
    fn test_pipelined_render_stays_aligned() {
        let (sensor, framebuffer) = render_with(4, 2);
        assert!((sensor.spp_done() - 7.0 * 384.0 / (32.0 * 24.0)).abs() < 1e-9);
        assert!(framebuffer.pixels().iter().any(|p| p.x > 0.0));
    }

    #[test]
    fn test_latency_does_not_change_the_image() {
        let (_, immediate) = render_with(1, 0);
        let (_, delayed) = render_with(3, 2);
        for (a, b) in immediate.pixels().iter().zip(delayed.pixels().iter()) {
            assert!((a - b).norm() < 1e-4);
        }
    }

    #[test]
    fn test_thin_lens_render_finishes() {
        let document = parse_camera_str("<camera/>").unwrap();
        let config = PipelineConfig::new(2, 1).unwrap();
        let mut sensor = Sensor::configure(
            SensorKind::ThinLens, 16, 16, &IDENTITY, &document, config, Box::new(HaltonSource::new(1)),
        )
        .unwrap();
        let mut framebuffer = Bitmap::new(16, 16);
        PipelinedRenderer::new(Box::new(BackdropRenderer::default()), config, 4, 256).render(&mut sensor, &mut framebuffer);
        let image = sensor.finish(&framebuffer).unwrap();
        assert!(image.pixels().iter().all(|p| p.x >= 0.0 && p.x <= 1.0 && p.w == 1.0));
    }
}
