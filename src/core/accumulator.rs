// Copyright @yucwang 2026

use crate::core::error::CameraError;
use crate::core::records::{AuxiliaryRecord, ReturnedSample};
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector4f};

pub const DISPLAY_GAMMA: Float = 2.2;

/// Adds returned radiance into a host framebuffer and tracks how many samples
/// per pixel have been contributed so far.
#[derive(Debug, Clone)]
pub struct ContributionAccumulator {
    pixel_count: f64,
    spp_done: f64,
    finished: bool,
}

impl ContributionAccumulator {
    pub fn new(width: usize, height: usize) -> Self {
        Self { pixel_count: (width * height) as f64, spp_done: 0.0, finished: false }
    }

    pub fn spp_done(&self) -> f64 {
        self.spp_done
    }

    /// Accumulate one returned block. `records` holds the auxiliary data written
    /// when these rays were generated; `None` means unit weight and no check.
    ///
    /// Panics if a stored record does not belong to the returned ray. That can
    /// only happen when generation and accumulation pass ids are misaligned.
    pub fn accumulate(
        &mut self,
        records: Option<&[AuxiliaryRecord]>,
        samples: &[ReturnedSample],
        framebuffer: &mut Bitmap,
    ) {
        let width = framebuffer.width() as u32;
        let height = framebuffer.height() as u32;
        let pixels = framebuffer.pixels_mut();

        for (i, sample) in samples.iter().enumerate() {
            let (x, y) = sample.pixel.unpack();
            if x >= width || y >= height || sample.radiance.norm_squared() == 0.0 {
                continue;
            }

            let weight = match records {
                Some(records) => {
                    let record = match records.get(i) {
                        Some(record) => record,
                        None => panic!(
                            "pipeline misaligned: returned ray {} has no auxiliary record (slot holds {})",
                            i, records.len()
                        ),
                    };
                    assert_eq!(
                        record.pixel, sample.pixel,
                        "pipeline misaligned: auxiliary record {} belongs to another ray", i
                    );
                    record.weight
                }
                None => 1.0,
            };

            let offset = (y * width + x) as usize;
            let c = sample.radiance * weight;
            pixels[offset].x += c.x;
            pixels[offset].y += c.y;
            pixels[offset].z += c.z;
        }

        // Every ray in the block counts, including skipped ones.
        self.spp_done += samples.len() as f64 / self.pixel_count;
        self.finished = false;
    }

    /// Framebuffer divided by the accumulated samples per pixel.
    pub fn normalized(&self, framebuffer: &Bitmap) -> Result<Bitmap, CameraError> {
        if self.spp_done <= 0.0 {
            return Err(CameraError::NothingAccumulated);
        }
        let norm = (1.0 / self.spp_done) as Float;
        let mut out = framebuffer.clone();
        for p in out.pixels_mut() {
            *p = Vector4f::new(p.x * norm, p.y * norm, p.z * norm, 1.0);
        }
        Ok(out)
    }

    /// Normalize, apply display gamma and clamp to [0, 1]. Finishing a second
    /// time with no contributions in between is an error.
    pub fn finish(&mut self, framebuffer: &Bitmap) -> Result<Bitmap, CameraError> {
        if self.finished {
            return Err(CameraError::AlreadyFinished);
        }
        let mut image = self.normalized(framebuffer)?;
        let inv_gamma = 1.0 / DISPLAY_GAMMA;
        let encode = |v: Float| v.max(0.0).powf(inv_gamma).min(1.0);
        for p in image.pixels_mut() {
            *p = Vector4f::new(encode(p.x), encode(p.y), encode(p.z), 1.0);
        }
        log::info!("Finished rendering at {:.3} samples per pixel.", self.spp_done);
        self.finished = true;
        Ok(image)
    }
}
