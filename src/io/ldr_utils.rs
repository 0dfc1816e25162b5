// Copyright @yucwang 2026

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::core::error::CameraError;
use crate::io::ImageWriter;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;

fn to_byte(v: Float) -> u8 {
    (v.max(0.0).min(1.0) * 255.0) as u8
}

/// 8-bit RGB copy of a display-ready bitmap.
pub fn to_rgb_image(image: &Bitmap) -> RgbImage {
    RgbImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        let p = image[(x as usize, y as usize)];
        Rgb([to_byte(p.x), to_byte(p.y), to_byte(p.z)])
    })
}

/// Write an 8-bit image; the format (BMP, PNG, ...) follows the file extension.
pub fn write_ldr_to_file<P: AsRef<Path>>(image: &Bitmap, path: P) -> Result<(), CameraError> {
    log::info!("Writing image: {}.", path.as_ref().display());
    to_rgb_image(image).save(path.as_ref())?;
    Ok(())
}

pub struct LdrImageWriter {
    path: PathBuf,
}

impl LdrImageWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl ImageWriter for LdrImageWriter {
    fn write(&mut self, image: &Bitmap) -> Result<(), CameraError> {
        write_ldr_to_file(image, &self.path)
    }
}
