/* Copyright 2020 @TwoCookingMice */

use std::path::{Path, PathBuf};

use exr::prelude::*;

use crate::core::error::CameraError;
use crate::io::ImageWriter;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Vector4f;

// Read the first RGBA layer of an EXR image.
pub fn read_exr_from_file<P: AsRef<Path>>(file_path: P) -> std::result::Result<Bitmap, CameraError> {
    log::info!("Starting reading OpenEXR image from: {}.", file_path.as_ref().display());

    let image = read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _| Bitmap::new(resolution.width(), resolution.height()),
            |bitmap: &mut Bitmap, position, (r, g, b, a): (f32, f32, f32, f32)| {
                bitmap[(position.x(), position.y())] = Vector4f::new(r, g, b, a);
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(file_path.as_ref())
        .map_err(|e| CameraError::Exr(e.to_string()))?;

    let bitmap = image.layer_data.channel_data.pixels;
    log::info!("OpenEXR loaded, width = {}, height = {}.", bitmap.width(), bitmap.height());
    Ok(bitmap)
}

// Write the RGB channels of a linear image.
pub fn write_exr_to_file<P: AsRef<Path>>(image: &Bitmap, file_path: P) -> std::result::Result<(), CameraError> {
    log::info!("Starting writing openexr images: {}.", file_path.as_ref().display());

    write_rgb_file(file_path.as_ref(), image.width(), image.height(), |x, y| {
        let p = image[(x, y)];
        (p.x, p.y, p.z)
    })
    .map_err(|e| CameraError::Exr(e.to_string()))
}

pub struct ExrImageWriter {
    path: PathBuf,
}

impl ExrImageWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl ImageWriter for ExrImageWriter {
    fn write(&mut self, image: &Bitmap) -> std::result::Result<(), CameraError> {
        write_exr_to_file(image, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_values_survive() {
        let path = std::env::temp_dir().join(format!("tablelens_hdr_{}.exr", std::process::id()));
        let mut bmp = Bitmap::new(3, 2);
        bmp[(0, 0)] = Vector4f::new(4.5, 0.25, 0.0, 1.0);
        bmp[(2, 1)] = Vector4f::new(0.0, 12.0, 1.0, 1.0);

        ExrImageWriter::new(&path).write(&bmp).unwrap();
        let loaded = read_exr_from_file(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (3, 2));
        assert_eq!(loaded[(0, 0)].x, 4.5);
        assert_eq!(loaded[(0, 0)].y, 0.25);
        assert_eq!(loaded[(2, 1)].y, 12.0);
        let _ = std::fs::remove_file(&path);
    }
}
