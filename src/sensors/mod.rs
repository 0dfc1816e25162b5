// Copyright @yucwang 2026

pub mod table_lens;
pub mod thin_lens;

use crate::core::error::CameraError;
use crate::math::constants::Float;

/// Largest image extent whose packed pixel can never collide with the dead sentinel.
pub const MAX_IMAGE_EXTENT: u32 = 0xFFFF;

pub fn validate_image_size(width: u32, height: u32) -> Result<(), CameraError> {
    if width == 0 || height == 0 || width > MAX_IMAGE_EXTENT || height > MAX_IMAGE_EXTENT {
        return Err(CameraError::InvalidConfig(format!(
            "image size {}x{} is outside 1..={} per axis",
            width, height, MAX_IMAGE_EXTENT
        )));
    }
    Ok(())
}

/// Discrete pixel coordinate of a sample `u` in [0, 1) along an axis of `extent` pixels.
pub fn pixel_coordinate(extent: u32, u: Float) -> u32 {
    ((extent as Float * u) as u32).min(extent - 1)
}
