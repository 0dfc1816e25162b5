// Copyright @yucwang 2026

pub mod exr_utils;
pub mod ldr_utils;

use crate::core::error::CameraError;
use crate::math::bitmap::Bitmap;

/// Receives the finished image once rendering is done.
pub trait ImageWriter {
    fn write(&mut self, image: &Bitmap) -> Result<(), CameraError>;
}

pub use exr_utils::ExrImageWriter;
pub use ldr_utils::LdrImageWriter;
