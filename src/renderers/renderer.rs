// Copyright @yucwang 2021

use crate::core::records::{RayBlock, ReturnedSample};
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;

/// Host side of the ray exchange: radiance for every ray in a block, in ray order,
/// each sample tagged with its ray's packed pixel.
pub trait RayShader: Sync {
    fn shade(&self, rays: &RayBlock) -> Vec<ReturnedSample>;
}

pub trait Renderer {
    fn render(&self, sensor: &mut Sensor, framebuffer: &mut Bitmap);
}
