// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector4f };

use std::ops;
use std::vec::Vec;

/// RGBA float image. Used both as the host-owned accumulation framebuffer and
/// as the tone-mapped result handed to image writers.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    data: Vec<Vector4f>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector4f;

    fn index(&self, index: (usize, usize)) -> &Vector4f {
        assert!(index.0 < self.width && index.1 < self.height);
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector4f {
        assert!(index.0 < self.width && index.1 < self.height);
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(Vector4f::zeros(); pixel_number),
               width: width,
               height: height }
    }

    /// Wrap a flat `[r, g, b, a, r, g, b, a, ...]` buffer.
    pub fn from_rgba_floats(width: usize, height: usize, floats: &[Float]) -> Option<Self> {
        if floats.len() != width * height * 4 {
            return None;
        }
        let data = floats
            .chunks_exact(4)
            .map(|c| Vector4f::new(c[0], c[1], c[2], c[3]))
            .collect();
        Some(Self { data, width, height })
    }

    pub fn to_rgba_floats(&self) -> Vec<Float> {
        self.data.iter().flat_map(|p| [p.x, p.y, p.z, p.w]).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Vector4f] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [Vector4f] {
        &mut self.data
    }
}

/* Test for Bitmap */
