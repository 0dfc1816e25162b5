// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

/// Pixel coordinate packed into 32 bits: x in the low half, y in the high half.
/// All ones marks a ray whose contribution must be discarded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedPixel(u32);

impl PackedPixel {
    pub const DEAD: PackedPixel = PackedPixel(0xFFFF_FFFF);

    pub fn pack(x: u32, y: u32) -> Self {
        PackedPixel((y << 16) | (x & 0x0000_FFFF))
    }

    pub fn unpack(self) -> (u32, u32) {
        (self.0 & 0x0000_FFFF, (self.0 & 0xFFFF_0000) >> 16)
    }

    pub fn from_bits(bits: u32) -> Self {
        PackedPixel(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_dead(self) -> bool {
        self == Self::DEAD
    }

    /// Bit-reinterpret as a float so the index can travel in an alpha channel.
    pub fn to_float(self) -> Float {
        Float::from_bits(self.0)
    }

    pub fn from_float(v: Float) -> Self {
        PackedPixel(v.to_bits())
    }
}

/// First half of an emitted ray: origin plus the packed pixel it belongs to.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RayOriginRecord {
    pub origin: Vector3f,
    pub pixel: PackedPixel,
}

impl RayOriginRecord {
    pub fn to_floats(&self) -> [Float; 4] {
        [self.origin.x, self.origin.y, self.origin.z, self.pixel.to_float()]
    }

    pub fn from_floats(v: &[Float; 4]) -> Self {
        Self { origin: Vector3f::new(v[0], v[1], v[2]), pixel: PackedPixel::from_float(v[3]) }
    }
}

/// Second half of an emitted ray. The fourth float on the wire is padding.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RayDirectionRecord {
    pub direction: Vector3f,
}

impl RayDirectionRecord {
    pub fn to_floats(&self) -> [Float; 4] {
        [self.direction.x, self.direction.y, self.direction.z, 0.0]
    }

    pub fn from_floats(v: &[Float; 4]) -> Self {
        Self { direction: Vector3f::new(v[0], v[1], v[2]) }
    }
}

/// Per-ray data kept back until the ray's radiance returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuxiliaryRecord {
    /// cos^4 falloff weight.
    pub weight: Float,
    pub pixel: PackedPixel,
}

impl Default for AuxiliaryRecord {
    fn default() -> Self {
        Self { weight: 1.0, pixel: PackedPixel::default() }
    }
}

/// Radiance returned by the host for one ray, tagged with the ray's pixel.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ReturnedSample {
    pub radiance: Vector3f,
    pub pixel: PackedPixel,
}

impl ReturnedSample {
    pub fn new(radiance: Vector3f, pixel: PackedPixel) -> Self {
        Self { radiance, pixel }
    }

    /// Decode an RGBA sample whose alpha holds the packed pixel bits.
    pub fn from_rgba(v: &[Float; 4]) -> Self {
        Self { radiance: Vector3f::new(v[0], v[1], v[2]), pixel: PackedPixel::from_float(v[3]) }
    }

    pub fn to_rgba(&self) -> [Float; 4] {
        [self.radiance.x, self.radiance.y, self.radiance.z, self.pixel.to_float()]
    }

    pub fn from_rgba_floats(floats: &[Float]) -> Vec<Self> {
        floats
            .chunks_exact(4)
            .map(|c| Self::from_rgba(&[c[0], c[1], c[2], c[3]]))
            .collect()
    }
}

/// One block of generated rays, in ray-index order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RayBlock {
    pub origins: Vec<RayOriginRecord>,
    pub directions: Vec<RayDirectionRecord>,
}

impl RayBlock {
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let coords = [0u32, 1, 2, 255, 256, 1023, 32767, 32768, 65534, 65535];
        for &x in coords.iter() {
            for &y in coords.iter() {
                assert_eq!(PackedPixel::pack(x, y).unpack(), (x, y));
            }
        }
        for x in (0..65536u32).step_by(97) {
            let y = 65535 - x;
            assert_eq!(PackedPixel::pack(x, y).unpack(), (x, y));
        }
    }

    #[test]
    fn test_pack_layout_and_sentinel() {
        assert_eq!(PackedPixel::pack(3, 2).bits(), 0x0002_0003);
        assert!(PackedPixel::DEAD.is_dead());
        assert_eq!(PackedPixel::DEAD.unpack(), (65535, 65535));
        assert!(!PackedPixel::pack(10, 20).is_dead());
    }

    #[test]
    fn test_pixel_survives_alpha_channel() {
        for &bits in &[0u32, 0x0002_0003, 0x0400_0280, 0xFFFF_FFFF] {
            let sample = ReturnedSample::new(Vector3f::new(1.0, 2.0, 3.0), PackedPixel::from_bits(bits));
            let decoded = ReturnedSample::from_rgba(&sample.to_rgba());
            assert_eq!(decoded.pixel.bits(), bits);
            assert_eq!(decoded.radiance, sample.radiance);
        }
    }

    #[test]
    fn test_samples_from_flat_rgba() {
        let floats = [
            0.5, 0.25, 0.0, PackedPixel::pack(7, 9).to_float(),
            1.0, 1.0, 1.0, PackedPixel::DEAD.to_float(),
            9.0, 9.0,
        ];
        let samples = ReturnedSample::from_rgba_floats(&floats);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].pixel.unpack(), (7, 9));
        assert_eq!(samples[0].radiance, Vector3f::new(0.5, 0.25, 0.0));
        assert!(samples[1].pixel.is_dead());
    }

    #[test]
    fn test_ray_records_wire_layout() {
        let origin = RayOriginRecord { origin: Vector3f::new(1.0, 2.0, 3.0), pixel: PackedPixel::pack(4, 5) };
        let floats = origin.to_floats();
        assert_eq!(floats[3].to_bits(), 0x0005_0004);
        assert_eq!(RayOriginRecord::from_floats(&floats), origin);

        let direction = RayDirectionRecord { direction: Vector3f::new(0.0, 0.0, -1.0) };
        assert_eq!(direction.to_floats()[3], 0.0);
        assert_eq!(RayDirectionRecord::from_floats(&direction.to_floats()), direction);
    }
}
