// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// A ray with an unnormalized direction. Lens tracing keeps the direction
/// exactly as refraction produced it, so normalization is left to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f) -> Self {
        Self { origin: o, dir: d }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    pub fn normalized(&self) -> Self {
        Self { origin: self.origin, dir: self.dir.normalize() }
    }

    /// Mirror the ray through the z = 0 plane. Camera space looks down -z while
    /// the lens stack is modelled with +z pointing at the scene.
    pub fn flip_z(&self) -> Self {
        Self {
            origin: Vector3f::new(self.origin.x, self.origin.y, -self.origin.z),
            dir: Vector3f::new(self.dir.x, self.dir.y, -self.dir.z),
        }
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::Vector3f;
    use super::Ray3f;

    #[test]
    fn test_ray3f() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 1.0);
        let ray = Ray3f::new(o, d);
        assert_eq!(o, ray.origin());
        assert_eq!(d, ray.dir());

        let v1 = ray.at(2.0);
        assert!((v1[0] - 2.0).abs() < 1e-6);
        assert!((v1[1] - 0.0).abs() < 1e-6);
        assert!((v1[2] - 2.0).abs() < 1e-6);

        let n = ray.normalized();
        assert!((n.dir().norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_flip_z_is_involution() {
        let ray = Ray3f::new(Vector3f::new(1.0, 2.0, 3.0), Vector3f::new(-0.5, 0.25, 1.0));
        let flipped = ray.flip_z();
        assert_eq!(flipped.origin(), Vector3f::new(1.0, 2.0, -3.0));
        assert_eq!(flipped.dir(), Vector3f::new(-0.5, 0.25, -1.0));
        assert_eq!(flipped.flip_z(), ray);
    }
}
