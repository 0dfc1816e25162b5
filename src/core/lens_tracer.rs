// Copyright @yucwang 2026

use crate::core::lens::LensStack;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;

/// Why a film ray did not make it out of the front element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFailure {
    EmptyStack,
    /// The ray reached a stop travelling back toward the film.
    StopDirection { element: usize },
    Miss { element: usize },
    BehindOrigin { element: usize },
    ApertureClip { element: usize },
    TotalInternalReflection { element: usize },
}

/// Receives every interface hit in lens space, before the aperture test.
pub trait TraceObserver {
    fn on_interface_hit(&mut self, _element: usize, _p_hit: &Vector3f) {}
}

impl TraceObserver for () {}

#[derive(Debug, Default, Clone)]
pub struct HitRecorder {
    pub hits: Vec<(usize, Vector3f)>,
}

impl TraceObserver for HitRecorder {
    fn on_interface_hit(&mut self, element: usize, p_hit: &Vector3f) {
        self.hits.push((element, *p_hit));
    }
}

/// Roots of `a t^2 + b t + c`, sorted. The discriminant is evaluated in f64.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    if a == 0.0 {
        return None;
    }
    let discrim = (b as f64) * (b as f64) - 4.0 * (a as f64) * (c as f64);
    if discrim < 0.0 {
        return None;
    }
    let root_discrim = discrim.sqrt() as Float;
    let q = if b < 0.0 {
        -0.5 * (b - root_discrim)
    } else {
        -0.5 * (b + root_discrim)
    };
    let mut t0 = q / a;
    let mut t1 = c / q;
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }
    Some((t0, t1))
}

/// Snell refraction of `wi` (pointing away from the surface) about `n`,
/// `eta = eta_i / eta_t`. `None` on total internal reflection.
pub fn refract(wi: &Vector3f, n: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_theta_i = n.dot(wi);
    let sin2_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0);
    let sin2_theta_t = eta * eta * sin2_theta_i;
    if sin2_theta_t >= 1.0 {
        return None;
    }
    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();
    Some(-*wi * eta + *n * (eta * cos_theta_i - cos_theta_t))
}

fn face_forward(n: Vector3f, v: Vector3f) -> Vector3f {
    if n.dot(&v) < 0.0 { -n } else { n }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SphereHit {
    Hit(Float, Vector3f),
    Miss,
    Behind,
}

fn intersect_spherical_element(radius: Float, z_center: Float, ray: &Ray3f) -> SphereHit {
    let o = ray.origin() - Vector3f::new(0.0, 0.0, z_center);
    let d = ray.dir();
    let a = d.dot(&d);
    let b = 2.0 * d.dot(&o);
    let c = o.dot(&o) - radius * radius;
    let (t0, t1) = match quadratic(a, b, c) {
        Some(roots) => roots,
        None => return SphereHit::Miss,
    };

    // Which root is the lens surface depends on travel direction and on
    // whether the surface is convex or concave toward the ray.
    let use_closer_t = (d.z > 0.0) ^ (radius < 0.0);
    let t = if use_closer_t { t0.min(t1) } else { t0.max(t1) };
    if t < 0.0 {
        return SphereHit::Behind;
    }

    let n = (o + d * t).normalize();
    SphereHit::Hit(t, face_forward(n, -d))
}

impl LensStack {
    /// Trace a camera-space ray leaving the film through every interface,
    /// rear to front. Returns the exit ray in camera space.
    pub fn trace_from_film(&self, ray: &Ray3f) -> Result<Ray3f, TraceFailure> {
        self.trace_from_film_with(ray, &mut ())
    }

    pub fn trace_from_film_with<O: TraceObserver + ?Sized>(
        &self,
        ray: &Ray3f,
        observer: &mut O,
    ) -> Result<Ray3f, TraceFailure> {
        let elements = self.interfaces();
        if elements.is_empty() {
            return Err(TraceFailure::EmptyStack);
        }

        let mut r_lens = ray.flip_z();
        let mut element_z: Float = 0.0;
        for (i, element) in elements.iter().enumerate() {
            element_z -= element.thickness;

            let is_stop = element.is_stop();
            let (t, n) = if is_stop {
                // A refraction upstream can send the ray back toward the film.
                if r_lens.dir().z >= 0.0 {
                    return Err(TraceFailure::StopDirection { element: i });
                }
                ((element_z - r_lens.origin().z) / r_lens.dir().z, Vector3f::zeros())
            } else {
                let radius = element.curvature_radius;
                let z_center = element_z + radius;
                match intersect_spherical_element(radius, z_center, &r_lens) {
                    SphereHit::Hit(t, n) => (t, n),
                    SphereHit::Miss => return Err(TraceFailure::Miss { element: i }),
                    SphereHit::Behind => return Err(TraceFailure::BehindOrigin { element: i }),
                }
            };

            let p_hit = r_lens.at(t);
            observer.on_interface_hit(i, &p_hit);
            let r2 = p_hit.x * p_hit.x + p_hit.y * p_hit.y;
            if r2 > element.aperture_radius * element.aperture_radius {
                return Err(TraceFailure::ApertureClip { element: i });
            }

            let mut dir = r_lens.dir();
            if !is_stop {
                let eta_i = element.medium_eta();
                let eta_t = elements.get(i + 1).map_or(1.0, |next| next.medium_eta());
                dir = match refract(&(-dir).normalize(), &n, eta_i / eta_t) {
                    Some(wt) => wt,
                    None => return Err(TraceFailure::TotalInternalReflection { element: i }),
                };
            }
            r_lens = Ray3f::new(p_hit, dir);
        }

        Ok(r_lens.flip_z())
    }
}
