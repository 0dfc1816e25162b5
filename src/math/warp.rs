// Copyright @yucwang 2023

use super::constants::{ PI, Float, Vector2f };

/// Shirley's concentric mapping of the unit square onto the unit disc.
pub fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    let phi: Float;
    let r:   Float;

    if r1 == 0. && r2 == 0. {
        r = 0.0;
        phi = 0.0;
    } else if r1 * r1 > r2 * r2 {
        r = r1;
        phi = (PI / 4.0) * (r2 / r1);
    } else {
        r = r2;
        phi = (PI / 2.0) - (r1 / r2) * (PI / 4.0);
    }

    let (sin_phi, cos_phi) = phi.sin_cos();

    return Vector2f::new(r * cos_phi, r * sin_phi)
}

/// Area-preserving map of a square centered at the origin, `[-0.5, 0.5]^2`,
/// onto the disc of radius 0.5.
pub fn map_samples_to_disc(xy: &Vector2f) -> Vector2f {
    let u = Vector2f::new(xy.x + 0.5, xy.y + 0.5);
    sample_uniform_disk_concentric(&u) * 0.5
}
