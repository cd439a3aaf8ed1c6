//! Random direction sampling.
//!
//! All randomness is drawn through `RngCore`, so callers control seeding
//! and determinism.

use lumen_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

/// Smallest pdf value the estimators divide by.
pub const MIN_PDF: f32 = 1.0e-6;

/// Uniform f32 in [0, 1) from the upper bits of a u32 draw.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
}

/// Orthonormal tangent/bitangent pair around a unit vector.
fn orthonormal_basis(w: Vec3) -> (Vec3, Vec3) {
    let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
    let v = w.cross(a).normalize();
    let u = w.cross(v);
    (u, v)
}

/// Draw a direction from the cosine-weighted hemisphere around `normal`.
pub fn cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let u1 = gen_f32(rng);
    let u2 = gen_f32(rng);

    let r = u1.sqrt();
    let phi = 2.0 * PI * u2;
    let x = r * phi.cos();
    let y = r * phi.sin();
    let z = (1.0 - u1).max(0.0).sqrt();

    let (t, b) = orthonormal_basis(normal);
    (t * x + b * y + normal * z).normalize()
}

/// Density of `cosine_hemisphere` at `dir`: `max(N·L, 0) / π`.
#[inline]
pub fn cosine_pdf(normal: Vec3, dir: Vec3) -> f32 {
    normal.dot(dir).max(0.0) / PI
}

/// Sample a random point in the unit disk.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> (f32, f32) {
    loop {
        let x = gen_f32(rng) * 2.0 - 1.0;
        let y = gen_f32(rng) * 2.0 - 1.0;
        if x * x + y * y < 1.0 {
            return (x, y);
        }
    }
}
