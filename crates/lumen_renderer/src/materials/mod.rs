//! Material evaluators.
//!
//! A material turns a resolved hit partition into per-ray radiance,
//! recursively handing any secondary ray batches back to the resolver.
//! The set is closed: diffuse, glossy, refractive, emissive.

mod diffuse;
mod emissive;
mod glossy;
mod refractive;

pub use diffuse::{Diffuse, MAX_DIFFUSE_BOUNCES};
pub use emissive::Emissive;
pub use glossy::Glossy;
pub use refractive::Refractive;

use crate::batch::RayBatch;
use crate::scene::Scene;
use crate::tracer::Hit;
use lumen_math::{Ior, Vec3};
use rand::RngCore;

/// Offset applied along the normal before spawning secondary rays, so a
/// bounce cannot immediately re-intersect the surface it left. Scenes
/// span hundreds of units in f32, so the offset has to clear the float
/// spacing at that scale.
pub const NUDGE: f32 = 1.0e-3;

/// How light leaves a surface.
///
/// `radiance` is a pure function of its inputs apart from the randomness
/// drawn from `rng`; all per-ray state lives in the batch and the hit.
pub trait Material: Send + Sync {
    /// Radiance leaving the surface toward each ray origin of the
    /// sub-batch. Returns one color per ray in `rays`.
    fn radiance(
        &self,
        scene: &Scene,
        rays: &RayBatch,
        hit: &Hit,
        rng: &mut dyn RngCore,
    ) -> Vec<Vec3>;
}

/// Mirror `v` about the unit normal `n`.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Normal-incidence reflectance per channel: `|(n1 - n2) / (n1 + n2)|²`.
pub(crate) fn schlick_f0(n1: &Ior, n2: &Ior) -> Vec3 {
    let f0 = |c: usize| {
        let a = n1.channel(c) - n2.channel(c);
        let b = n1.channel(c) + n2.channel(c);
        (a / b).norm_sqr()
    };
    Vec3::new(f0(0), f0(1), f0(2))
}

/// Schlick's approximation of the Fresnel reflectance at cosine `cos`.
#[inline]
pub(crate) fn schlick(f0: Vec3, cos: f32) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - cos).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_mirrors_about_normal() {
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(v, Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_schlick_f0_glass_air() {
        // Air to glass (n=1.5): F0 = (0.5/2.5)^2 = 0.04
        let f0 = schlick_f0(&Ior::AIR, &Ior::constant(1.5));
        assert!((f0.x - 0.04).abs() < 1e-4);
        assert!((f0.y - 0.04).abs() < 1e-4);
    }

    #[test]
    fn test_schlick_rises_to_one_at_grazing() {
        let f0 = Vec3::splat(0.04);
        let head_on = schlick(f0, 1.0);
        let grazing = schlick(f0, 0.0);
        assert!((head_on.x - 0.04).abs() < 1e-5);
        assert!((grazing.x - 1.0).abs() < 1e-5);
    }
}
