//! Diffuse surface with tiered Monte-Carlo fan-out.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::batch::RayBatch;
use crate::materials::{Material, NUDGE};
use crate::sampling::{cosine_hemisphere, cosine_pdf, MIN_PDF};
use crate::scene::Scene;
use crate::tracer::{trace, Hit};
use lumen_core::{SolidColor, Texture};
use lumen_math::Vec3;
use rand::RngCore;

/// Diffuse paths terminate after this many diffuse bounces.
pub const MAX_DIFFUSE_BOUNCES: u32 = 2;

/// Lambertian surface sampled with cosine-weighted hemisphere directions.
///
/// The first diffuse bounce fans out into `sample_count` secondary rays
/// per surviving ray; later bounces spawn exactly one. That keeps the
/// tree from exploding exponentially while the wide first bounce still
/// kills most of the variance.
pub struct Diffuse {
    texture: Arc<dyn Texture>,
    sample_count: usize,
}

impl Diffuse {
    pub fn new(color: Vec3) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(color)),
            sample_count: 20,
        }
    }

    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self {
            texture,
            sample_count: 20,
        }
    }

    /// Number of secondary rays per ray on the first diffuse bounce.
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count.max(1);
        self
    }
}

impl Material for Diffuse {
    fn radiance(
        &self,
        scene: &Scene,
        rays: &RayBatch,
        hit: &Hit,
        rng: &mut dyn RngCore,
    ) -> Vec<Vec3> {
        let k = rays.len();

        // Path terminates: expected end of recursion, not an error.
        if rays.diffuse_bounces >= MAX_DIFFUSE_BOUNCES {
            return vec![Vec3::ZERO; k];
        }

        let points = hit.points(rays);
        let normals = hit.shading_normals(&points);
        let uvs = hit.uvs(&points);

        // Wide fan-out on the first diffuse bounce only.
        let fan = if rays.diffuse_bounces == 0 {
            self.sample_count
        } else {
            1
        };

        // Continue every ray from its nudged hit point, duplicated so
        // each copy can draw its own hemisphere direction.
        let nudged: Vec<Vec3> = (0..k).map(|i| points[i] + normals[i] * NUDGE).collect();
        let fanned = RayBatch::new(
            nudged,
            rays.dirs().to_vec(),
            rays.mediums().to_vec(),
            rays.depth + 1,
            rays.reflections + 1,
            rays.transmissions,
            rays.diffuse_bounces + 1,
        )
        .repeat(fan);

        let mut dirs = Vec::with_capacity(k * fan);
        let mut weights = Vec::with_capacity(k * fan);
        for j in 0..k * fan {
            let normal = normals[j / fan];
            let dir = cosine_hemisphere(normal, rng);
            let pdf = cosine_pdf(normal, dir).max(MIN_PDF);
            dirs.push(dir);
            weights.push(dir.dot(normal).clamp(0.0, 1.0) / pdf);
        }

        let bounced = fanned.with_dirs(dirs);
        let incoming = trace(scene, &bounced, rng);

        // Average the fan per source ray and apply the Lambertian BRDF.
        (0..k)
            .map(|i| {
                let mut sum = Vec3::ZERO;
                for s in 0..fan {
                    let j = i * fan + s;
                    sum += incoming[j] * weights[j];
                }
                let albedo = self.texture.sample(uvs[i].0, uvs[i].1);
                albedo / PI * (sum / fan as f32)
            })
            .collect()
    }
}
