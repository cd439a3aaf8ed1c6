//! Light-emitting surface.

use std::sync::Arc;

use crate::batch::RayBatch;
use crate::materials::Material;
use crate::scene::Scene;
use crate::tracer::Hit;
use lumen_core::{SolidColor, Texture};
use lumen_math::Vec3;
use rand::RngCore;

/// Emits its color and terminates the path; emitters spawn no
/// secondary rays.
pub struct Emissive {
    texture: Arc<dyn Texture>,
}

impl Emissive {
    /// Uniform emitter. Values well above 1.0 make a bright area light.
    pub fn new(color: Vec3) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(color)),
        }
    }

    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Emissive {
    fn radiance(
        &self,
        _scene: &Scene,
        rays: &RayBatch,
        hit: &Hit,
        _rng: &mut dyn RngCore,
    ) -> Vec<Vec3> {
        let points = hit.points(rays);
        hit.uvs(&points)
            .into_iter()
            .map(|(u, v)| self.texture.sample(u, v))
            .collect()
    }
}
