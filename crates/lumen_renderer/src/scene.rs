//! Scene description.
//!
//! Built once before rendering, read-only afterwards; everything it owns
//! is `Send + Sync`, so pixel bands can trace against it concurrently
//! without locking.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::geometry::{Collider, Primitive};
use lumen_core::{ImageTexture, Light, Texture};
use lumen_math::{Ior, Vec3};

/// What rays that escape the scene see.
pub enum Background {
    /// Uniform color (default: black)
    Color(Vec3),
    /// Vertical white-to-blue blend
    Gradient,
    /// Equirectangular environment image sampled by direction
    Panorama(Arc<ImageTexture>),
}

impl Background {
    /// Radiance along an escaping ray direction (unit length).
    pub fn radiance(&self, dir: Vec3) -> Vec3 {
        match self {
            Background::Color(c) => *c,
            Background::Gradient => {
                let a = 0.5 * (dir.y + 1.0);
                let white = Vec3::new(1.0, 1.0, 1.0);
                let blue = Vec3::new(0.5, 0.7, 1.0);
                white * (1.0 - a) + blue * a
            }
            Background::Panorama(tex) => {
                let phi = dir.z.atan2(dir.x);
                let theta = dir.y.clamp(-1.0, 1.0).asin();
                let u = (phi + PI) / (2.0 * PI);
                let v = (theta + PI / 2.0) / PI;
                tex.sample(u, v)
            }
        }
    }
}

pub struct Scene {
    primitives: Vec<Primitive>,
    pub lights: Vec<Light>,
    /// Uniform ambient term picked up by glossy surfaces
    pub ambient_color: Vec3,
    /// Refractive index of the medium the camera sits in
    pub ambient_index: Ior,
    pub background: Background,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            primitives: Vec::new(),
            lights: Vec::new(),
            ambient_color: Vec3::ZERO,
            ambient_index: Ior::AIR,
            background: Background::Color(Vec3::ZERO),
        }
    }

    /// Set the ambient color picked up by glossy surfaces.
    pub fn with_ambient_color(mut self, color: Vec3) -> Self {
        self.ambient_color = color;
        self
    }

    /// Set the refractive index of the camera's medium.
    pub fn with_ambient_index(mut self, index: Ior) -> Self {
        self.ambient_index = index;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Add a primitive to the scene.
    pub fn add(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Add a light source.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Every collider paired with its owning primitive, in insertion order.
    /// The resolver's tie-break depends on this order being stable.
    pub fn colliders(&self) -> impl Iterator<Item = (&dyn Collider, &Primitive)> {
        self.primitives
            .iter()
            .flat_map(|p| p.colliders().iter().map(move |c| (c.as_ref(), p)))
    }

    /// Colliders that occlude light rays.
    pub fn shadow_colliders(&self) -> impl Iterator<Item = &dyn Collider> {
        self.primitives
            .iter()
            .filter(|p| p.casts_shadow)
            .flat_map(|p| p.colliders().iter().map(|c| c.as_ref()))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Diffuse;

    #[test]
    fn test_gradient_background_blends_with_height() {
        let bg = Background::Gradient;
        let up = bg.radiance(Vec3::Y);
        let down = bg.radiance(-Vec3::Y);
        // Up is bluer, down is whiter
        assert!(up.x < down.x);
    }

    #[test]
    fn test_color_background_is_uniform() {
        let bg = Background::Color(Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(bg.radiance(Vec3::Y), bg.radiance(Vec3::X));
    }

    #[test]
    fn test_panorama_background_samples_by_direction() {
        // 2x2 equirect image: left half red, right half green
        let pixels = vec![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let bg = Background::Panorama(Arc::new(ImageTexture::new(2, 2, pixels, "<test>")));

        // -X wraps to u=0 (red column); +Z lands at u=0.75 (green side)
        let back = bg.radiance(Vec3::NEG_X);
        let side = bg.radiance(Vec3::Z);
        assert!(back.x > back.y);
        assert!(side.y > side.x);
    }

    #[test]
    fn test_shadow_collider_filtering() {
        let material = Arc::new(Diffuse::new(Vec3::ONE));
        let mut scene = Scene::new();
        scene.add(Primitive::sphere(Vec3::ZERO, 1.0, material.clone()));
        scene.add(Primitive::sphere(Vec3::X, 1.0, material).without_shadow());

        assert_eq!(scene.colliders().count(), 2);
        assert_eq!(scene.shadow_colliders().count(), 1);
    }
}
