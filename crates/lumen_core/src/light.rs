//! Light sources.
//!
//! A light answers three questions for a shading point: which way is the
//! light, how far away is it, and how much irradiance arrives given the
//! surface cosine. Occlusion is the renderer's job.

use glam::Vec3;
use lumen_math::FARAWAY;

/// A point light radiating equally in all directions.
#[derive(Clone, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

/// A directional light infinitely far away (sun-like).
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    /// Direction from the scene toward the light source (normalized at construction)
    pub direction: Vec3,
    pub color: Vec3,
}

/// A light source in the scene.
#[derive(Clone, Debug)]
pub enum Light {
    Point(PointLight),
    Directional(DirectionalLight),
}

impl Light {
    /// Create a point light.
    pub fn point(position: Vec3, color: Vec3) -> Self {
        Self::Point(PointLight { position, color })
    }

    /// Create a directional light. `direction` points from the scene toward
    /// the light and does not need to be normalized.
    pub fn directional(direction: Vec3, color: Vec3) -> Self {
        Self::Directional(DirectionalLight {
            direction: direction.normalize(),
            color,
        })
    }

    /// Unit direction from the shading point toward the light.
    pub fn direction_from(&self, point: Vec3) -> Vec3 {
        match self {
            Light::Point(l) => (l.position - point).normalize(),
            Light::Directional(l) => l.direction,
        }
    }

    /// Distance from the shading point to the light.
    pub fn distance_from(&self, point: Vec3) -> f32 {
        match self {
            Light::Point(l) => (l.position - point).length(),
            Light::Directional(_) => FARAWAY,
        }
    }

    /// Irradiance arriving at a surface with cosine `n_dot_l`, at the given
    /// distance. Point lights fall off with the inverse square.
    pub fn irradiance(&self, distance: f32, n_dot_l: f32) -> Vec3 {
        match self {
            Light::Point(l) => l.color * n_dot_l / (distance * distance),
            Light::Directional(l) => l.color * n_dot_l,
        }
    }
}
