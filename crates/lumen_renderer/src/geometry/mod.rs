//! Collider geometry.
//!
//! A `Collider` answers intersection queries for a whole ray batch at
//! once, returning per-ray (distance, orientation) pairs with the
//! `FARAWAY` sentinel for misses. A `Primitive` ties colliders to a
//! material and per-primitive render settings; a primitive may own
//! several colliders, though each current shape contributes exactly one.

mod cuboid;
mod plane;
mod sphere;

pub use cuboid::CuboidCollider;
pub use plane::PlaneCollider;
pub use sphere::SphereCollider;

use std::sync::Arc;

use crate::batch::Orientation;
use crate::materials::Material;
use lumen_math::{Mat3, Vec3};

/// Default per-primitive recursion ceiling.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Per-batch intersection result: one (distance, orientation) pair per ray.
///
/// Distance is `FARAWAY` for misses; the orientation is still the value
/// the intersection math produced, so it is always defined.
#[derive(Debug, Clone)]
pub struct Intersection {
    pub distances: Vec<f32>,
    pub orientations: Vec<Orientation>,
}

/// A shape that can intersect a ray batch.
pub trait Collider: Send + Sync {
    /// Intersect every ray in the batch. `dirs` are unit length.
    fn intersect(&self, origins: &[Vec3], dirs: &[Vec3]) -> Intersection;

    /// Outward surface normal at a resolved hit point.
    fn normal_at(&self, point: Vec3) -> Vec3;

    /// Surface parameterization at a resolved hit point.
    fn uv_at(&self, point: Vec3) -> (f32, f32);

    /// Rotate the collider about `pivot`.
    fn rotate(&mut self, rotation: Mat3, pivot: Vec3);
}

/// A renderable object: colliders plus material and render settings.
pub struct Primitive {
    colliders: Vec<Box<dyn Collider>>,
    pub material: Arc<dyn Material>,
    pub center: Vec3,
    /// Recursion ceiling for rays spawned off this primitive
    pub max_depth: u32,
    /// Whether this primitive occludes light rays
    pub casts_shadow: bool,
}

impl Primitive {
    fn new(colliders: Vec<Box<dyn Collider>>, material: Arc<dyn Material>, center: Vec3) -> Self {
        Self {
            colliders,
            material,
            center,
            max_depth: DEFAULT_MAX_DEPTH,
            casts_shadow: true,
        }
    }

    /// A sphere at `center` with the given radius.
    pub fn sphere(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self::new(
            vec![Box::new(SphereCollider::new(center, radius))],
            material,
            center,
        )
    }

    /// A bounded rectangle spanned by `u_axis`/`v_axis` around `center`.
    pub fn plane(
        center: Vec3,
        width: f32,
        height: f32,
        u_axis: Vec3,
        v_axis: Vec3,
        material: Arc<dyn Material>,
    ) -> Self {
        Self::new(
            vec![Box::new(PlaneCollider::new(
                center,
                u_axis,
                v_axis,
                width / 2.0,
                height / 2.0,
            ))],
            material,
            center,
        )
    }

    /// An axis-aligned box around `center`; rotate it with [`Primitive::rotated`].
    pub fn cuboid(
        center: Vec3,
        width: f32,
        height: f32,
        length: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self::new(
            vec![Box::new(CuboidCollider::new(center, width, height, length))],
            material,
            center,
        )
    }

    /// Set the recursion ceiling for rays spawned off this primitive.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Exclude this primitive from shadow ray tests.
    pub fn without_shadow(mut self) -> Self {
        self.casts_shadow = false;
        self
    }

    /// Rotate the primitive by `degrees` about the axis through its center.
    pub fn rotated(mut self, degrees: f32, axis: Vec3) -> Self {
        let rotation = Mat3::from_axis_angle(axis.normalize(), degrees.to_radians());
        for collider in &mut self.colliders {
            collider.rotate(rotation, self.center);
        }
        self
    }

    pub fn colliders(&self) -> &[Box<dyn Collider>] {
        &self.colliders
    }
}
