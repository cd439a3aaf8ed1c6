//! Scene intersection resolver.
//!
//! One `trace` call per recursion level: intersect the whole batch
//! against every collider, reduce to the nearest hit per ray, partition
//! the batch by winning collider, dispatch each partition to its
//! material, and scatter the radiance back into a full-size buffer.

use crate::batch::{Mask, Orientation, RayBatch};
use crate::geometry::{Collider, Primitive};
use crate::scene::Scene;
use lumen_math::{Vec3, FARAWAY};
use rand::RngCore;

/// A resolved nearest-hit partition, alive for one shading call.
///
/// `distances`/`orientations` are already gathered down to the sub-batch
/// the mask selected. Points, normals and UVs are derived once per
/// shading call from these.
pub struct Hit<'a> {
    pub distances: Vec<f32>,
    pub orientations: Vec<Orientation>,
    pub collider: &'a dyn Collider,
    pub primitive: &'a Primitive,
}

impl Hit<'_> {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// World-space hit points for the owning sub-batch.
    pub fn points(&self, rays: &RayBatch) -> Vec<Vec3> {
        debug_assert_eq!(rays.len(), self.len());
        (0..self.len())
            .map(|i| rays.origins()[i] + rays.dirs()[i] * self.distances[i])
            .collect()
    }

    /// Outward surface normals at the hit points.
    pub fn outward_normals(&self, points: &[Vec3]) -> Vec<Vec3> {
        points.iter().map(|&p| self.collider.normal_at(p)).collect()
    }

    /// Normals flipped toward the incident side: back-face hits see the
    /// negated outward normal.
    pub fn shading_normals(&self, points: &[Vec3]) -> Vec<Vec3> {
        self.outward_normals(points)
            .into_iter()
            .zip(&self.orientations)
            .map(|(n, &o)| match o {
                Orientation::Front => n,
                Orientation::Back => -n,
            })
            .collect()
    }

    /// Surface parameterization at the hit points.
    pub fn uvs(&self, points: &[Vec3]) -> Vec<(f32, f32)> {
        points.iter().map(|&p| self.collider.uv_at(p)).collect()
    }
}

/// Compute per-ray radiance for a batch against the whole scene.
///
/// Rays that hit nothing receive the scene background; every other ray is
/// shaded by exactly one material evaluator. The per-collider masks are
/// pairwise disjoint by construction (the first-processed collider wins
/// distance ties), and their union is exactly the set of rays with a
/// non-sentinel nearest distance.
pub fn trace(scene: &Scene, rays: &RayBatch, rng: &mut dyn RngCore) -> Vec<Vec3> {
    let n = rays.len();
    if n == 0 {
        return Vec::new();
    }

    let colliders: Vec<(&dyn Collider, &Primitive)> = scene.colliders().collect();
    let intersections: Vec<_> = colliders
        .iter()
        .map(|(c, _)| c.intersect(rays.origins(), rays.dirs()))
        .collect();

    // Elementwise minimum across colliders, remembering the winner.
    // Strict comparison keeps the first-processed collider on ties.
    let mut nearest = vec![FARAWAY; n];
    let mut winner = vec![usize::MAX; n];
    for (k, inter) in intersections.iter().enumerate() {
        for i in 0..n {
            if inter.distances[i] < nearest[i] {
                nearest[i] = inter.distances[i];
                winner[i] = k;
            }
        }
    }

    let mut color = vec![Vec3::ZERO; n];

    // Rays that escaped the scene see the background.
    for i in 0..n {
        if winner[i] == usize::MAX {
            color[i] = scene.background.radiance(rays.dirs()[i]);
        }
    }

    for (k, &(collider, primitive)) in colliders.iter().enumerate() {
        let mask = Mask::from_fn(n, |i| winner[i] == k);
        if !mask.any() {
            continue;
        }

        let sub = rays.select(&mask);
        let hit = Hit {
            distances: mask.gather(&intersections[k].distances),
            orientations: mask.gather(&intersections[k].orientations),
            collider,
            primitive,
        };

        let radiance = primitive.material.radiance(scene, &sub, &hit, rng);
        mask.scatter_add(&radiance, &mut color);
    }

    color
}

/// Grey map of nearest-hit distances, for debugging collisions.
pub fn distance_map(scene: &Scene, rays: &RayBatch) -> Vec<Vec3> {
    const MAX_DISTANCE: f32 = 10.0;

    let intersections: Vec<_> = scene
        .colliders()
        .map(|(c, _)| c.intersect(rays.origins(), rays.dirs()))
        .collect();

    (0..rays.len())
        .map(|i| {
            let nearest = intersections
                .iter()
                .map(|inter| inter.distances[i])
                .fold(FARAWAY, f32::min);
            let grey = nearest.min(MAX_DISTANCE) / MAX_DISTANCE;
            Vec3::splat(grey)
        })
        .collect()
}
