//! Sphere collider.

use crate::batch::Orientation;
use crate::geometry::{Collider, Intersection};
use lumen_math::{Mat3, Vec3, FARAWAY};
use std::f32::consts::PI;

pub struct SphereCollider {
    center: Vec3,
    radius: f32,
}

impl SphereCollider {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Collider for SphereCollider {
    fn intersect(&self, origins: &[Vec3], dirs: &[Vec3]) -> Intersection {
        let count = origins.len();
        let mut distances = Vec::with_capacity(count);
        let mut orientations = Vec::with_capacity(count);

        for i in 0..count {
            let origin = origins[i];
            let dir = dirs[i];

            // |O - C + tD|^2 = r^2
            let oc = origin - self.center;
            let a = dir.length_squared();
            let b = 2.0 * dir.dot(oc);
            let c = oc.length_squared() - self.radius * self.radius;
            let discriminant = b * b - 4.0 * a * c;

            let sqrt_d = discriminant.abs().sqrt();
            let r1 = (-b - sqrt_d) / (2.0 * a);
            let r2 = (-b + sqrt_d) / (2.0 * a);
            // Smallest positive root
            let root = if r1 > 0.0 && r1 < r2 { r1 } else { r2 };

            let hit = discriminant > 0.0 && root > 0.0;
            let point = origin + dir * root;
            let n_dot_d = ((point - self.center) / self.radius).dot(dir);

            distances.push(if hit { root } else { FARAWAY });
            orientations.push(if n_dot_d < 0.0 {
                Orientation::Front
            } else {
                Orientation::Back
            });
        }

        Intersection {
            distances,
            orientations,
        }
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radius
    }

    fn uv_at(&self, point: Vec3) -> (f32, f32) {
        let p = (point - self.center) / self.radius;
        let phi = p.z.atan2(p.x);
        let theta = p.y.clamp(-1.0, 1.0).asin();
        let u = (phi + PI) / (2.0 * PI);
        let v = (theta + PI / 2.0) / PI;
        (u, v)
    }

    fn rotate(&mut self, rotation: Mat3, pivot: Vec3) {
        self.center = pivot + rotation * (self.center - pivot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_on_hit_distance() {
        // Aimed at the center from 5 units out: first surface at 5 - r.
        let sphere = SphereCollider::new(Vec3::new(0.0, 0.0, -5.0), 2.0);
        let inter = sphere.intersect(&[Vec3::ZERO], &[Vec3::new(0.0, 0.0, -1.0)]);

        assert!((inter.distances[0] - 3.0).abs() < 1e-4);
        assert_eq!(inter.orientations[0], Orientation::Front);
    }

    #[test]
    fn test_passing_ray_misses() {
        let sphere = SphereCollider::new(Vec3::new(0.0, 0.0, -5.0), 1.0);
        // Passes 2 units above the sphere
        let inter = sphere.intersect(&[Vec3::new(0.0, 2.0, 0.0)], &[Vec3::new(0.0, 0.0, -1.0)]);

        assert_eq!(inter.distances[0], FARAWAY);
    }

    #[test]
    fn test_ray_from_inside_hits_back_face() {
        let sphere = SphereCollider::new(Vec3::ZERO, 2.0);
        let inter = sphere.intersect(&[Vec3::ZERO], &[Vec3::X]);

        assert!((inter.distances[0] - 2.0).abs() < 1e-4);
        assert_eq!(inter.orientations[0], Orientation::Back);
    }

    #[test]
    fn test_sphere_behind_ray_misses() {
        let sphere = SphereCollider::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let inter = sphere.intersect(&[Vec3::ZERO], &[Vec3::new(0.0, 0.0, -1.0)]);
        assert_eq!(inter.distances[0], FARAWAY);
    }

    #[test]
    fn test_batch_mixes_hits_and_misses() {
        let sphere = SphereCollider::new(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let origins = [Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)];
        let dirs = [Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0)];
        let inter = sphere.intersect(&origins, &dirs);

        assert!(inter.distances[0] < FARAWAY);
        assert_eq!(inter.distances[1], FARAWAY);
    }

    #[test]
    fn test_normal_is_unit_outward() {
        let sphere = SphereCollider::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
        let n = sphere.normal_at(Vec3::new(3.0, 0.0, 0.0));
        assert!((n - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_uv_poles() {
        let sphere = SphereCollider::new(Vec3::ZERO, 1.0);
        let (_, v_top) = sphere.uv_at(Vec3::Y);
        let (_, v_bottom) = sphere.uv_at(-Vec3::Y);
        assert!((v_top - 1.0).abs() < 1e-5);
        assert!(v_bottom.abs() < 1e-5);
    }
}
