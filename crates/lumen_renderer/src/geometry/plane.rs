//! Bounded-rectangle collider.

use crate::batch::Orientation;
use crate::geometry::{Collider, Intersection};
use lumen_math::{Mat3, Vec3, FARAWAY};

/// A finite rectangle: `center` plus two in-plane unit axes and half
/// extents. The normal is `u_axis × v_axis`.
pub struct PlaneCollider {
    center: Vec3,
    u_axis: Vec3,
    v_axis: Vec3,
    normal: Vec3,
    half_w: f32,
    half_h: f32,
    uv_shift: (f32, f32),
}

impl PlaneCollider {
    pub fn new(center: Vec3, u_axis: Vec3, v_axis: Vec3, half_w: f32, half_h: f32) -> Self {
        Self {
            center,
            u_axis,
            v_axis,
            normal: u_axis.cross(v_axis).normalize(),
            half_w,
            half_h,
            uv_shift: (0.0, 0.0),
        }
    }

    /// Offset the UV cell (used when several planes share one atlas).
    pub fn with_uv_shift(mut self, shift: (f32, f32)) -> Self {
        self.uv_shift = shift;
        self
    }
}

impl Collider for PlaneCollider {
    fn intersect(&self, origins: &[Vec3], dirs: &[Vec3]) -> Intersection {
        let n = self.normal;
        let count = origins.len();
        let mut distances = Vec::with_capacity(count);
        let mut orientations = Vec::with_capacity(count);

        for i in 0..count {
            let origin = origins[i];
            let dir = dirs[i];

            // A parallel ray would give a zero denominator; nudge it
            // instead of failing.
            let mut n_dot_d = n.dot(dir);
            if n_dot_d == 0.0 {
                n_dot_d += 1.0e-6;
            }

            let n_dot_co = n.dot(self.center - origin);
            let t = n_dot_co / n_dot_d;
            let hit_point = origin + dir * t;
            let offset = hit_point - self.center;

            // Inside the rectangle, and approached from the front: the
            // signed product rejects rays that start behind the plane and
            // point away (their infinite-plane solution lies backwards),
            // which would otherwise double-hit in enclosed box scenes.
            let inside = self.u_axis.dot(offset).abs() <= self.half_w
                && self.v_axis.dot(offset).abs() <= self.half_h
                && n_dot_co * n_dot_d > 0.0;

            distances.push(if inside { t } else { FARAWAY });
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

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn uv_at(&self, point: Vec3) -> (f32, f32) {
        let offset = point - self.center;
        let u = (self.u_axis.dot(offset) / self.half_w + 1.0) / 2.0 + self.uv_shift.0;
        let v = (self.v_axis.dot(offset) / self.half_h + 1.0) / 2.0 + self.uv_shift.1;
        (u, v)
    }

    fn rotate(&mut self, rotation: Mat3, pivot: Vec3) {
        self.u_axis = rotation * self.u_axis;
        self.v_axis = rotation * self.v_axis;
        self.normal = rotation * self.normal;
        self.center = pivot + rotation * (self.center - pivot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_plane() -> PlaneCollider {
        // Horizontal rectangle at y=0, normal +Y
        PlaneCollider::new(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, -1.0), 1.0, 1.0)
    }

    #[test]
    fn test_hit_from_above_is_front() {
        let plane = floor_plane();
        let inter = plane.intersect(&[Vec3::new(0.0, 2.0, 0.0)], &[Vec3::new(0.0, -1.0, 0.0)]);

        assert!((inter.distances[0] - 2.0).abs() < 1e-5);
        assert_eq!(inter.orientations[0], Orientation::Front);
    }

    #[test]
    fn test_outside_extent_misses() {
        let plane = floor_plane();
        let inter = plane.intersect(&[Vec3::new(5.0, 2.0, 0.0)], &[Vec3::new(0.0, -1.0, 0.0)]);
        assert_eq!(inter.distances[0], FARAWAY);
    }

    #[test]
    fn test_ray_behind_pointing_away_misses() {
        // Origin below the plane, direction further down: the infinite
        // plane equation has a (negative) solution but no hit may be
        // registered.
        let plane = floor_plane();
        let inter = plane.intersect(&[Vec3::new(0.0, -1.0, 0.0)], &[Vec3::new(0.0, -1.0, 0.0)]);
        assert_eq!(inter.distances[0], FARAWAY);
    }

    #[test]
    fn test_hit_from_below_is_back() {
        let plane = floor_plane();
        let inter = plane.intersect(&[Vec3::new(0.0, -2.0, 0.0)], &[Vec3::new(0.0, 1.0, 0.0)]);

        assert!((inter.distances[0] - 2.0).abs() < 1e-5);
        assert_eq!(inter.orientations[0], Orientation::Back);
    }

    #[test]
    fn test_parallel_ray_misses_without_nan() {
        let plane = floor_plane();
        let inter = plane.intersect(&[Vec3::new(0.0, 1.0, 0.0)], &[Vec3::X]);
        assert_eq!(inter.distances[0], FARAWAY);
        assert!(!inter.distances[0].is_nan());
    }

    #[test]
    fn test_uv_center_is_half_half() {
        let plane = floor_plane();
        let (u, v) = plane.uv_at(Vec3::ZERO);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_moves_normal() {
        let mut plane = floor_plane();
        plane.rotate(Mat3::from_axis_angle(Vec3::X, std::f32::consts::FRAC_PI_2), Vec3::ZERO);

        // Normal was +Y, rotating 90 degrees about X sends it to +Z
        assert!((plane.normal_at(Vec3::ZERO) - Vec3::Z).length() < 1e-5);
    }
}
