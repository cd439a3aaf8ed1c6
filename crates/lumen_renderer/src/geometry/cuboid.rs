//! Rotated-box collider.
//!
//! The box keeps its own orthonormal local axes; intersection is a slab
//! test in that local frame, so rotation costs nothing extra per ray.

use crate::batch::Orientation;
use crate::geometry::{Collider, Intersection};
use lumen_math::{Mat3, Vec3, FARAWAY};

pub struct CuboidCollider {
    center: Vec3,
    half: Vec3,
    ax_w: Vec3,
    ax_h: Vec3,
    ax_l: Vec3,
}

impl CuboidCollider {
    pub fn new(center: Vec3, width: f32, height: f32, length: f32) -> Self {
        Self {
            center,
            half: Vec3::new(width / 2.0, height / 2.0, length / 2.0),
            ax_w: Vec3::X,
            ax_h: Vec3::Y,
            ax_l: Vec3::Z,
        }
    }

    /// Project a world-space offset onto the local axes.
    fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.ax_w), v.dot(self.ax_h), v.dot(self.ax_l))
    }

    fn axis(&self, i: usize) -> Vec3 {
        match i {
            0 => self.ax_w,
            1 => self.ax_h,
            _ => self.ax_l,
        }
    }
}

impl Collider for CuboidCollider {
    fn intersect(&self, origins: &[Vec3], dirs: &[Vec3]) -> Intersection {
        let count = origins.len();
        let mut distances = Vec::with_capacity(count);
        let mut orientations = Vec::with_capacity(count);

        for i in 0..count {
            let o = self.to_local(origins[i] - self.center);
            let d = self.to_local(dirs[i]);

            let mut t_near = f32::NEG_INFINITY;
            let mut t_far = f32::INFINITY;

            for axis in 0..3 {
                // Nudge axis-parallel components off exact zero, same
                // robustness choice as the plane denominator.
                let da = if d[axis] == 0.0 { 1.0e-6 } else { d[axis] };
                let inv = 1.0 / da;
                let mut t1 = (-self.half[axis] - o[axis]) * inv;
                let mut t2 = (self.half[axis] - o[axis]) * inv;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_near = t_near.max(t1);
                t_far = t_far.min(t2);
            }

            let hit = t_near <= t_far && t_far > 0.0;
            // Entry face from outside, exit face when the origin is
            // already inside the box.
            let from_outside = t_near > 0.0;

            distances.push(if hit {
                if from_outside {
                    t_near
                } else {
                    t_far
                }
            } else {
                FARAWAY
            });
            orientations.push(if from_outside {
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
        let p = self.to_local(point - self.center);
        let rel = (p / self.half).abs();

        // Snap to the face whose slab the point is closest to
        let axis = if rel.x >= rel.y && rel.x >= rel.z {
            0
        } else if rel.y >= rel.z {
            1
        } else {
            2
        };
        self.axis(axis) * p[axis].signum()
    }

    fn uv_at(&self, point: Vec3) -> (f32, f32) {
        let offset = point - self.center;
        let p = self.to_local(offset);
        let rel = (p / self.half).abs();

        // 0.985 keeps samples off the atlas-cell seams at box corners
        let proj = |x: f32, half: f32| (x / half * 0.985 + 1.0) / 2.0;
        let pw = proj(p.x, self.half.x);
        let ph = proj(p.y, self.half.y);
        let pl = proj(p.z, self.half.z);
        let neg = |v: f32| 1.0 - v;

        // 4x3 face atlas: cells indexed (u_cell, v_cell)
        let (u, v) = if rel.x >= rel.y && rel.x >= rel.z {
            if p.x > 0.0 {
                (pl + 2.0, ph + 1.0) // right
            } else {
                (neg(pl), ph + 1.0) // left
            }
        } else if rel.y >= rel.z {
            if p.y > 0.0 {
                (pw + 1.0, pl + 2.0) // top
            } else {
                (pw + 1.0, neg(pl)) // bottom
            }
        } else if p.z > 0.0 {
            (neg(pw) + 3.0, ph + 1.0) // front
        } else {
            (pw + 1.0, ph + 1.0) // back
        };

        (u / 4.0, v / 3.0)
    }

    fn rotate(&mut self, rotation: Mat3, pivot: Vec3) {
        self.ax_w = rotation * self.ax_w;
        self.ax_h = rotation * self.ax_h;
        self.ax_l = rotation * self.ax_l;
        self.center = pivot + rotation * (self.center - pivot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> CuboidCollider {
        CuboidCollider::new(Vec3::ZERO, 2.0, 2.0, 2.0)
    }

    #[test]
    fn test_hit_from_outside() {
        let cuboid = unit_box();
        let inter = cuboid.intersect(&[Vec3::new(5.0, 0.0, 0.0)], &[Vec3::new(-1.0, 0.0, 0.0)]);

        assert!((inter.distances[0] - 4.0).abs() < 1e-4);
        assert_eq!(inter.orientations[0], Orientation::Front);
    }

    #[test]
    fn test_hit_from_inside_is_back_face() {
        let cuboid = unit_box();
        let inter = cuboid.intersect(&[Vec3::ZERO], &[Vec3::X]);

        assert!((inter.distances[0] - 1.0).abs() < 1e-4);
        assert_eq!(inter.orientations[0], Orientation::Back);
    }

    #[test]
    fn test_miss_above() {
        let cuboid = unit_box();
        let inter = cuboid.intersect(&[Vec3::new(5.0, 3.0, 0.0)], &[Vec3::new(-1.0, 0.0, 0.0)]);
        assert_eq!(inter.distances[0], FARAWAY);
    }

    #[test]
    fn test_box_behind_ray_misses() {
        let cuboid = unit_box();
        let inter = cuboid.intersect(&[Vec3::new(5.0, 0.0, 0.0)], &[Vec3::X]);
        assert_eq!(inter.distances[0], FARAWAY);
    }

    #[test]
    fn test_axis_parallel_ray_is_robust() {
        // Grazing along the top face plane: must not produce NaN
        let cuboid = unit_box();
        let inter = cuboid.intersect(&[Vec3::new(5.0, 1.0, 0.0)], &[Vec3::new(-1.0, 0.0, 0.0)]);
        assert!(!inter.distances[0].is_nan());
    }

    #[test]
    fn test_rotated_box_hits_closer() {
        // 45 degrees about Y turns the +X face into an edge at sqrt(2)
        let mut cuboid = unit_box();
        cuboid.rotate(
            Mat3::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_4),
            Vec3::ZERO,
        );
        let inter = cuboid.intersect(&[Vec3::new(5.0, 0.0, 0.0)], &[Vec3::new(-1.0, 0.0, 0.0)]);

        let expected = 5.0 - 2.0_f32.sqrt();
        assert!(
            (inter.distances[0] - expected).abs() < 1e-3,
            "distance {}",
            inter.distances[0]
        );
    }

    #[test]
    fn test_normal_snaps_to_dominant_axis() {
        let cuboid = unit_box();
        let n = cuboid.normal_at(Vec3::new(1.0, 0.3, -0.2));
        assert!((n - Vec3::X).length() < 1e-6);

        let n = cuboid.normal_at(Vec3::new(0.1, -1.0, 0.4));
        assert!((n + Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_uv_within_unit_square() {
        let cuboid = unit_box();
        for p in [
            Vec3::new(1.0, 0.5, -0.5),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.2, 1.0, 0.9),
            Vec3::new(0.2, -1.0, 0.9),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ] {
            let (u, v) = cuboid.uv_at(p);
            assert!((0.0..=1.0).contains(&u), "u out of range: {u}");
            assert!((0.0..=1.0).contains(&v), "v out of range: {v}");
        }
    }

    #[test]
    fn test_distinct_faces_map_to_distinct_cells() {
        let cuboid = unit_box();
        let (u_right, _) = cuboid.uv_at(Vec3::new(1.0, 0.0, 0.0));
        let (u_left, _) = cuboid.uv_at(Vec3::new(-1.0, 0.0, 0.0));
        assert!((u_right - u_left).abs() > 0.25);
    }
}
