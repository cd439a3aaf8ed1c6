//! Glossy surface: direct lighting with a Cook-Torrance specular lobe
//! plus one mirror bounce.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::batch::RayBatch;
use crate::materials::{reflect, schlick, schlick_f0, Material, NUDGE};
use crate::scene::Scene;
use crate::tracer::{trace, Hit};
use lumen_core::{SolidColor, Texture};
use lumen_math::{Ior, Vec3, FARAWAY};
use rand::RngCore;

/// Diffuse-plus-specular surface lit directly by the scene lights.
///
/// The specular lobe uses one consistent microfacet formulation:
/// Schlick Fresnel, Blinn-Phong normal distribution and Schlick-Beckmann
/// geometry with `k = roughness / 2`.
pub struct Glossy {
    texture: Arc<dyn Texture>,
    roughness: f32,
    spec_coeff: f32,
    diff_coeff: f32,
    ior: Ior,
}

impl Glossy {
    pub fn new(color: Vec3, roughness: f32, spec_coeff: f32, diff_coeff: f32, ior: Ior) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(color)),
            roughness,
            spec_coeff,
            diff_coeff,
            ior,
        }
    }

    pub fn textured(
        texture: Arc<dyn Texture>,
        roughness: f32,
        spec_coeff: f32,
        diff_coeff: f32,
        ior: Ior,
    ) -> Self {
        Self {
            texture,
            roughness,
            spec_coeff,
            diff_coeff,
            ior,
        }
    }
}

impl Material for Glossy {
    fn radiance(
        &self,
        scene: &Scene,
        rays: &RayBatch,
        hit: &Hit,
        rng: &mut dyn RngCore,
    ) -> Vec<Vec3> {
        let k = rays.len();
        let points = hit.points(rays);
        let normals = hit.shading_normals(&points);
        let uvs = hit.uvs(&points);

        let albedo: Vec<Vec3> = uvs
            .iter()
            .map(|&(u, v)| self.texture.sample(u, v) * self.diff_coeff)
            .collect();

        let mut color: Vec<Vec3> = albedo.iter().map(|&a| scene.ambient_color * a).collect();

        let views: Vec<Vec3> = rays.dirs().iter().map(|&d| -d).collect();
        let nudged: Vec<Vec3> = (0..k).map(|i| points[i] + normals[i] * NUDGE).collect();

        let shadow_colliders: Vec<_> = scene.shadow_colliders().collect();

        for light in &scene.lights {
            let l_dirs: Vec<Vec3> = points.iter().map(|&p| light.direction_from(p)).collect();
            let l_dists: Vec<f32> = points.iter().map(|&p| light.distance_from(p)).collect();

            // A point sees the light iff nothing shadow-casting sits
            // between them. No shadow casters means fully visible.
            let visible: Vec<f32> = if shadow_colliders.is_empty() {
                vec![1.0; k]
            } else {
                let mut nearest = vec![FARAWAY; k];
                for collider in &shadow_colliders {
                    let inter = collider.intersect(&nudged, &l_dirs);
                    for i in 0..k {
                        nearest[i] = nearest[i].min(inter.distances[i]);
                    }
                }
                (0..k)
                    .map(|i| if nearest[i] >= l_dists[i] { 1.0 } else { 0.0 })
                    .collect()
            };

            for i in 0..k {
                let normal = normals[i];
                let l = l_dirs[i];
                let n_dot_l = normal.dot(l).max(0.0);
                let irradiance = light.irradiance(l_dists[i], n_dot_l);

                // Lambert term
                color[i] += albedo[i] * irradiance * visible[i];

                if self.roughness != 0.0 {
                    let view = views[i];
                    let half = (l + view).normalize();
                    let n_dot_h = normal.dot(half).clamp(0.0, 1.0);
                    let v_dot_h = view.dot(half).clamp(0.0, 1.0);
                    let n_dot_v = normal.dot(view).clamp(0.0, 1.0);

                    let f = schlick(schlick_f0(&rays.mediums()[i], &self.ior), v_dot_h);

                    let r2 = self.roughness * self.roughness;
                    let power = 2.0 / r2 - 2.0;
                    let dist = n_dot_h.powf(power) / (PI * r2);

                    let half_r = self.roughness / 2.0;
                    let geom = n_dot_v / (n_dot_v * (1.0 - half_r) + half_r);

                    let spec =
                        f * geom * dist * self.spec_coeff / (4.0 * (n_dot_v * n_dot_l).clamp(1e-3, 1.0));
                    color[i] += spec * irradiance * visible[i];
                }
            }
        }

        // One mirror bounce, weighted by the Fresnel reflectance between
        // the ambient medium and this material.
        if rays.depth < hit.primitive.max_depth {
            let f0 = schlick_f0(&scene.ambient_index, &self.ior);
            let out_dirs: Vec<Vec3> = (0..k)
                .map(|i| reflect(rays.dirs()[i], normals[i]).normalize())
                .collect();

            let mirrored = RayBatch::new(
                nudged,
                out_dirs,
                rays.mediums().to_vec(),
                rays.depth + 1,
                rays.reflections + 1,
                rays.transmissions,
                rays.diffuse_bounces,
            );
            let reflected = trace(scene, &mirrored, rng);

            for i in 0..k {
                let n_dot_v = normals[i].dot(views[i]).clamp(0.0, 1.0);
                color[i] += schlick(f0, n_dot_v) * reflected[i];
            }
        }

        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::materials::Diffuse;
    use lumen_core::Light;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Glossy floor, directional light from above, one occluding sphere
    /// over the origin.
    fn shadow_scene() -> Scene {
        let floor = Glossy::new(Vec3::splat(0.8), 0.0, 0.3, 0.7, Ior::constant(2.2));
        let mut scene = Scene::new();
        scene.add(Primitive::plane(
            Vec3::ZERO,
            20.0,
            20.0,
            Vec3::X,
            Vec3::new(0.0, 0.0, -1.0),
            Arc::new(floor),
        ));
        scene.add(Primitive::sphere(
            Vec3::new(0.0, 2.0, 0.0),
            1.0,
            Arc::new(Diffuse::new(Vec3::ZERO)),
        ));
        scene.add_light(Light::directional(Vec3::Y, Vec3::ONE));
        scene
    }

    fn floor_radiance(scene: &Scene, x: f32) -> Vec3 {
        let rays = RayBatch::primary(
            vec![Vec3::new(x, 3.0, 0.5)],
            vec![Vec3::new(0.0, -1.0, 0.0)],
            Ior::AIR,
        );
        let mut rng = StdRng::seed_from_u64(0);
        trace(scene, &rays, &mut rng)[0]
    }

    #[test]
    fn test_occluded_point_is_darker() {
        let scene = shadow_scene();
        let shadowed = floor_radiance(&scene, 0.0);
        let lit = floor_radiance(&scene, 8.0);
        assert!(
            lit.x > shadowed.x,
            "lit {} should exceed shadowed {}",
            lit.x,
            shadowed.x
        );
    }

    #[test]
    fn test_shadow_flag_disables_occlusion() {
        // Same layout as shadow_scene, but the occluder opts out of
        // shadow casting: both points must receive the same direct light.
        let floor = Glossy::new(Vec3::splat(0.8), 0.0, 0.3, 0.7, Ior::constant(2.2));
        let mut scene = Scene::new();
        scene.add(Primitive::plane(
            Vec3::ZERO,
            20.0,
            20.0,
            Vec3::X,
            Vec3::new(0.0, 0.0, -1.0),
            Arc::new(floor),
        ));
        scene.add(
            Primitive::sphere(
                Vec3::new(0.0, 2.0, 0.0),
                1.0,
                Arc::new(Diffuse::new(Vec3::ZERO)),
            )
            .without_shadow(),
        );
        scene.add_light(Light::directional(Vec3::Y, Vec3::ONE));

        let under_sphere = floor_radiance(&scene, 0.0);
        let far_away = floor_radiance(&scene, 8.0);
        assert!((under_sphere.x - far_away.x).abs() < 1e-4);
    }

    #[test]
    fn test_rough_surface_adds_specular_highlight() {
        let smooth = Glossy::new(Vec3::splat(0.8), 0.0, 0.3, 0.7, Ior::constant(2.2));
        let rough = Glossy::new(Vec3::splat(0.8), 0.2, 0.3, 0.7, Ior::constant(2.2));

        let build = |material: Glossy| {
            let mut s = Scene::new();
            s.add(Primitive::plane(
                Vec3::ZERO,
                20.0,
                20.0,
                Vec3::X,
                Vec3::new(0.0, 0.0, -1.0),
                Arc::new(material),
            ));
            s.add_light(Light::directional(Vec3::Y, Vec3::ONE));
            s
        };

        // Looking straight down with the light overhead puts the half
        // vector on the normal: maximal highlight.
        let flat = floor_radiance(&build(smooth), 0.0);
        let shiny = floor_radiance(&build(rough), 0.0);
        assert!(shiny.x > flat.x);
    }
}
