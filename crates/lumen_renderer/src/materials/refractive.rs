//! Transmissive surface with complex-index Fresnel and Beer-Lambert
//! absorption.

use crate::batch::{Mask, Orientation, RayBatch};
use crate::materials::{reflect, Material, NUDGE};
use crate::scene::Scene;
use crate::tracer::{trace, Hit};
use lumen_math::{Complex, Ior, Vec3, PRIMARY_WAVELENGTHS_M};
use rand::RngCore;
use std::f32::consts::PI;

/// Per-channel result of the exact dielectric Fresnel equations.
struct FresnelSplit {
    /// Reflected fraction per channel, `(|r_s|² + |r_p|²) / 2`
    f: Vec3,
    /// Real `sin²θt` per channel; values above 1 mean total internal
    /// reflection for that channel
    sin2_t: Vec3,
}

/// Full unpolarized Fresnel term between complex media at incidence
/// cosine `cos_i`, averaging the s- and p-polarization intensities.
fn fresnel_split(n1: &Ior, n2: &Ior, cos_i: f32) -> FresnelSplit {
    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let cos_i_c = Complex::from_re(cos_i);

    let mut f = [0.0f32; 3];
    let mut sin2_t = [0.0f32; 3];

    for c in 0..3 {
        let a = n1.channel(c);
        let b = n2.channel(c);

        let ratio_re = a.re / b.re;
        sin2_t[c] = ratio_re * ratio_re * sin2_i;

        // cosθt = sqrt(1 - (n1/n2)² sin²θi), complex arithmetic throughout
        let ratio = a / b;
        let cos_t = (Complex::ONE - ratio * ratio * sin2_i).sqrt();

        let r_s = (a * cos_i_c - b * cos_t) / (a * cos_i_c + b * cos_t);
        let r_p = (a * cos_t - b * cos_i_c) / (a * cos_t + b * cos_i_c);
        f[c] = (r_s.norm_sqr() + r_p.norm_sqr()) / 2.0;
    }

    FresnelSplit {
        f: Vec3::from_array(f),
        sin2_t: Vec3::from_array(sin2_t),
    }
}

/// Beer-Lambert transmittance through `distance` of a medium with
/// per-channel extinction `kappa` (the imaginary index parts).
fn transmittance(kappa: Vec3, concentration: f32, distance: f32) -> Vec3 {
    let alpha = kappa * (4.0 * PI * concentration * distance) / PRIMARY_WAVELENGTHS_M;
    Vec3::new((-alpha.x).exp(), (-alpha.y).exp(), (-alpha.z).exp())
}

/// Glass-like material with a complex per-channel index of refraction.
///
/// The real index parts drive the Snell direction and the Fresnel split;
/// the imaginary parts absorb light along the path through the medium.
pub struct Refractive {
    ior: Ior,
    concentration: f32,
}

impl Refractive {
    pub fn new(ior: Ior) -> Self {
        Self {
            ior,
            concentration: 1.0,
        }
    }

    /// Scale the effect of the imaginary index parts (distances are
    /// interpreted in meters at concentration 1).
    pub fn with_concentration(mut self, concentration: f32) -> Self {
        self.concentration = concentration;
        self
    }
}

impl Material for Refractive {
    fn radiance(
        &self,
        scene: &Scene,
        rays: &RayBatch,
        hit: &Hit,
        rng: &mut dyn RngCore,
    ) -> Vec<Vec3> {
        let k = rays.len();
        let mut color = vec![Vec3::ZERO; k];

        // Depth exhaustion terminates the path with zero radiance.
        if rays.depth >= hit.primitive.max_depth {
            return color;
        }

        let points = hit.points(rays);
        let normals = hit.shading_normals(&points);

        // Entering the material on front hits, leaving into the ambient
        // medium on back hits.
        let exit_media: Vec<Ior> = hit
            .orientations
            .iter()
            .map(|&o| match o {
                Orientation::Front => self.ior,
                Orientation::Back => scene.ambient_index,
            })
            .collect();

        let cos_i: Vec<f32> = (0..k)
            .map(|i| (-rays.dirs()[i]).dot(normals[i]).max(0.0))
            .collect();

        let splits: Vec<FresnelSplit> = (0..k)
            .map(|i| fresnel_split(&rays.mediums()[i], &exit_media[i], cos_i[i]))
            .collect();

        // Reflected branch: always spawned, weighted by F.
        {
            let origins: Vec<Vec3> = (0..k).map(|i| points[i] + normals[i] * NUDGE).collect();
            let dirs: Vec<Vec3> = (0..k)
                .map(|i| reflect(rays.dirs()[i], normals[i]).normalize())
                .collect();

            let reflected = RayBatch::new(
                origins,
                dirs,
                rays.mediums().to_vec(),
                rays.depth + 1,
                rays.reflections + 1,
                rays.transmissions,
                rays.diffuse_bounces,
            );
            let incoming = trace(scene, &reflected, rng);
            for i in 0..k {
                color[i] += splits[i].f * incoming[i];
            }
        }

        // Refracted branch: only rays below total internal reflection.
        // One geometric ray cannot split per channel, so the TIR test and
        // the Snell direction use the channel-mean real index ratio.
        let mean_sin2_t: Vec<f32> = splits
            .iter()
            .map(|s| (s.sin2_t.x + s.sin2_t.y + s.sin2_t.z) / 3.0)
            .collect();
        let transmitting = Mask::from_fn(k, |i| mean_sin2_t[i] <= 1.0);

        if transmitting.any() {
            let mut origins = Vec::with_capacity(transmitting.count());
            let mut dirs = Vec::with_capacity(transmitting.count());
            let mut mediums = Vec::with_capacity(transmitting.count());

            for i in 0..k {
                if !transmitting.get(i) {
                    continue;
                }
                let n1 = rays.mediums()[i].real();
                let n2 = exit_media[i].real();
                let ratio = (n1.x / n2.x + n1.y / n2.y + n1.z / n2.z) / 3.0;

                let cos_t = (1.0 - mean_sin2_t[i]).max(0.0).sqrt();
                // Vector form of Snell's law
                let dir =
                    (rays.dirs()[i] * ratio + normals[i] * (ratio * cos_i[i] - cos_t)).normalize();

                origins.push(points[i] - normals[i] * NUDGE);
                dirs.push(dir);
                mediums.push(exit_media[i]);
            }

            let refracted = RayBatch::new(
                origins,
                dirs,
                mediums,
                rays.depth + 1,
                rays.reflections,
                rays.transmissions + 1,
                rays.diffuse_bounces,
            );
            let incoming = trace(scene, &refracted, rng);

            let reflectances: Vec<Vec3> = splits.iter().map(|s| s.f).collect();
            let weighted: Vec<Vec3> = transmitting
                .gather(&reflectances)
                .into_iter()
                .zip(incoming)
                .map(|(f, c)| (Vec3::ONE - f) * c)
                .collect();
            transmitting.scatter_add(&weighted, &mut color);
        }

        // Absorption along the path just travelled, in the medium the
        // incoming rays were in.
        for i in 0..k {
            let kappa = rays.mediums()[i].imag();
            color[i] *= transmittance(kappa, self.concentration, hit.distances[i]);
        }

        color
    }
}
