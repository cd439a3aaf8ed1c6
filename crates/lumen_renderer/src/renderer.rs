//! Render entry point.
//!
//! Each sample pass shards the flat pixel batch into horizontal bands and
//! renders them in parallel with rayon; the scene is read-only during
//! rendering, so no locking is involved. Every (pass, band) pair gets its
//! own seeded rng, which keeps renders reproducible regardless of thread
//! scheduling.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::scene::Scene;
use crate::tracer::trace;
use lumen_math::Vec3;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing and Monte-Carlo convergence
    pub samples_per_pixel: u32,
    /// Base seed for all randomness
    pub seed: u64,
    /// Log a progress line after every sample pass
    pub show_progress: bool,
    /// Rows per parallel band
    pub tile_rows: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 25,
            seed: 0,
            show_progress: true,
            tile_rows: 32,
        }
    }
}

impl RenderConfig {
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_tile_rows(mut self, tile_rows: u32) -> Self {
        self.tile_rows = tile_rows.max(1);
        self
    }
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Vec3) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Split `0..total` into contiguous ranges of at most `band` elements.
fn band_ranges(total: usize, band: usize) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + band).min(total);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Independent rng stream per (pass, band).
fn band_seed(seed: u64, pass: u32, start: usize) -> u64 {
    seed ^ (pass as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (start as u64).wrapping_mul(0x85eb_ca6b_c2b2_ae35)
}

/// Render the scene through the camera, averaging `samples_per_pixel`
/// passes over the full pixel batch.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> ImageBuffer {
    let total = camera.pixel_count();
    let band = config.tile_rows as usize * camera.screen_width as usize;
    let ranges = band_ranges(total, band.max(1));

    let mut accum = vec![Vec3::ZERO; total];

    for pass in 0..config.samples_per_pixel {
        let results: Vec<(Range<usize>, Vec<Vec3>)> = ranges
            .par_iter()
            .cloned()
            .map(|range| {
                let mut rng = StdRng::seed_from_u64(band_seed(config.seed, pass, range.start));
                let batch = camera.ray_batch(range.clone(), scene.ambient_index, &mut rng);
                let colors = trace(scene, &batch, &mut rng);
                (range, colors)
            })
            .collect();

        for (range, colors) in results {
            for (i, color) in range.zip(colors) {
                accum[i] += color;
            }
        }

        if config.show_progress {
            log::info!("sample pass {}/{}", pass + 1, config.samples_per_pixel);
        }
    }

    let scale = 1.0 / config.samples_per_pixel as f32;
    ImageBuffer {
        width: camera.screen_width,
        height: camera.screen_height,
        pixels: accum.into_iter().map(|c| c * scale).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::materials::Emissive;
    use crate::scene::Background;
    use std::sync::Arc;

    fn smoke_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(Primitive::sphere(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Emissive::new(Vec3::new(1.0, 0.5, 0.25))),
        ));
        scene.background = Background::Color(Vec3::ZERO);
        scene
    }

    fn smoke_camera() -> Camera {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0))
            .with_resolution(8, 8)
            .with_fov(60.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_band_ranges_cover_everything() {
        let ranges = band_ranges(100, 32);
        assert_eq!(ranges.len(), 4);
        let total: usize = ranges.iter().map(|r| r.len()).sum();
        assert_eq!(total, 100);
        assert_eq!(ranges[3], 96..100);
    }

    #[test]
    fn test_band_seeds_differ() {
        assert_ne!(band_seed(0, 0, 0), band_seed(0, 1, 0));
        assert_ne!(band_seed(0, 0, 0), band_seed(0, 0, 64));
    }

    #[test]
    fn test_render_smoke_no_nan() {
        let scene = smoke_scene();
        let camera = smoke_camera();
        let config = RenderConfig::default()
            .with_samples(2)
            .with_progress(false);

        let image = render(&scene, &camera, &config);
        assert_eq!(image.pixels.len(), 64);
        for p in &image.pixels {
            assert!(!p.x.is_nan() && !p.y.is_nan() && !p.z.is_nan());
        }

        // The emitter fills the image center
        let center = image.get(4, 4);
        assert!(center.x > 0.5);
    }

    #[test]
    fn test_render_is_deterministic_per_seed() {
        let scene = smoke_scene();
        let camera = smoke_camera();
        let config = RenderConfig::default()
            .with_samples(2)
            .with_seed(42)
            .with_progress(false);

        let a = render(&scene, &camera, &config);
        let b = render(&scene, &camera, &config);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        let rgba = color_to_rgba(Vec3::new(4.0, -1.0, 1.0));
        assert_eq!(rgba, [255, 0, 255, 255]);
    }

    #[test]
    fn test_image_buffer_roundtrip() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(1, 0, Vec3::ONE);
        assert_eq!(image.get(1, 0), Vec3::ONE);
        assert_eq!(image.to_rgba().len(), 16);
    }
}
