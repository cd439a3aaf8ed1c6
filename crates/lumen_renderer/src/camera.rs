//! Camera ray generation.
//!
//! The camera produces whole ray batches: one ray per pixel of a
//! contiguous pixel range, jittered inside its pixel for anti-aliasing,
//! with an optional thin-lens aperture offset for depth of field.

use std::ops::Range;

use crate::batch::RayBatch;
use crate::sampling::{gen_f32, random_in_unit_disk};
use lumen_math::{Ior, Vec3};
use rand::RngCore;

#[derive(Clone)]
pub struct Camera {
    pub screen_width: u32,
    pub screen_height: u32,

    look_from: Vec3,
    look_at: Vec3,
    field_of_view: f32,
    aperture: f32,
    focal_distance: f32,

    // Cached computed values (set by initialize())
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    viewport_width: f32,
    viewport_height: f32,
    lens_radius: f32,
    pixel_x: Vec<f32>,
    pixel_y: Vec<f32>,
}

impl Camera {
    /// Create a camera with default settings, looking from `look_from`
    /// toward `look_at`.
    pub fn new(look_from: Vec3, look_at: Vec3) -> Self {
        Self {
            screen_width: 400,
            screen_height: 300,
            look_from,
            look_at,
            field_of_view: 90.0,
            aperture: 0.0,
            focal_distance: 1.0,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            viewport_width: 0.0,
            viewport_height: 0.0,
            lens_radius: 0.0,
            pixel_x: Vec::new(),
            pixel_y: Vec::new(),
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, degrees: f32) -> Self {
        self.field_of_view = degrees;
        self
    }

    /// Set lens settings. A non-zero aperture needs many samples per
    /// pixel to resolve without noise.
    pub fn with_lens(mut self, aperture: f32, focal_distance: f32) -> Self {
        self.aperture = aperture;
        self.focal_distance = focal_distance;
        self
    }

    /// Compute the camera basis and pixel grid (must be called before
    /// generating rays).
    pub fn initialize(&mut self) {
        let aspect_ratio = self.screen_width as f32 / self.screen_height as f32;
        self.viewport_width = (self.field_of_view.to_radians() / 2.0).tan() * 2.0;
        self.viewport_height = self.viewport_width / aspect_ratio;

        self.forward = (self.look_at - self.look_from).normalize();
        self.right = self.forward.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.forward);

        self.lens_radius = self.aperture / 2.0;

        self.pixel_x = linspace(
            -self.viewport_width / 2.0,
            self.viewport_width / 2.0,
            self.screen_width as usize,
        );
        self.pixel_y = linspace(
            self.viewport_height / 2.0,
            -self.viewport_height / 2.0,
            self.screen_height as usize,
        );
    }

    /// Total number of pixels (and rays per full batch).
    pub fn pixel_count(&self) -> usize {
        (self.screen_width * self.screen_height) as usize
    }

    /// Generate the primary ray batch for a contiguous pixel range,
    /// travelling in the given ambient medium.
    pub fn ray_batch(&self, pixels: Range<usize>, medium: Ior, rng: &mut dyn RngCore) -> RayBatch {
        debug_assert!(!self.pixel_x.is_empty(), "initialize() was not called");

        let width = self.screen_width as usize;
        let pitch_x = self.viewport_width / self.screen_width as f32;
        let pitch_y = self.viewport_height / self.screen_height as f32;

        let count = pixels.len();
        let mut origins = Vec::with_capacity(count);
        let mut dirs = Vec::with_capacity(count);

        for p in pixels {
            let origin = if self.lens_radius > 0.0 {
                let (dx, dy) = random_in_unit_disk(rng);
                self.look_from
                    + self.right * (dx * self.lens_radius)
                    + self.up * (dy * self.lens_radius)
            } else {
                self.look_from
            };

            // Jitter inside the pixel footprint
            let x = self.pixel_x[p % width] + (gen_f32(rng) - 0.5) * pitch_x;
            let y = self.pixel_y[p / width] + (gen_f32(rng) - 0.5) * pitch_y;

            let target = self.look_from
                + (self.right * x + self.up * y + self.forward) * self.focal_distance;
            let dir = (target - origin).normalize();

            origins.push(origin);
            dirs.push(dir);
        }

        RayBatch::primary(origins, dirs, medium)
    }
}

/// `n` evenly spaced values from `a` to `b` inclusive.
fn linspace(a: f32, b: f32, n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![a];
    }
    let step = (b - a) / (n - 1) as f32;
    (0..n).map(|i| a + step * i as f32).collect()
}
