//! Surface textures for materials.
//!
//! Image files are decoded with the `image` crate into linear RGB floats
//! at load time, so the hot path only ever does array lookups.

use std::path::Path;

use glam::Vec3;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A surface color looked up by UV coordinates.
pub trait Texture: Send + Sync {
    /// Sample the texture at (u, v).
    fn sample(&self, u: f32, v: f32) -> Vec3;
}

/// A single uniform color.
#[derive(Clone, Debug)]
pub struct SolidColor {
    color: Vec3,
}

impl SolidColor {
    pub fn new(color: Vec3) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn sample(&self, _u: f32, _v: f32) -> Vec3 {
        self.color
    }
}

/// Alternating squares of two colors.
#[derive(Clone, Debug)]
pub struct Checker {
    even: Vec3,
    odd: Vec3,
    /// Number of squares per unit of UV space
    scale: f32,
}

impl Checker {
    pub fn new(even: Vec3, odd: Vec3, scale: f32) -> Self {
        Self { even, odd, scale }
    }
}

impl Texture for Checker {
    fn sample(&self, u: f32, v: f32) -> Vec3 {
        let iu = (u * self.scale).floor() as i64;
        let iv = (v * self.scale).floor() as i64;
        if (iu + iv) % 2 == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

/// A texture backed by a decoded image.
///
/// Pixels are stored in linear RGB float format, row-major order.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data in RGB format (linear, 0-1 range)
    pixels: Vec<[f32; 3]>,

    /// UV tiling factor: a repeat of 2 tiles the image twice per UV unit
    repeat: f32,

    /// Original file path (for debugging)
    pub path: String,
}

impl ImageTexture {
    /// Create a texture from raw linear pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            repeat: 1.0,
            path: path.into(),
        }
    }

    /// Decode an image file into a texture.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let pixels: Vec<[f32; 3]> = rgb
            .pixels()
            .map(|p| {
                [
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                ]
            })
            .collect();

        log::debug!(
            "Loaded texture: {} ({}x{})",
            path.display(),
            width,
            height
        );

        Ok(Self::new(
            width,
            height,
            pixels,
            path.to_string_lossy().to_string(),
        ))
    }

    /// Set the UV tiling factor.
    pub fn with_repeat(mut self, repeat: f32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let idx = (y * self.width + x) as usize;
        self.pixels.get(idx).copied().unwrap_or([0.0, 0.0, 0.0])
    }
}

impl Texture for ImageTexture {
    /// Bilinear sample at UV coordinates, (0, 0) at bottom-left.
    fn sample(&self, u: f32, v: f32) -> Vec3 {
        // Tile and wrap UV coordinates
        let u = (u * self.repeat).rem_euclid(1.0);
        let v = (v * self.repeat).rem_euclid(1.0);

        // Convert to pixel coordinates, flipping V for image row order
        let x = u * (self.width as f32 - 1.0);
        let y = (1.0 - v) * (self.height as f32 - 1.0);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let p00 = self.get_pixel(x0, y0);
        let p10 = self.get_pixel(x1, y0);
        let p01 = self.get_pixel(x0, y1);
        let p11 = self.get_pixel(x1, y1);

        let top = Vec3::new(
            p00[0] * (1.0 - fx) + p10[0] * fx,
            p00[1] * (1.0 - fx) + p10[1] * fx,
            p00[2] * (1.0 - fx) + p10[2] * fx,
        );
        let bottom = Vec3::new(
            p01[0] * (1.0 - fx) + p11[0] * fx,
            p01[1] * (1.0 - fx) + p11[1] * fx,
            p01[2] * (1.0 - fx) + p11[2] * fx,
        );

        top * (1.0 - fy) + bottom * fy
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
