//! Per-channel complex refractive index.
//!
//! Instead of a full spectral representation, the index of refraction is
//! sampled at the three wavelengths the eye is most sensitive to:
//! red 630 nm, green 550 nm, blue 475 nm. The real part drives Snell
//! refraction and the Fresnel split; the imaginary part drives absorption.
//! Metals sit around `0.1i..3i`, clear glass around `0i..1e-7i`.

use crate::Complex;
use glam::Vec3;

/// The three primary wavelengths, in meters (R, G, B).
pub const PRIMARY_WAVELENGTHS_M: Vec3 = Vec3::new(630.0e-9, 550.0e-9, 475.0e-9);

/// Complex index of refraction per color channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ior(pub [Complex; 3]);

impl Ior {
    /// Vacuum / air.
    pub const AIR: Ior = Ior([Complex::ONE, Complex::ONE, Complex::ONE]);

    /// Create from three per-channel complex values.
    #[inline]
    pub const fn new(r: Complex, g: Complex, b: Complex) -> Self {
        Self([r, g, b])
    }

    /// A dispersion-free, absorption-free index.
    #[inline]
    pub const fn constant(n: f32) -> Self {
        let c = Complex::from_re(n);
        Self([c, c, c])
    }

    /// Create from separate real and imaginary channel triples.
    #[inline]
    pub fn from_re_im(re: Vec3, im: Vec3) -> Self {
        Self([
            Complex::new(re.x, im.x),
            Complex::new(re.y, im.y),
            Complex::new(re.z, im.z),
        ])
    }

    /// Real parts as an RGB triple.
    #[inline]
    pub fn real(&self) -> Vec3 {
        Vec3::new(self.0[0].re, self.0[1].re, self.0[2].re)
    }

    /// Imaginary parts as an RGB triple.
    #[inline]
    pub fn imag(&self) -> Vec3 {
        Vec3::new(self.0[0].im, self.0[1].im, self.0[2].im)
    }

    /// Channel accessor.
    #[inline]
    pub fn channel(&self, i: usize) -> Complex {
        self.0[i]
    }
}

impl Default for Ior {
    fn default() -> Self {
        Self::AIR
    }
}
