//! Complex scalar arithmetic.
//!
//! The full-polarization Fresnel equations operate on complex refractive
//! indices, so the math layer carries a minimal complex type over `f32`.

use std::ops::{Add, Div, Mul, Neg, Sub};

/// A complex number `re + im*i`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };

    /// Create a complex number from real and imaginary parts.
    #[inline]
    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    /// Create a purely real complex number.
    #[inline]
    pub const fn from_re(re: f32) -> Self {
        Self { re, im: 0.0 }
    }

    /// Complex conjugate.
    #[inline]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Squared magnitude `re² + im²`.
    #[inline]
    pub fn norm_sqr(self) -> f32 {
        self.re * self.re + self.im * self.im
    }

    /// Magnitude.
    #[inline]
    pub fn abs(self) -> f32 {
        self.norm_sqr().sqrt()
    }

    /// Principal square root.
    ///
    /// Half-angle form: `sqrt(r) * (cos(θ/2) + i sin(θ/2))` with
    /// `θ = atan2(im, re)`, so the result lies in the right half-plane.
    pub fn sqrt(self) -> Self {
        let r = self.abs();
        if r == 0.0 {
            return Self::ZERO;
        }
        let half_theta = self.im.atan2(self.re) * 0.5;
        let sqrt_r = r.sqrt();
        Self::new(sqrt_r * half_theta.cos(), sqrt_r * half_theta.sin())
    }

    /// Complex exponential `e^re * (cos(im) + i sin(im))`.
    pub fn exp(self) -> Self {
        let scale = self.re.exp();
        Self::new(scale * self.im.cos(), scale * self.im.sin())
    }
}

impl Add for Complex {
    type Output = Complex;

    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    #[inline]
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Mul<f32> for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: f32) -> Complex {
        Complex::new(self.re * rhs, self.im * rhs)
    }
}

impl Div for Complex {
    type Output = Complex;

    #[inline]
    fn div(self, rhs: Complex) -> Complex {
        let denom = rhs.norm_sqr();
        Complex::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        )
    }
}

impl Neg for Complex {
    type Output = Complex;

    #[inline]
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl From<f32> for Complex {
    #[inline]
    fn from(re: f32) -> Self {
        Self::from_re(re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Complex, b: Complex) -> bool {
        (a.re - b.re).abs() < 1e-5 && (a.im - b.im).abs() < 1e-5
    }

    #[test]
    fn test_arithmetic() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -1.0);

        assert_eq!(a + b, Complex::new(4.0, 1.0));
        assert_eq!(a - b, Complex::new(-2.0, 3.0));
        // (1 + 2i)(3 - i) = 3 - i + 6i - 2i² = 5 + 5i
        assert_eq!(a * b, Complex::new(5.0, 5.0));
    }

    #[test]
    fn test_division_roundtrip() {
        let a = Complex::new(2.0, -3.0);
        let b = Complex::new(0.5, 1.5);
        assert!(close(a / b * b, a));
    }

    #[test]
    fn test_sqrt_of_real() {
        assert!(close(Complex::from_re(4.0).sqrt(), Complex::from_re(2.0)));
        // sqrt(-1) = i on the principal branch
        assert!(close(Complex::from_re(-1.0).sqrt(), Complex::new(0.0, 1.0)));
    }

    #[test]
    fn test_sqrt_squares_back() {
        let z = Complex::new(-2.0, 0.75);
        let s = z.sqrt();
        assert!(close(s * s, z));
        assert!(s.re >= 0.0);
    }

    #[test]
    fn test_exp() {
        assert!(close(Complex::ZERO.exp(), Complex::ONE));
        // e^{iπ} = -1
        let z = Complex::new(0.0, std::f32::consts::PI).exp();
        assert!(close(z, Complex::from_re(-1.0)));
    }

    #[test]
    fn test_abs() {
        assert!((Complex::new(3.0, 4.0).abs() - 5.0).abs() < 1e-6);
    }
}
