//! Ray batches and boolean masks.
//!
//! The renderer never traces one ray at a time: a `RayBatch` packs N rays
//! that share the same recursion depth and bounce counters, and a `Mask`
//! selects sub-batches out of it. The recursive "call stack" of the
//! rendering equation is a sequence of such batches.

use lumen_math::{Ior, Vec3};

/// Which side of a surface a ray arrived from.
///
/// `Front` means the ray runs against the outward normal, `Back` means it
/// arrived from behind. Misses still carry the orientation the
/// intersection math produced, so the value is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Front,
    Back,
}

/// A boolean per-ray selection over a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask by evaluating a predicate per index.
    pub fn from_fn(len: usize, f: impl Fn(usize) -> bool) -> Self {
        Self {
            bits: (0..len).map(f).collect(),
        }
    }

    /// Wrap an existing boolean vector.
    pub fn from_vec(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if any ray is selected.
    pub fn any(&self) -> bool {
        self.bits.iter().any(|&b| b)
    }

    /// Number of selected rays.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn get(&self, i: usize) -> bool {
        self.bits[i]
    }

    /// Extract the selected elements of a full-size array.
    pub fn gather<T: Copy>(&self, src: &[T]) -> Vec<T> {
        debug_assert_eq!(src.len(), self.bits.len());
        self.bits
            .iter()
            .zip(src)
            .filter_map(|(&b, &v)| b.then_some(v))
            .collect()
    }

    /// Add the packed `values` into `dst` at the selected positions.
    ///
    /// `values` must have exactly `count()` elements; unselected positions
    /// of `dst` are left untouched.
    pub fn scatter_add(&self, values: &[Vec3], dst: &mut [Vec3]) {
        debug_assert_eq!(dst.len(), self.bits.len());
        debug_assert_eq!(values.len(), self.count());
        let mut j = 0;
        for (i, &b) in self.bits.iter().enumerate() {
            if b {
                dst[i] += values[j];
                j += 1;
            }
        }
    }

}

/// A packed batch of rays sharing one recursion state.
///
/// Structure-of-arrays: per-ray origin, direction and current-medium
/// refractive index, plus batch-level depth and bounce counters. All rays
/// in one batch share the same counters; every bounce builds a fresh batch
/// with incremented values, so there is no shared mutable state across
/// recursion levels.
#[derive(Debug, Clone)]
pub struct RayBatch {
    origins: Vec<Vec3>,
    dirs: Vec<Vec3>,
    mediums: Vec<Ior>,

    /// Number of reflections + transmissions since the camera
    pub depth: u32,
    /// Reflection bounces so far
    pub reflections: u32,
    /// Transmission/refraction bounces so far
    pub transmissions: u32,
    /// Diffuse bounces so far (capped separately from `depth`)
    pub diffuse_bounces: u32,
}

impl RayBatch {
    /// Build a batch from per-ray arrays and explicit counters.
    ///
    /// The three arrays must have the same length; `dirs` are expected to
    /// be unit length.
    pub fn new(
        origins: Vec<Vec3>,
        dirs: Vec<Vec3>,
        mediums: Vec<Ior>,
        depth: u32,
        reflections: u32,
        transmissions: u32,
        diffuse_bounces: u32,
    ) -> Self {
        debug_assert_eq!(origins.len(), dirs.len());
        debug_assert_eq!(origins.len(), mediums.len());
        Self {
            origins,
            dirs,
            mediums,
            depth,
            reflections,
            transmissions,
            diffuse_bounces,
        }
    }

    /// A camera-level batch: depth and all counters zero, every ray
    /// travelling in the given medium.
    pub fn primary(origins: Vec<Vec3>, dirs: Vec<Vec3>, medium: Ior) -> Self {
        let mediums = vec![medium; origins.len()];
        Self::new(origins, dirs, mediums, 0, 0, 0, 0)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn origins(&self) -> &[Vec3] {
        &self.origins
    }

    pub fn dirs(&self) -> &[Vec3] {
        &self.dirs
    }

    pub fn mediums(&self) -> &[Ior] {
        &self.mediums
    }

    /// Sub-batch of the rays selected by `mask`. Counters carry over
    /// unchanged: a selection is not a bounce.
    pub fn select(&self, mask: &Mask) -> RayBatch {
        RayBatch {
            origins: mask.gather(&self.origins),
            dirs: mask.gather(&self.dirs),
            mediums: mask.gather(&self.mediums),
            depth: self.depth,
            reflections: self.reflections,
            transmissions: self.transmissions,
            diffuse_bounces: self.diffuse_bounces,
        }
    }

    /// Same batch with every direction replaced. Batches are never
    /// mutated in place; transformations build new ones.
    pub fn with_dirs(mut self, dirs: Vec<Vec3>) -> RayBatch {
        debug_assert_eq!(dirs.len(), self.origins.len());
        self.dirs = dirs;
        self
    }

    /// Duplicate every ray `k` times consecutively (fan-out for the wide
    /// first diffuse bounce). Counters carry over unchanged.
    pub fn repeat(&self, k: usize) -> RayBatch {
        fn rep<T: Copy>(src: &[T], k: usize) -> Vec<T> {
            let mut out = Vec::with_capacity(src.len() * k);
            for &v in src {
                out.extend(std::iter::repeat(v).take(k));
            }
            out
        }
        RayBatch {
            origins: rep(&self.origins, k),
            dirs: rep(&self.dirs, k),
            mediums: rep(&self.mediums, k),
            depth: self.depth,
            reflections: self.reflections,
            transmissions: self.transmissions,
            diffuse_bounces: self.diffuse_bounces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_batch(n: usize) -> RayBatch {
        let origins = (0..n).map(|i| Vec3::splat(i as f32)).collect();
        let dirs = vec![Vec3::Z; n];
        RayBatch::primary(origins, dirs, Ior::AIR)
    }

    #[test]
    fn test_mask_gather() {
        let mask = Mask::from_vec(vec![true, false, true, false]);
        assert_eq!(mask.count(), 2);
        assert!(mask.any());

        let data = [10.0_f32, 20.0, 30.0, 40.0];
        assert_eq!(mask.gather(&data), vec![10.0, 30.0]);
    }

    #[test]
    fn test_mask_scatter_add_inverts_gather_positions() {
        let mask = Mask::from_vec(vec![false, true, true, false]);
        let mut dst = vec![Vec3::ZERO; 4];
        mask.scatter_add(&[Vec3::X, Vec3::Y], &mut dst);

        assert_eq!(dst[0], Vec3::ZERO);
        assert_eq!(dst[1], Vec3::X);
        assert_eq!(dst[2], Vec3::Y);
        assert_eq!(dst[3], Vec3::ZERO);
    }

    #[test]
    fn test_select_keeps_counters() {
        let batch = RayBatch::new(
            vec![Vec3::ZERO; 3],
            vec![Vec3::Z; 3],
            vec![Ior::AIR; 3],
            2,
            1,
            1,
            0,
        );
        let sub = batch.select(&Mask::from_vec(vec![true, false, true]));

        assert_eq!(sub.len(), 2);
        assert_eq!(sub.depth, 2);
        assert_eq!(sub.reflections, 1);
        assert_eq!(sub.transmissions, 1);
    }

    #[test]
    fn test_select_picks_matching_rows() {
        let batch = test_batch(4);
        let sub = batch.select(&Mask::from_vec(vec![false, true, false, true]));
        assert_eq!(sub.origins()[0], Vec3::splat(1.0));
        assert_eq!(sub.origins()[1], Vec3::splat(3.0));
    }

    #[test]
    fn test_with_dirs_replaces_directions_only() {
        let batch = test_batch(2);
        let redirected = batch.clone().with_dirs(vec![Vec3::X, Vec3::Y]);
        assert_eq!(redirected.dirs(), &[Vec3::X, Vec3::Y]);
        assert_eq!(redirected.origins(), batch.origins());
    }

    #[test]
    fn test_repeat_is_consecutive() {
        let batch = test_batch(2);
        let fanned = batch.repeat(3);
        assert_eq!(fanned.len(), 6);
        // Each source ray appears 3 times in a row
        assert_eq!(fanned.origins()[0], fanned.origins()[2]);
        assert_eq!(fanned.origins()[3], Vec3::splat(1.0));
        assert_eq!(fanned.origins()[5], Vec3::splat(1.0));
    }
}
