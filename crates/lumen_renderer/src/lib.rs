//! Lumen - batched CPU path tracing.
//!
//! A Monte Carlo path tracer that carries many rays at once: one flat
//! batch of ray states is intersected against every collider, partitioned
//! by nearest hit with boolean masks, shaded per material, and the per-ray
//! radiance is scattered back into the full-size output. Recursion works
//! on the masked sub-batches, so there is one evaluator call per
//! (depth level, collider) rather than one per ray.

mod batch;
mod camera;
pub mod geometry;
pub mod materials;
mod renderer;
mod sampling;
mod scene;
mod tracer;

pub use batch::{Mask, Orientation, RayBatch};
pub use camera::Camera;
pub use geometry::{Collider, Intersection, Primitive};
pub use materials::{Diffuse, Emissive, Glossy, Material, Refractive};
pub use renderer::{
    color_to_rgba, linear_to_gamma, render, ImageBuffer, RenderConfig,
};
pub use scene::{Background, Scene};
pub use tracer::{distance_map, trace, Hit};

/// Re-export math and scene-ingredient types
pub use lumen_core::{Checker, ImageTexture, Light, SolidColor, Texture};
pub use lumen_math::{Complex, Ior, Vec3, FARAWAY};
