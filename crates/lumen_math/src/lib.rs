// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod complex;
mod spectrum;

pub use complex::Complex;
pub use spectrum::{Ior, PRIMARY_WAVELENGTHS_M};

/// Sentinel distance for "no intersection".
///
/// Shared process-wide: every collider reports this value for a miss and
/// the resolver treats it as effectively infinite.
pub const FARAWAY: f32 = 1.0e30;
