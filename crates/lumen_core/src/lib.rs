//! Renderer-agnostic scene ingredients: textures and light sources.

pub mod light;
pub mod texture;

pub use light::Light;
pub use texture::{Checker, ImageTexture, SolidColor, Texture, TextureError, TextureResult};
