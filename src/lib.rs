//! A CPU scanline polygon rasterizer.
//!
//! Screen-space polygons are filled with depth testing, using integer
//! Bresenham edge walking, per-scanline intersection lists and a plane
//! equation per polygon for depth. Shading and texturing plug in through the
//! [`ScanlineShader`] hooks; pixels go to any [`RasterTarget`].
//!
//! # Quick Start
//!
//! ```ignore
//! use polyfill::prelude::*;
//!
//! let mut renderer = Renderer::new(800, 600);
//! let mut rasterizer = Rasterizer::new();
//! let mesh = Mesh::two_boxes(200.0);
//! rasterizer.render_mesh(&mesh, RenderMode::Filled, &mut FlatShader, None, &mut renderer.as_framebuffer());
//! ```

pub mod colors;
pub mod light;
pub mod math;
pub mod mesh;
pub mod render;
pub mod texture;

pub use colors::Color;
pub use mesh::{LoadError, Mesh};
pub use render::{
    DepthSource, FrameBuffer, PolygonRef, RasterError, RasterTarget, Rasterizer, RenderMode,
    Renderer,
};
pub use texture::Texture;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::colors::Color;
    pub use crate::light::DirectionalLight;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::mesh::{normal_for, LoadError, Mesh};
    pub use crate::render::{
        DepthSource, FlatShader, FrameBuffer, GouraudShader, PolygonRef, RasterError,
        RasterTarget, Rasterizer, RenderMode, RenderStats, Renderer, ScanlineShader,
    };
    pub use crate::texture::Texture;
}
