//! Rendering: frame ownership, the frame buffer interface and the polygon
//! rasterizer.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;

pub use framebuffer::{DirtyRect, FrameBuffer, RasterTarget};
pub use rasterizer::{
    DepthSource, FlatShader, GouraudShader, PolygonRef, RasterError, Rasterizer, RenderMode,
    RenderStats, ScanlineShader,
};
pub use renderer::Renderer;
