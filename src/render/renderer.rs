//! Frame ownership.
//!
//! The [`Renderer`] owns the color and depth buffers for a frame and hands
//! out [`FrameBuffer`] views to the rasterizer. Clearing and exporting the
//! frame happen here, never inside the rasterizer.

use std::path::Path;

use image::{Rgba, RgbaImage};

use super::framebuffer::{DirtyRect, FrameBuffer};
use crate::colors;

pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    dirty: DirtyRect,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![colors::BACKGROUND; size],
            depth_buffer: vec![f32::NEG_INFINITY; size],
            dirty: DirtyRect::default(),
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Start a new frame: fill with `color`, reset depth and the dirty
    /// rectangle.
    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
        self.clear_depth();
        self.dirty.clear();
    }

    /// Reset every depth to infinitely far away.
    #[inline]
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(f32::NEG_INFINITY);
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn dirty_rect(&self) -> DirtyRect {
        self.dirty
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            &mut self.dirty,
            self.width,
            self.height,
        )
    }

    /// Copy the frame into an RGBA image.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let argb = self.color_buffer[(y * self.width + x) as usize];
            let [a, r, g, b] = argb.to_be_bytes();
            Rgba([r, g, b, a])
        })
    }

    /// Write the frame to an image file; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_image().save(path)
    }
}
