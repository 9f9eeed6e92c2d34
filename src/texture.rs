use std::path::Path;

use crate::math::vec2::Vec2;
use crate::mesh::LoadError;

/// A 2D texture sampled by the scanline filler.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,
    height: u32,
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        Ok(Self::from_argb(width, height, data))
    }

    /// Wrap row-major ARGB pixels.
    ///
    /// # Panics
    /// Panics if `data` does not hold exactly `width * height` pixels or
    /// either dimension is zero.
    pub fn from_argb(width: u32, height: u32, data: Vec<u32>) -> Self {
        assert!(width > 0 && height > 0, "texture must not be empty");
        assert_eq!(data.len(), (width * height) as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// A `size` x `size` checkerboard of `cells` x `cells` squares.
    pub fn checkerboard(size: u32, cells: u32, even: u32, odd: u32) -> Self {
        let cell = (size / cells.max(1)).max(1);
        let data = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size / cell, i / size / cell);
                if (x + y) % 2 == 0 {
                    even
                } else {
                    odd
                }
            })
            .collect();
        Self::from_argb(size, size, data)
    }

    /// Sample the texture at `uv` using nearest-neighbor filtering.
    ///
    /// UV (0,0) is the top-left texel, (1,1) the bottom-right one.
    /// Coordinates outside [0,1) repeat.
    #[inline]
    pub fn sample(&self, uv: Vec2) -> u32 {
        // rem_euclid handles negative values, unlike %
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
