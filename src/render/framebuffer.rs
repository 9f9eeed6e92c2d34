//! Frame buffer abstraction for 2D pixel access.
//!
//! [`RasterTarget`] is everything the rasterizer needs from pixel storage:
//! a depth test, an unconditional write, and dirty-rectangle bookkeeping.
//! [`FrameBuffer`] implements it over borrowed color and depth slices.

/// Pixel storage the rasterizer draws into.
///
/// Depth convention: larger z is closer to the viewer.
pub trait RasterTarget {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// True when a fragment at depth `z` would be visible at (x, y).
    /// Out-of-bounds coordinates never pass.
    ///
    /// Visibility depends on depth alone, so no color is passed here; the
    /// shaded color goes to [`RasterTarget::set`] once the test passes.
    fn depth_test(&self, x: i32, y: i32, z: f32) -> bool;

    /// Write color and depth without testing. Out-of-bounds writes are
    /// ignored.
    fn set(&mut self, x: i32, y: i32, z: f32, color: u32);

    /// Grow the dirty rectangle to include (x, y).
    fn adjust_dirty_rect(&mut self, x: i32, y: i32);
}

/// Bounding box of the pixels touched since the last clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DirtyRect {
    bounds: Option<(i32, i32, i32, i32)>,
}

impl DirtyRect {
    pub fn clear(&mut self) {
        self.bounds = None;
    }

    pub fn include(&mut self, x: i32, y: i32) {
        self.bounds = Some(match self.bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    /// Inclusive `(min_x, min_y, max_x, max_y)`, or `None` if nothing was
    /// touched.
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }
}

/// A view into color and depth buffers.
///
/// Wraps 1D slices with width/height metadata to enable safe 2D pixel access.
/// This is a borrowed view, not an owning type - it's meant to be created
/// temporarily when you need to pass buffers + dimensions together.
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    depth_buffer: &'a mut [f32],
    dirty: &'a mut DirtyRect,
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    /// Create a new FrameBuffer view from buffer slices and dimensions.
    ///
    /// # Panics
    /// Panics (debug builds) if buffer lengths don't match width * height
    pub fn new(
        color_buffer: &'a mut [u32],
        depth_buffer: &'a mut [f32],
        dirty: &'a mut DirtyRect,
        width: u32,
        height: u32,
    ) -> Self {
        debug_assert_eq!(
            color_buffer.len(),
            (width * height) as usize,
            "Color buffer size doesn't match dimensions"
        );
        debug_assert_eq!(
            depth_buffer.len(),
            (width * height) as usize,
            "Depth buffer size doesn't match dimensions"
        );
        Self {
            color_buffer,
            depth_buffer,
            dirty,
            width,
            height,
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.color_buffer[i])
    }

    /// Get the depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth_buffer[i])
    }

    pub fn dirty_rect(&self) -> DirtyRect {
        *self.dirty
    }
}

impl RasterTarget for FrameBuffer<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn depth_test(&self, x: i32, y: i32, z: f32) -> bool {
        self.index(x, y)
            .is_some_and(|i| z > self.depth_buffer[i])
    }

    #[inline]
    fn set(&mut self, x: i32, y: i32, z: f32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.depth_buffer[i] = z;
            self.color_buffer[i] = color;
            self.dirty.include(x, y);
        }
    }

    #[inline]
    fn adjust_dirty_rect(&mut self, x: i32, y: i32) {
        self.dirty.include(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_test_prefers_larger_z() {
        let mut color = vec![0u32; 4];
        let mut depth = vec![f32::NEG_INFINITY; 4];
        let mut dirty = DirtyRect::default();
        let mut fb = FrameBuffer::new(&mut color, &mut depth, &mut dirty, 2, 2);

        assert!(fb.depth_test(1, 1, -5.0));
        fb.set(1, 1, -5.0, 0xFFFF0000);
        assert!(!fb.depth_test(1, 1, -6.0));
        assert!(!fb.depth_test(1, 1, -5.0));
        assert!(fb.depth_test(1, 1, -4.0));
        assert_eq!(fb.get_pixel(1, 1), Some(0xFFFF0000));
        assert_eq!(fb.get_depth(1, 1), Some(-5.0));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut color = vec![0u32; 4];
        let mut depth = vec![f32::NEG_INFINITY; 4];
        let mut dirty = DirtyRect::default();
        let mut fb = FrameBuffer::new(&mut color, &mut depth, &mut dirty, 2, 2);

        assert!(!fb.depth_test(-1, 0, 0.0));
        assert!(!fb.depth_test(0, 2, 0.0));
        fb.set(2, 0, 0.0, 0xFFFFFFFF);
        assert_eq!(fb.get_pixel(2, 0), None);
        assert!(fb.dirty_rect().is_empty());
    }

    #[test]
    fn dirty_rect_grows_with_writes() {
        let mut dirty = DirtyRect::default();
        dirty.include(3, 4);
        dirty.include(1, 7);
        assert_eq!(dirty.bounds(), Some((1, 4, 3, 7)));
        dirty.clear();
        assert!(dirty.is_empty());
    }
}
