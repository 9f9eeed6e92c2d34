//! Bresenham edge walking.
//!
//! The same integer walk serves two purposes: stroking a line into the
//! frame buffer, and recording where a polygon edge crosses each scanline
//! for the later span fill.
//!
//! Both directions of an edge are normalized so that x never decreases.
//! Two polygons sharing an edge therefore walk exactly the same pixels and
//! register the same leftmost x per row, which keeps shared edges free of
//! gaps.
//!
//! ```text
//!   x-driving (|dx| >= |dy|)        y-driving (|dy| > |dx|)
//!
//!   S##                              S
//!      ###                           #
//!         ##E                         #
//!                                     #
//!                                      E
//! ```

use super::intersection::Intersection;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// Snapped coordinates are clamped to `[-GUARD_BAND, GUARD_BAND]`, which
/// keeps the doubled deltas of the walk well inside `i32`.
pub const GUARD_BAND: i32 = 1 << 20;

/// One end of an edge: integer pixel position, floating point depth, and
/// the vertex data carried into intersections for interpolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePoint {
    pub x: i32,
    pub y: i32,
    pub z: f32,
    pub vertex: usize,
    pub uv: Option<Vec2>,
}

impl EdgePoint {
    pub fn new(x: i32, y: i32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            vertex: 0,
            uv: None,
        }
    }

    /// Floor x and y of `p` onto the pixel grid, clamped to the guard band.
    /// z is kept as is.
    pub fn snap(p: Vec3) -> Self {
        let snap = |v: f32| (v.floor() as i32).clamp(-GUARD_BAND, GUARD_BAND);
        Self::new(snap(p.x), snap(p.y), p.z)
    }

    pub fn with_vertex(mut self, vertex: usize, uv: Option<Vec2>) -> Self {
        self.vertex = vertex;
        self.uv = uv;
        self
    }
}

/// A pixel visited by the walk. `weight` is the fraction of the driving
/// axis covered so far, 0 at the start and 1 at the end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePixel {
    pub x: i32,
    pub y: i32,
    pub z: f32,
    pub weight: f32,
}

/// Order the endpoints so that x is non-decreasing.
#[inline]
pub fn canonicalize(start: EdgePoint, end: EdgePoint) -> (EdgePoint, EdgePoint) {
    if end.x < start.x {
        (end, start)
    } else {
        (start, end)
    }
}

/// Iterator over the pixels of a line, both endpoints included.
///
/// The error term works on doubled deltas so the walk stays in integer
/// arithmetic. Depth is interpolated linearly in step with the driving axis.
#[derive(Clone, Debug)]
pub struct BresenhamLine {
    x: i32,
    y: i32,
    step_x: i32,
    step_y: i32,
    // Doubled deltas along the driving and the minor axis.
    major2: i32,
    minor2: i32,
    x_driving: bool,
    error: i32,
    step: i32,
    steps: i32,
    z0: f32,
    z1: f32,
}

impl BresenhamLine {
    /// Walk from `start` to `end` in the given order.
    pub fn new(start: (i32, i32, f32), end: (i32, i32, f32)) -> Self {
        let (x0, y0, z0) = start;
        let (x1, y1, z1) = end;
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let x_driving = dx >= dy;
        let (major, minor) = if x_driving { (dx, dy) } else { (dy, dx) };

        Self {
            x: x0,
            y: y0,
            step_x: if x1 >= x0 { 1 } else { -1 },
            step_y: if y1 >= y0 { 1 } else { -1 },
            major2: 2 * major,
            minor2: 2 * minor,
            x_driving,
            error: 2 * minor - major,
            step: 0,
            steps: major,
            z0,
            z1,
        }
    }

    fn advance(&mut self) {
        let minor_step = self.error > 0;
        if minor_step {
            self.error -= self.major2;
        }
        self.error += self.minor2;

        if self.x_driving {
            self.x += self.step_x;
            if minor_step {
                self.y += self.step_y;
            }
        } else {
            self.y += self.step_y;
            if minor_step {
                self.x += self.step_x;
            }
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = LinePixel;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step > self.steps {
            return None;
        }

        let weight = if self.steps == 0 {
            0.0
        } else {
            self.step as f32 / self.steps as f32
        };
        let pixel = LinePixel {
            x: self.x,
            y: self.y,
            z: self.z0 + (self.z1 - self.z0) * weight,
            weight,
        };

        self.step += 1;
        if self.step <= self.steps {
            self.advance();
        }
        Some(pixel)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps + 1 - self.step).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BresenhamLine {}

/// Pixels of the edge between `start` and `end`, walked left to right.
/// A zero-length edge yields its single point.
pub fn line_pixels(start: EdgePoint, end: EdgePoint) -> BresenhamLine {
    let (start, end) = canonicalize(start, end);
    BresenhamLine::new((start.x, start.y, start.z), (end.x, end.y, end.z))
}

/// Walk a polygon edge and report at most one intersection per scanline.
///
/// Only rows strictly between the two endpoint rows are reported; endpoint
/// rows are registered by the polygon assembly, which knows whether the
/// vertex is a turning point. On rows where the walk runs horizontally only
/// the leftmost pixel counts. Horizontal edges report nothing.
pub fn edge_intersections(
    start: EdgePoint,
    end: EdgePoint,
    mut emit: impl FnMut(i32, Intersection),
) {
    let (start, end) = canonicalize(start, end);
    if start.y == end.y {
        return;
    }

    let edge_uv = start.uv.zip(end.uv).map(|(a, b)| [a, b]);
    let mut last_row = start.y;

    for pixel in BresenhamLine::new((start.x, start.y, start.z), (end.x, end.y, end.z)) {
        if pixel.y == last_row || pixel.y == end.y {
            continue;
        }
        last_row = pixel.y;
        emit(
            pixel.y,
            Intersection {
                x: pixel.x,
                z: pixel.z,
                weight: pixel.weight,
                edge_start: start.vertex,
                edge_end: end.vertex,
                edge_uv,
            },
        );
    }
}
