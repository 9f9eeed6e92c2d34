//! Scanline polygon fill.
//!
//! # Edge pass
//!
//! Every edge is walked with Bresenham and reports one intersection per
//! scanline strictly between its endpoint rows. The vertices are added here,
//! and how often depends on the direction of y at the vertex:
//!
//! ```text
//!        peak: 2            pass-through: 1          flat top: 2
//!          /\                    \                    A____B
//!         /  \                    \__                /      \
//!                                    \              /        \
//! ```
//!
//! The direction (sign of dy, on floored coordinates) of each non-horizontal
//! edge is compared to the previous non-horizontal edge. The end vertex of
//! every non-horizontal edge is registered; when the direction flips, the
//! start vertex is registered as well. Horizontal edges are skipped by the
//! direction bookkeeping, so a flat extremum registers both ends of the run.
//! Every scanline then sees an even number of crossings on well-formed
//! polygons. Horizontal edges are stored on their row as runs.
//!
//! # Span pass
//!
//! Each row is sorted by x and paired into spans; the row's runs are added
//! as spans of their own, and no pixel is covered twice. Per pixel the depth comes
//! from the plane equation (or from linear interpolation between the two
//! intersections), the frame buffer decides visibility, and the shader
//! produces the color. Interpolation is stepped for every pixel of a span,
//! written or not.

use super::bresenham::{self, EdgePoint};
use super::intersection::{Intersection, IntersectionTable, Run};
use super::plane::PlaneEquation;
use super::shader::ScanlineShader;
use super::{DepthSource, PolygonRef, RasterError, Rasterizer};
use crate::math::vec2::Vec2;
use crate::render::framebuffer::RasterTarget;
use crate::texture::Texture;

/// Interpolation state of the span being filled. Overwritten by every
/// [`InterpolationContext::prepare`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterpolationContext {
    pub z: f32,
    pub delta_z: f32,
    /// Start and end vertex of the left and of the right intersection's edge.
    pub vertex_indices: [usize; 4],
    /// `[1 - w_left, w_left, 1 - w_right, w_right]`.
    pub weights: [f32; 4],
    /// Runs from 0 at the left end of the span to 1 at the right end.
    pub weight: f32,
    pub delta_weight: f32,
    pub uv: Option<Vec2>,
    pub delta_uv: Vec2,
}

impl InterpolationContext {
    /// Seed the span from `start` to `end` and let the shader do the same.
    pub fn prepare<S: ScanlineShader>(
        &mut self,
        start: &Intersection,
        end: &Intersection,
        texturing: bool,
        shader: &mut S,
    ) {
        let delta_x = end.x - start.x;
        let inverse_steps = 1.0 / delta_x.max(1) as f32;

        self.z = start.z;
        self.delta_z = (end.z - start.z) * inverse_steps;

        self.vertex_indices = [start.edge_start, start.edge_end, end.edge_start, end.edge_end];
        self.weights = [1.0 - start.weight, start.weight, 1.0 - end.weight, end.weight];
        shader.prepare_scanline(self.vertex_indices, self.weights, delta_x);

        self.weight = 0.0;
        self.delta_weight = inverse_steps;

        self.uv = None;
        self.delta_uv = Vec2::ZERO;
        if texturing {
            if let (Some(uv_start), Some(uv_end)) = (start.uv(), end.uv()) {
                self.uv = Some(uv_start);
                self.delta_uv = (uv_end - uv_start) * inverse_steps;
            }
        }
    }

    /// Move one pixel to the right.
    #[inline]
    pub fn step<S: ScanlineShader>(&mut self, shader: &mut S) {
        shader.step_on_scanline();
        self.z += self.delta_z;
        self.weight += self.delta_weight;
        if let Some(uv) = self.uv.as_mut() {
            *uv = *uv + self.delta_uv;
        }
    }
}

/// Sign of an edge's y-direction. Screen y grows downward, so an edge
/// going up the screen is positive.
#[inline]
fn derivative(current_y: i32, next_y: i32) -> i32 {
    (current_y - next_y).signum()
}

/// Add an intersection and grow the dirty rectangle, clamping x to the
/// target. Rows outside the target are dropped.
fn register<T: RasterTarget>(
    table: &mut IntersectionTable,
    target: &mut T,
    y: i32,
    intersection: Intersection,
) {
    let x = intersection.x;
    if table.add(y, intersection) {
        let max_x = target.width().saturating_sub(1) as i32;
        target.adjust_dirty_rect(x.clamp(0, max_x), y);
    }
}

/// Add a horizontal edge as a run, left end first.
fn register_run<T: RasterTarget>(
    table: &mut IntersectionTable,
    target: &mut T,
    start: &EdgePoint,
    end: &EdgePoint,
) {
    let mut run: Run = [
        vertex_intersection(start, end, false),
        vertex_intersection(start, end, true),
    ];
    if end.x < start.x {
        run.swap(0, 1);
    }
    let [left_x, right_x] = run.map(|point| point.x);
    if table.add_run(start.y, run) {
        let max_x = target.width().saturating_sub(1) as i32;
        target.adjust_dirty_rect(left_x.clamp(0, max_x), start.y);
        target.adjust_dirty_rect(right_x.clamp(0, max_x), start.y);
    }
}

/// Intersection sitting exactly on one end of the edge `start -> end`.
fn vertex_intersection(start: &EdgePoint, end: &EdgePoint, at_end: bool) -> Intersection {
    let point = if at_end { end } else { start };
    Intersection {
        x: point.x,
        z: point.z,
        weight: if at_end { 1.0 } else { 0.0 },
        edge_start: start.vertex,
        edge_end: end.vertex,
        edge_uv: start.uv.zip(end.uv).map(|(a, b)| [a, b]),
    }
}

impl Rasterizer {
    /// Edge pass: compute the plane of `polygon` and fill the intersection
    /// table with its scanline crossings.
    ///
    /// Fails for edge-on polygons and for polygons whose edges are all
    /// horizontal once snapped to pixels; the table is left empty then.
    pub fn assemble_intersections<T: RasterTarget>(
        &mut self,
        polygon: &PolygonRef,
        target: &mut T,
    ) -> Result<(), RasterError> {
        if self.intersections.height() != target.height() {
            self.intersections.resize(target.height());
        }
        self.intersections.clear();
        self.plane = None;

        let plane = PlaneEquation::from_polygon(
            polygon.vertices,
            polygon.indices,
            polygon.normal,
            polygon.color,
        )
        .inspect_err(|err| log::debug!("skip fill: {}", err))?;
        self.plane = Some(plane);

        let mut corners = std::mem::take(&mut self.corners);
        corners.clear();
        corners.extend((0..polygon.indices.len()).map(|i| polygon.corner(i)));
        let result = self.assemble_edges(&corners, polygon, target);
        self.corners = corners;
        result
    }

    fn assemble_edges<T: RasterTarget>(
        &mut self,
        corners: &[EdgePoint],
        polygon: &PolygonRef,
        target: &mut T,
    ) -> Result<(), RasterError> {
        let n = corners.len();
        let edge = |i: usize| (corners[i], corners[(i + 1) % n]);

        // The first vertex needs the direction of the last non-horizontal
        // edge to tell whether it is a turning point.
        let mut last_derivative = (0..n)
            .rev()
            .map(|i| {
                let (start, end) = edge(i);
                derivative(start.y, end.y)
            })
            .find(|&d| d != 0)
            .ok_or(RasterError::Degenerate {
                color: polygon.color,
            })
            .inspect_err(|err| log::debug!("skip fill: {}", err))?;

        let table = &mut self.intersections;
        for i in 0..n {
            let (start, end) = edge(i);
            bresenham::edge_intersections(start, end, |y, intersection| {
                register(table, target, y, intersection)
            });

            let current = derivative(start.y, end.y);
            if current == 0 {
                register_run(table, target, &start, &end);
                continue;
            }
            register(table, target, end.y, vertex_intersection(&start, &end, true));
            if current != last_derivative {
                register(table, target, start.y, vertex_intersection(&start, &end, false));
            }
            last_derivative = current;
        }
        Ok(())
    }

    /// Fill `polygon` into `target`, returning the number of pixels written.
    ///
    /// With a `texture`, polygons carrying texture coordinates take their
    /// base color from the texture instead of `polygon.color`.
    pub fn fill_polygon<S, T>(
        &mut self,
        polygon: &PolygonRef,
        shader: &mut S,
        texture: Option<&Texture>,
        target: &mut T,
    ) -> Result<usize, RasterError>
    where
        S: ScanlineShader,
        T: RasterTarget,
    {
        self.assemble_intersections(polygon, target)?;
        Ok(self.fill_spans(polygon, shader, texture, target))
    }

    /// Span pass over the assembled intersection table.
    fn fill_spans<S, T>(
        &mut self,
        polygon: &PolygonRef,
        shader: &mut S,
        texture: Option<&Texture>,
        target: &mut T,
    ) -> usize
    where
        S: ScanlineShader,
        T: RasterTarget,
    {
        let Self {
            intersections,
            plane,
            interpolation,
            depth_source,
            spans,
            ..
        } = self;
        let plane = match (depth_source, plane) {
            (DepthSource::PlaneEquation, Some(plane)) => Some(*plane),
            _ => None,
        };
        let width = target.width() as i32;
        let base_color = polygon.color.argb;
        let mut written = 0;

        for y in 0..intersections.height() {
            let (row, runs) = intersections.row_mut(y);
            if row.is_empty() && runs.is_empty() {
                continue;
            }
            row.sort_by_key(|intersection| intersection.x);
            if row.len() % 2 != 0 {
                log::trace!(
                    "polygon {}: {} intersections on row {}, dropping the last",
                    polygon.color,
                    row.len(),
                    y
                );
            }

            // Crossing pairs first, so they win over a run starting at the
            // same x.
            spans.clear();
            spans.extend(row.chunks_exact(2).map(|pair| [pair[0], pair[1]]));
            spans.extend(runs.iter().copied());
            spans.sort_by_key(|span| span[0].x);
            row.clear();
            runs.clear();

            let y = y as i32;
            // First x not yet covered by a span of this row.
            let mut free_x = i32::MIN;

            for [start, end] in spans.iter() {
                interpolation.prepare(start, end, texture.is_some(), shader);
                let first_x = start.x.max(free_x).max(0);
                let last_x = end.x.min(width - 1);

                // Past `last_x` nothing is written, so stepping can stop.
                for x in start.x..=last_x {
                    if x >= first_x {
                        let z = match plane {
                            Some(plane) => plane.depth_at(x as f32, y as f32),
                            None => interpolation.z,
                        };
                        if target.depth_test(x, y, z) {
                            let color = match (texture, interpolation.uv) {
                                (Some(texture), Some(uv)) => texture.sample(uv),
                                _ => base_color,
                            };
                            let color = shader.shade(color, interpolation.weight);
                            target.set(x, y, z, color);
                            written += 1;
                        }
                    }
                    interpolation.step(shader);
                }
                free_x = free_x.max(end.x.saturating_add(1));
            }
        }

        written
    }
}
